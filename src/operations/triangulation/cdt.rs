// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Constrained Delaunay retriangulation of one mesh face.
//!
//! Works in the face's dominant-axis projection with exact predicates.
//! Cocircular ties are decided by `incircle_perturbed` ranked on global
//! vertex ids, so the triangulation of a constrained region depends only on
//! the ids and positions of the points inside it.

use ahash::{AHashMap, AHashSet};
use smallvec::SmallVec;

use crate::error::{BooleanError, BooleanResult};
use crate::geometry::point::Point2;
use crate::kernel::orientation::{incircle_perturbed, orient2d};
use crate::kernel::predicates::dominant_component;
use crate::mesh::ids::{FaceId, VertexId};
use crate::mesh::registry::PointRegistry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Edge(usize, usize);

impl Edge {
    #[inline]
    fn new(a: usize, b: usize) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }
}

/// Counter-clockwise triangle over local indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Triangle(usize, usize, usize);

impl Triangle {
    #[inline]
    fn edges(self) -> [(usize, usize); 3] {
        [(self.0, self.1), (self.1, self.2), (self.2, self.0)]
    }

    /// Vertex opposite the directed edge `a -> b` of this triangle.
    #[inline]
    fn apex(self, a: usize, b: usize) -> Option<usize> {
        self.edges()
            .iter()
            .position(|&e| e == (a, b))
            .map(|i| [self.2, self.0, self.1][i])
    }
}

pub struct ConstrainedDelaunay<'r> {
    face: FaceId,
    reg: &'r PointRegistry,
    drop: usize,
    flipped: bool,
    ids: Vec<VertexId>,
    pts: Vec<Point2>,
    local: AHashMap<VertexId, usize>,
    tris: Vec<Option<Triangle>>,
    // directed edge -> triangle holding it
    half: AHashMap<(usize, usize), usize>,
    constrained: AHashSet<Edge>,
}

impl<'r> ConstrainedDelaunay<'r> {
    /// Seeds the triangulation with the three corners of `face`; the corner
    /// edges are constrained.
    pub fn new(face: FaceId, corners: [VertexId; 3], reg: &'r PointRegistry) -> BooleanResult<Self> {
        let [a, b, c] = corners.map(|v| reg.at(v));
        let n = crate::geometry::point::cross(&b.sub(a), &c.sub(a));
        let (drop, sign) = dominant_component(&n);
        if sign == 0 {
            return Err(BooleanError::Triangulation {
                face,
                reason: "face has zero area",
            });
        }
        let mut cdt = ConstrainedDelaunay {
            face,
            reg,
            drop,
            flipped: sign < 0,
            ids: Vec::new(),
            pts: Vec::new(),
            local: AHashMap::default(),
            tris: Vec::new(),
            half: AHashMap::default(),
            constrained: AHashSet::default(),
        };
        let seed = if cdt.flipped { [corners[0], corners[2], corners[1]] } else { corners };
        let l = seed.map(|v| cdt.add_local(v));
        cdt.add_tri(Triangle(l[0], l[1], l[2]));
        for (p, q) in Triangle(l[0], l[1], l[2]).edges() {
            cdt.constrained.insert(Edge::new(p, q));
        }
        Ok(cdt)
    }

    fn add_local(&mut self, v: VertexId) -> usize {
        if let Some(&i) = self.local.get(&v) {
            return i;
        }
        let i = self.ids.len();
        self.ids.push(v);
        self.pts.push(self.reg.at(v).project(self.drop));
        self.local.insert(v, i);
        i
    }

    fn fail(&self, reason: &'static str) -> BooleanError {
        BooleanError::Triangulation {
            face: self.face,
            reason,
        }
    }

    #[inline]
    fn orient(&self, a: usize, b: usize, c: usize) -> i8 {
        orient2d(&self.pts[a], &self.pts[b], &self.pts[c])
    }

    /// Perturbed incircle: positive when `d` is inside the circle of the
    /// counter-clockwise triangle `a b c`.
    #[inline]
    fn in_circle(&self, a: usize, b: usize, c: usize, d: usize) -> i8 {
        let p = &self.pts;
        let id = |i: usize| self.ids[i].0;
        incircle_perturbed([&p[a], &p[b], &p[c], &p[d]], [id(a), id(b), id(c), id(d)])
    }

    fn add_tri(&mut self, t: Triangle) -> usize {
        let ti = self.tris.len();
        for e in t.edges() {
            self.half.insert(e, ti);
        }
        self.tris.push(Some(t));
        ti
    }

    fn remove_tri(&mut self, ti: usize) -> Option<Triangle> {
        let t = self.tris[ti].take()?;
        for e in t.edges() {
            if self.half.get(&e) == Some(&ti) {
                self.half.remove(&e);
            }
        }
        Some(t)
    }

    fn tri_of(&self, e: (usize, usize)) -> Option<(usize, Triangle)> {
        let ti = *self.half.get(&e)?;
        self.tris[ti].map(|t| (ti, t))
    }

    fn has_edge(&self, a: usize, b: usize) -> bool {
        self.half.contains_key(&(a, b)) || self.half.contains_key(&(b, a))
    }

    /// Inserts a point lying in the (closed) face. Returns its local index.
    pub fn insert_point(&mut self, v: VertexId) -> BooleanResult<usize> {
        if let Some(&i) = self.local.get(&v) {
            return Ok(i);
        }
        let p = self.add_local(v);

        let mut found = None;
        for (ti, t) in self.tris.iter().enumerate() {
            let Some(t) = *t else { continue };
            let o = t.edges().map(|(a, b)| self.orient(a, b, p));
            if o.iter().any(|&s| s < 0) {
                continue;
            }
            found = Some((ti, t, o));
            break;
        }
        let Some((ti, t, o)) = found else {
            return Err(self.fail("point lies outside the face"));
        };

        let zeros = o.iter().filter(|&&s| s == 0).count();
        let mut stack: Vec<(usize, usize)> = Vec::new();
        match zeros {
            0 => {
                self.remove_tri(ti);
                let Triangle(a, b, c) = t;
                self.add_tri(Triangle(a, b, p));
                self.add_tri(Triangle(b, c, p));
                self.add_tri(Triangle(c, a, p));
                stack.extend([(a, b), (b, c), (c, a)]);
            }
            1 => {
                let k = o.iter().position(|&s| s == 0).unwrap_or(0);
                let (a, b) = t.edges()[k];
                let c = t.apex(a, b).ok_or_else(|| self.fail("broken triangle"))?;
                let twin = self.tri_of((b, a));
                self.remove_tri(ti);
                self.add_tri(Triangle(a, p, c));
                self.add_tri(Triangle(p, b, c));
                stack.extend([(c, a), (b, c)]);
                if let Some((tj, t2)) = twin {
                    let d = t2.apex(b, a).ok_or_else(|| self.fail("broken triangle"))?;
                    self.remove_tri(tj);
                    self.add_tri(Triangle(b, p, d));
                    self.add_tri(Triangle(p, a, d));
                    stack.extend([(d, b), (a, d)]);
                }
                if self.constrained.remove(&Edge::new(a, b)) {
                    self.constrained.insert(Edge::new(a, p));
                    self.constrained.insert(Edge::new(p, b));
                }
            }
            _ => return Err(self.fail("point coincides with a vertex in projection")),
        }
        self.legalize(stack);
        Ok(p)
    }

    /// Lawson flips for the given directed edges and everything they touch.
    fn legalize(&mut self, mut stack: Vec<(usize, usize)>) {
        while let Some((a, b)) = stack.pop() {
            if self.constrained.contains(&Edge::new(a, b)) {
                continue;
            }
            let (Some((t1, tri1)), Some((t2, tri2))) = (self.tri_of((a, b)), self.tri_of((b, a))) else {
                continue;
            };
            let (Some(c), Some(d)) = (tri1.apex(a, b), tri2.apex(b, a)) else {
                continue;
            };
            if self.in_circle(a, b, c, d) <= 0 {
                continue;
            }
            self.remove_tri(t1);
            self.remove_tri(t2);
            self.add_tri(Triangle(a, d, c));
            self.add_tri(Triangle(d, b, c));
            stack.extend([(a, d), (d, b), (b, c), (c, a)]);
        }
    }

    /// `w` lies strictly inside segment `u v` (all three collinear).
    fn strictly_between(&self, u: usize, w: usize, v: usize) -> bool {
        let (pu, pw, pv) = (&self.pts[u], &self.pts[w], &self.pts[v]);
        let axis = if pu[0].eq_exact(&pv[0]) { 1 } else { 0 };
        let s1 = (&pw[axis] - &pu[axis]).sign();
        let s2 = (&pv[axis] - &pw[axis]).sign();
        s1 != 0 && s1 == s2
    }

    /// Forces the segment `a b` into the triangulation.
    pub fn insert_constraint(&mut self, a: VertexId, b: VertexId) -> BooleanResult<()> {
        let u = self.insert_point(a)?;
        let v = self.insert_point(b)?;
        self.constrain(u, v)
    }

    fn constrain(&mut self, u: usize, v: usize) -> BooleanResult<()> {
        if u == v {
            return Ok(());
        }
        if self.has_edge(u, v) {
            self.constrained.insert(Edge::new(u, v));
            return Ok(());
        }

        let live: AHashSet<usize> = self.tris.iter().flatten().flat_map(|t| [t.0, t.1, t.2]).collect();
        let split = live
            .iter()
            .copied()
            .filter(|&w| w != u && w != v && self.orient(u, v, w) == 0)
            .find(|&w| self.strictly_between(u, w, v));
        if let Some(w) = split {
            self.constrain(u, w)?;
            return self.constrain(w, v);
        }

        // Triangles cut by the open segment.
        let mut cut: SmallVec<[usize; 16]> = SmallVec::new();
        for (ti, t) in self.tris.iter().enumerate() {
            let Some(t) = *t else { continue };
            for (x, y) in t.edges() {
                if x == u || x == v || y == u || y == v {
                    continue;
                }
                let crosses = self.orient(u, v, x) * self.orient(u, v, y) < 0
                    && self.orient(x, y, u) * self.orient(x, y, v) < 0;
                if crosses {
                    if self.constrained.contains(&Edge::new(x, y)) {
                        return Err(BooleanError::SelfIntersection {
                            face: self.face,
                            a: self.ids[u],
                            b: self.ids[v],
                        });
                    }
                    cut.push(ti);
                    break;
                }
            }
        }
        if cut.is_empty() {
            return Err(self.fail("constraint neither present nor crossing any edge"));
        }

        let removed: SmallVec<[Triangle; 16]> = cut.iter().filter_map(|&ti| self.remove_tri(ti)).collect();
        let inside: AHashSet<(usize, usize)> = removed.iter().flat_map(|t| t.edges()).collect();
        let mut next: AHashMap<usize, usize> = AHashMap::default();
        for &(x, y) in &inside {
            if !inside.contains(&(y, x)) {
                next.insert(x, y);
            }
        }

        let walk = |from: usize, to: usize| -> Option<Vec<usize>> {
            let mut chain = Vec::new();
            let mut cur = *next.get(&from)?;
            while cur != to {
                chain.push(cur);
                if chain.len() > next.len() {
                    return None;
                }
                cur = *next.get(&cur)?;
            }
            Some(chain)
        };
        let right = walk(u, v).ok_or_else(|| self.fail("cavity boundary is not a loop"))?;
        let left = walk(v, u).ok_or_else(|| self.fail("cavity boundary is not a loop"))?;

        let mut out = Vec::new();
        self.fill(u, v, &right, &mut out);
        self.fill(v, u, &left, &mut out);
        for t in out {
            self.add_tri(t);
        }
        self.constrained.insert(Edge::new(u, v));
        Ok(())
    }

    /// Triangulates the pseudo-polygon `p, chain.., q` closed by `q -> p`.
    fn fill(&self, p: usize, q: usize, chain: &[usize], out: &mut Vec<Triangle>) {
        if chain.is_empty() {
            return;
        }
        let mut best = 0;
        for i in 1..chain.len() {
            if self.in_circle(p, chain[best], q, chain[i]) > 0 {
                best = i;
            }
        }
        let c = chain[best];
        self.fill(p, c, &chain[..best], out);
        self.fill(c, q, &chain[best + 1..], out);
        out.push(Triangle(p, c, q));
    }

    /// Final triangles over global ids, in the face's original winding.
    pub fn triangles(&mut self) -> Vec<[VertexId; 3]> {
        let all: Vec<(usize, usize)> = self.half.keys().copied().collect();
        self.legalize(all);
        self.tris
            .iter()
            .flatten()
            .map(|t| {
                let g = [self.ids[t.0], self.ids[t.1], self.ids[t.2]];
                if self.flipped { [g[0], g[2], g[1]] } else { g }
            })
            .collect()
    }
}

/// Retriangulates `corners` with the given points and segments.
pub fn retriangulate(
    face: FaceId,
    corners: [VertexId; 3],
    reg: &PointRegistry,
    points: &[VertexId],
    constraints: &[(VertexId, VertexId)],
) -> BooleanResult<Vec<[VertexId; 3]>> {
    let mut cdt = ConstrainedDelaunay::new(face, corners, reg)?;
    for &v in points {
        cdt.insert_point(v)?;
    }
    for &(a, b) in constraints {
        cdt.insert_constraint(a, b)?;
    }
    Ok(cdt.triangles())
}
