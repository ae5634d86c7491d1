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

//! Triangle/triangle intersection expressed purely by sign predicates.
//!
//! Intersection points are named by the smallest feature (vertex, edge or
//! face) of each triangle that contains them, so the same point reached from
//! two different triangle pairs gets the same name.

use smallvec::SmallVec;

use crate::error::BooleanError;
use crate::kernel::predicates::Predicates;
use crate::mesh::ids::VertexId;

/// Bitmask over the corners `{v0 = 1, v1 = 2, v2 = 4}` of a triangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Simplex(u8);

impl Simplex {
    pub const FACE: Simplex = Simplex(7);

    pub fn vertex(i: usize) -> Self {
        Simplex(1 << i)
    }

    pub fn edge(i: usize, j: usize) -> Self {
        Simplex((1 << i) | (1 << j))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// 0 for a vertex, 1 for an edge, 2 for the face.
    pub fn dim(self) -> u32 {
        self.0.count_ones() - 1
    }

    /// Corner ids of `t` spanning this simplex, in corner order.
    pub fn vertices(self, t: &[VertexId; 3]) -> SmallVec<[VertexId; 3]> {
        (0..3).filter(|i| self.0 & (1 << i) != 0).map(|i| t[i]).collect()
    }
}

impl TryFrom<u8> for Simplex {
    type Error = BooleanError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1..=7 => Ok(Simplex(bits)),
            _ => Err(BooleanError::InvalidSimplex(format!("mask {bits:#05b}"))),
        }
    }
}

/// One intersection point of a left and a right triangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionPair {
    pub left: Simplex,
    pub right: Simplex,
}

pub type Intersection = SmallVec<[RegionPair; 6]>;

const EDGES: [(usize, usize, usize); 3] = [(0, 1, 2), (1, 2, 0), (2, 0, 1)];

#[derive(Copy, Clone)]
enum Feature {
    Vertex(usize),
    Edge(usize, usize),
}

impl Feature {
    fn simplex(self) -> Simplex {
        match self {
            Feature::Vertex(i) => Simplex::vertex(i),
            Feature::Edge(i, j) => Simplex::edge(i, j),
        }
    }
}

/// Region of a triangle from the signs of its three edge-side tests, or
/// `None` when some test puts the point outside.
fn region_from_sides(sides: [i8; 3]) -> Option<Simplex> {
    if sides.iter().any(|&s| s < 0) {
        return None;
    }
    let mut mask = 7u8;
    for (e, &(k, l, _)) in EDGES.iter().enumerate() {
        if sides[e] == 0 {
            mask &= (1 << k) | (1 << l);
        }
    }
    Some(Simplex(mask))
}

/// Vertices of `t` on the plane and edges whose endpoints are strictly
/// on opposite sides, given the plane signs `o`.
fn crossing_features(o: &[i8; 3]) -> SmallVec<[Feature; 2]> {
    let mut out = SmallVec::new();
    for i in 0..3 {
        if o[i] == 0 {
            out.push(Feature::Vertex(i));
        }
    }
    for &(i, j, _) in &EDGES {
        if o[i] * o[j] < 0 {
            out.push(Feature::Edge(i, j));
        }
    }
    out
}

/// Locates a feature of `p` (lying on the plane of `q`) inside `q`.
/// `op` are the plane signs of `p` against `q`'s plane.
fn locate_feature(
    pr: &Predicates,
    p: &[VertexId; 3],
    op: &[i8; 3],
    q: &[VertexId; 3],
    f: Feature,
) -> Option<Simplex> {
    let sides = match f {
        Feature::Vertex(i) => {
            let x = (0..3).find(|&x| op[x] != 0)?;
            EDGES.map(|(k, l, _)| pr.orient3d(q[k], q[l], p[i], p[x]) * op[x])
        }
        Feature::Edge(i, j) => EDGES.map(|(k, l, _)| -pr.orient3d(p[i], p[j], q[k], q[l]) * op[i]),
    };
    region_from_sides(sides)
}

fn push_unique(out: &mut Intersection, r: RegionPair) {
    if !out.contains(&r) {
        out.push(r);
    }
}

/// Intersection of the left triangle `a` with the right triangle `b`.
/// Zero-area triangles must be filtered out by the caller.
pub fn intersect(pr: &Predicates, a: &[VertexId; 3], b: &[VertexId; 3]) -> Intersection {
    let oa: [i8; 3] = std::array::from_fn(|i| pr.orient3d(b[0], b[1], b[2], a[i]));
    let ob: [i8; 3] = std::array::from_fn(|j| pr.orient3d(a[0], a[1], a[2], b[j]));
    let one_side = |o: &[i8; 3]| o.iter().all(|&s| s > 0) || o.iter().all(|&s| s < 0);
    if one_side(&oa) || one_side(&ob) {
        return Intersection::new();
    }
    if oa.iter().all(|&s| s == 0) || ob.iter().all(|&s| s == 0) {
        return intersect_coplanar(pr, a, b);
    }

    let mut out = Intersection::new();
    for f in crossing_features(&oa) {
        if let Some(r) = locate_feature(pr, a, &oa, b, f) {
            push_unique(&mut out, RegionPair { left: f.simplex(), right: r });
        }
    }
    for f in crossing_features(&ob) {
        if let Some(l) = locate_feature(pr, b, &ob, a, f) {
            push_unique(&mut out, RegionPair { left: l, right: f.simplex() });
        }
    }
    debug_assert!(out.len() <= 2);
    out
}

fn intersect_coplanar(pr: &Predicates, a: &[VertexId; 3], b: &[VertexId; 3]) -> Intersection {
    let (drop, _) = pr.dominant_axis(a[0], a[1], a[2]);
    let o2 = |p: VertexId, q: VertexId, r: VertexId| pr.orient2d(p, q, r, drop);
    let sa = o2(a[0], a[1], a[2]);
    let sb = o2(b[0], b[1], b[2]);
    let mut out = Intersection::new();
    if sa == 0 || sb == 0 {
        return out;
    }

    for i in 0..3 {
        let sides = EDGES.map(|(k, l, _)| o2(b[k], b[l], a[i]) * sb);
        if let Some(r) = region_from_sides(sides) {
            push_unique(&mut out, RegionPair { left: Simplex::vertex(i), right: r });
        }
    }
    for j in 0..3 {
        let sides = EDGES.map(|(k, l, _)| o2(a[k], a[l], b[j]) * sa);
        if let Some(l) = region_from_sides(sides) {
            push_unique(&mut out, RegionPair { left: l, right: Simplex::vertex(j) });
        }
    }
    for &(i, j, _) in &EDGES {
        for &(k, l, _) in &EDGES {
            let crosses = o2(a[i], a[j], b[k]) * o2(a[i], a[j], b[l]) < 0
                && o2(b[k], b[l], a[i]) * o2(b[k], b[l], a[j]) < 0;
            if crosses {
                push_unique(
                    &mut out,
                    RegionPair {
                        left: Simplex::edge(i, j),
                        right: Simplex::edge(k, l),
                    },
                );
            }
        }
    }

    if out.len() > 2 {
        order_cyclically(&mut out);
    }
    out
}

/// Two polygon corners are consecutive when they share an edge of either
/// triangle.
fn adjacent(p: &RegionPair, q: &RegionPair) -> bool {
    (p.left.0 | q.left.0).count_ones() <= 2 || (p.right.0 | q.right.0).count_ones() <= 2
}

fn order_cyclically(pts: &mut Intersection) {
    let n = pts.len();
    let mut ordered = Intersection::with_capacity(n);
    let mut used = [false; 6];
    ordered.push(pts[0]);
    used[0] = true;
    for _ in 1..n {
        let last = ordered[ordered.len() - 1];
        let Some(next) = (0..n).find(|&i| !used[i] && adjacent(&last, &pts[i])) else {
            break;
        };
        used[next] = true;
        ordered.push(pts[next]);
    }
    // Corners left over by a broken chain keep their relative order.
    for i in 0..n {
        if !used[i] {
            ordered.push(pts[i]);
        }
    }
    *pts = ordered;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point3;
    use crate::mesh::registry::PointRegistry;

    fn tri(reg: &mut PointRegistry, p: [[f64; 3]; 3]) -> [VertexId; 3] {
        p.map(|c| reg.insert(Point3::from(c)))
    }

    #[test]
    fn simplex_masks() {
        assert!(Simplex::try_from(0).is_err());
        assert!(Simplex::try_from(8).is_err());
        let e = Simplex::try_from(5).expect("edge v0 v2");
        assert_eq!(e.dim(), 1);
        assert_eq!(e.vertices(&[VertexId(7), VertexId(8), VertexId(9)]).as_slice(), &[VertexId(7), VertexId(9)]);
        assert_eq!(Simplex::FACE.dim(), 2);
    }

    #[test]
    fn piercing_triangles() {
        let mut reg = PointRegistry::new();
        let a = tri(&mut reg, [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]]);
        let b = tri(&mut reg, [[1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [3.0, -5.0, 0.0]]);
        let pr = Predicates::new(&reg);
        let x = intersect(&pr, &a, &b);
        assert_eq!(x.len(), 2);
        // Edge b0-b1 pierces the face of a.
        assert!(x.contains(&RegionPair { left: Simplex::FACE, right: Simplex::edge(0, 1) }));
        // The other endpoint lies on a's edge v0-v1.
        assert!(x.iter().any(|r| r.left == Simplex::edge(0, 1)));
    }

    #[test]
    fn separated_and_touching() {
        let mut reg = PointRegistry::new();
        let a = tri(&mut reg, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let far = tri(&mut reg, [[0.0, 0.0, 1.0], [1.0, 0.0, 2.0], [0.0, 1.0, 3.0]]);
        let apex = tri(&mut reg, [[0.2, 0.2, 0.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]);
        let pr = Predicates::new(&reg);
        assert!(intersect(&pr, &a, &far).is_empty());
        let x = intersect(&pr, &a, &apex);
        assert_eq!(x.as_slice(), &[RegionPair { left: Simplex::FACE, right: Simplex::vertex(0) }]);
    }

    #[test]
    fn coplanar_star_of_david() {
        let mut reg = PointRegistry::new();
        let a = tri(&mut reg, [[0.0, 0.0, 0.0], [6.0, 0.0, 0.0], [3.0, 6.0, 0.0]]);
        let b = tri(&mut reg, [[0.0, 4.0, 0.0], [3.0, -2.0, 0.0], [6.0, 4.0, 0.0]]);
        let pr = Predicates::new(&reg);
        let x = intersect(&pr, &a, &b);
        assert_eq!(x.len(), 6);
        assert!(x.iter().all(|r| r.left.dim() == 1 && r.right.dim() == 1));
        for i in 0..6 {
            assert!(adjacent(&x[i], &x[(i + 1) % 6]), "corner {i} not followed by a neighbour");
        }
    }

    #[test]
    fn shared_edge_is_reported_by_vertices() {
        let mut reg = PointRegistry::new();
        let a = tri(&mut reg, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let b = tri(&mut reg, [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.5, 0.0, 1.0]]);
        let pr = Predicates::new(&reg);
        let x = intersect(&pr, &a, &b);
        assert_eq!(x.len(), 2);
        assert!(x.contains(&RegionPair { left: Simplex::vertex(0), right: Simplex::vertex(1) }));
        assert!(x.contains(&RegionPair { left: Simplex::vertex(1), right: Simplex::vertex(0) }));
    }
}
