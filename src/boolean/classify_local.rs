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

//! Classification of faces around the intersection curve.
//!
//! Around every shared edge the incident faces are sorted by angle. The
//! faces of one operand split the circle into sectors that alternate
//! between inside and outside of that operand, which decides the faces of
//! the other operand lying in those sectors.

use std::cmp::Ordering;
use std::collections::VecDeque;

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::boolean::mixed::{FaceTag, MixedMesh};
use crate::boolean::try_map;
use crate::config::BooleanConfig;
use crate::error::{BooleanError, BooleanResult};
use crate::geometry::point::{cross, dot};
use crate::mesh::edge::{Edge, opposite_vertex, winding_along};
use crate::mesh::ids::{FaceId, VertexId};
use crate::numeric::lazy_exact::LazyExact;
use crate::warnings::Warnings;

/// A face seen from its shared edge.
struct Spoke {
    face: FaceId,
    apex: VertexId,
    left: bool,
    /// The face winding runs along the edge direction.
    forward: bool,
    octant: u8,
    x: LazyExact,
    y: LazyExact,
}

/// Octant of `(x, y)` counted counter-clockwise from the +x axis; the
/// boundaries only need to be consistent, not exact bisectors.
fn octant(x: &LazyExact, y: &LazyExact) -> u8 {
    let (sx, sy) = (x.sign(), y.sign());
    let (q, rx, ry) = if sx > 0 && sy >= 0 {
        (0, x.clone(), y.clone())
    } else if sx <= 0 && sy > 0 {
        (1, y.clone(), -x)
    } else if sx < 0 && sy <= 0 {
        (2, -x, -y)
    } else {
        (3, -y, x.clone())
    };
    2 * q + u8::from(ry.cmp_exact(&rx) != Ordering::Less)
}

fn angular_cmp(a: &Spoke, b: &Spoke) -> Ordering {
    a.octant.cmp(&b.octant).then_with(|| {
        let turn = (&(&a.x * &b.y) - &(&a.y * &b.x)).sign();
        0.cmp(&turn)
    })
}

fn spokes<P>(mm: &MixedMesh<P>, e: Edge) -> BooleanResult<Vec<Spoke>> {
    let soup = mm.mesh.soup();
    let (u, v) = (e.a, e.b);
    let d = soup.point(v).sub(soup.point(u));
    let mut k = 0;
    for i in 1..3 {
        if d[i].approx().m.abs() < d[k].approx().m.abs() {
            k = i;
        }
    }
    let axis: [LazyExact; 3] = std::array::from_fn(|i| LazyExact::from_i32(i32::from(i == k)));
    let e1 = cross(&d, &axis);
    let e2 = cross(&d, &e1);

    let mut out = Vec::new();
    for f in mm.mesh.incident_faces(e) {
        let t = mm.mesh.face(f);
        let Some(apex) = opposite_vertex(t, e) else {
            continue;
        };
        let r = soup.point(apex).sub(soup.point(u));
        let (x, y) = (dot(&r, &e1), dot(&r, &e2));
        if x.sign() == 0 && y.sign() == 0 {
            return Err(BooleanError::DegenerateFace { face: f, vertex: apex });
        }
        out.push(Spoke {
            face: f,
            apex,
            left: mm.from_left(f),
            forward: winding_along(t, u, v) > 0,
            octant: octant(&x, &y),
            x,
            y,
        });
    }
    out.sort_by(angular_cmp);
    Ok(out)
}

/// Tags proposed by one radial fan, or `None` when the fan is not
/// consistent enough to decide every face.
fn classify_fan<P>(mm: &MixedMesh<P>, e: Edge) -> BooleanResult<Option<Vec<(FaceId, FaceTag)>>> {
    let fan = spokes(mm, e)?;
    let mut groups: Vec<SmallVec<[usize; 2]>> = Vec::new();
    for i in 0..fan.len() {
        match groups.last_mut() {
            Some(g) if angular_cmp(&fan[g[0]], &fan[i]) == Ordering::Equal => g.push(i),
            _ => groups.push(SmallVec::from_elem(i, 1)),
        }
    }
    let n = groups.len();

    // Direction of the other operand's faces in group `g`, if they agree.
    let direction = |g: usize, left: bool| -> Option<Option<bool>> {
        let mut dir = None;
        for &i in &groups[g] {
            if fan[i].left == left {
                continue;
            }
            match dir {
                None => dir = Some(fan[i].forward),
                Some(d) if d != fan[i].forward => return None,
                _ => {}
            }
        }
        Some(dir)
    };

    let mut out = Vec::with_capacity(fan.len());
    for (gi, g) in groups.iter().enumerate() {
        let mixed = g.iter().any(|&i| fan[i].left) && g.iter().any(|&i| !fan[i].left);
        for &i in g {
            let s = &fan[i];
            if mixed {
                let partner = g.iter().map(|&j| &fan[j]).find(|o| o.left != s.left && o.apex == s.apex);
                let Some(o) = partner else {
                    return Ok(None);
                };
                let tag = if o.forward == s.forward { FaceTag::Coplanar } else { FaceTag::Opposite };
                out.push((s.face, tag));
                continue;
            }

            let mut next = None;
            let mut prev = None;
            for step in 1..n {
                if next.is_none() {
                    match direction((gi + step) % n, s.left) {
                        None => return Ok(None),
                        Some(d) => next = d,
                    }
                }
                if prev.is_none() {
                    match direction((gi + n - step) % n, s.left) {
                        None => return Ok(None),
                        Some(d) => prev = d,
                    }
                }
            }
            let (Some(next), Some(prev)) = (next, prev) else {
                return Ok(None);
            };
            // The sector before a forward face is inside its solid.
            if next == prev {
                return Ok(None);
            }
            out.push((s.face, if next { FaceTag::Interior } else { FaceTag::Exterior }));
        }
    }
    Ok(Some(out))
}

fn commit<P>(mm: &mut MixedMesh<P>, f: FaceId, tag: FaceTag, warnings: &mut Warnings) -> bool {
    let from_left = mm.from_left(f);
    let data = mm.mesh.data_mut(f);
    match data.tag {
        FaceTag::Unknown => {
            data.tag = tag;
            true
        }
        t if t == tag => false,
        t => {
            warn!(face = ?f, existing = ?t, proposed = ?tag, "conflicting face tags");
            *warnings |= Warnings::partial_intersection(from_left);
            false
        }
    }
}

/// Classifies every face reachable from the intersection curve.
pub fn classify_local<P: Sync>(mm: &mut MixedMesh<P>, config: &BooleanConfig) -> BooleanResult<Warnings> {
    let mut edges: Vec<Edge> = mm.shared_edges.iter().copied().collect();
    edges.sort_unstable();

    let proposals = {
        let view: &MixedMesh<P> = mm;
        try_map(config.parallel, &edges, |&e| classify_fan(view, e))?
    };
    let mut warnings = Warnings::empty();
    let mut resolved = 0;
    for tags in proposals.into_iter().flatten() {
        resolved += 1;
        for (f, tag) in tags {
            commit(mm, f, tag, &mut warnings);
        }
    }

    let mut queue: VecDeque<FaceId> = mm
        .face_ids()
        .filter(|&f| matches!(mm.tag(f), FaceTag::Interior | FaceTag::Exterior))
        .collect();
    while let Some(f) = queue.pop_front() {
        let tag = mm.tag(f);
        for e in Edge::of_triangle(mm.mesh.face(f)) {
            if mm.is_shared(e) {
                continue;
            }
            for g in mm.mesh.incident_faces(e) {
                if g != f && commit(mm, g, tag, &mut warnings) {
                    queue.push_back(g);
                }
            }
        }
    }
    debug!(
        fans = edges.len(),
        resolved,
        unknown = mm.unknown_count(),
        "local classification done"
    );
    Ok(warnings)
}
