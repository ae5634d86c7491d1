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

use std::cmp::Ordering;

use crate::geometry::point::{Point3, cross, dot};
use crate::geometry::query::RayQuery;
use crate::kernel::orientation::orient3d;
use crate::mesh::ids::FaceId;
use crate::mesh::soup::TriangleSoup;
use crate::numeric::lazy_exact::LazyExact;

/// How the ray `origin -> through` meets one triangle.
#[derive(Clone, Debug)]
pub enum Crossing {
    Miss,
    /// Transversal crossing of the interior at parameter `t > 0`; `front`
    /// when the origin lies on the side the triangle's normal points to.
    Hit { t: LazyExact, front: bool },
    /// Grazes an edge or vertex, starts on the supporting plane, or runs
    /// inside it. No contact with the triangle is nearer than `from`.
    Ambiguous { from: LazyExact },
}

/// Value of the supporting plane of `h` at `p`, scaled by twice the area.
fn plane_value(h: [&Point3; 3], p: &Point3) -> LazyExact {
    let n = cross(&h[1].sub(h[0]), &h[2].sub(h[0]));
    dot(&n, &p.sub(h[0]))
}

/// Smallest ray parameter of the corners of `h`; bounds every point of the
/// triangle that lies on the line.
fn nearest_corner(origin: &Point3, through: &Point3, h: [&Point3; 3]) -> LazyExact {
    let d = through.sub(origin);
    let len = dot(&d, &d);
    let mut best: Option<LazyExact> = None;
    for p in h {
        let t = &dot(&p.sub(origin), &d) / &len;
        if best.as_ref().is_none_or(|b| t.cmp_exact(b) == Ordering::Less) {
            best = Some(t);
        }
    }
    best.unwrap_or_else(|| LazyExact::from_i32(0))
}

pub fn ray_triangle(origin: &Point3, through: &Point3, h: [&Point3; 3]) -> Crossing {
    let s: [i8; 3] = std::array::from_fn(|i| orient3d(origin, through, h[i], h[(i + 1) % 3]));
    let positive = s.iter().all(|&x| x >= 0);
    let negative = s.iter().all(|&x| x <= 0);
    if !positive && !negative {
        return Crossing::Miss;
    }
    let fo = plane_value(h, origin);
    let fq = plane_value(h, through);
    let denom = &fo - &fq;
    if denom.sign() == 0 {
        // Line parallel to the plane; touching the triangle means lying in it.
        return if fo.sign() == 0 {
            Crossing::Ambiguous {
                from: nearest_corner(origin, through, h),
            }
        } else {
            Crossing::Miss
        };
    }
    if fo.sign() == 0 {
        return Crossing::Ambiguous {
            from: LazyExact::from_i32(0),
        };
    }
    let t = &fo / &denom;
    if t.sign() <= 0 {
        return Crossing::Miss;
    }
    if s.contains(&0) {
        return Crossing::Ambiguous { from: t };
    }
    Crossing::Hit {
        t,
        front: fo.sign() > 0,
    }
}

/// Outcome of casting a ray into a soup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RayCast {
    /// No face is crossed.
    Clear,
    /// The nearest crossing is unique and transversal.
    Nearest { face: FaceId, front: bool },
    Ambiguous,
}

/// Nearest transversal crossing of the ray. Grazing contacts strictly
/// beyond that crossing do not matter; any other makes the cast ambiguous.
pub fn cast<P: Sync>(soup: &TriangleSoup<P>, origin: &Point3, through: &Point3, parallel_depth: usize) -> RayCast {
    let query = RayQuery::new(origin, through);
    let mut best: Option<(LazyExact, FaceId, bool)> = None;
    let mut tied = false;
    let mut graze: Option<LazyExact> = None;
    for &f in soup.face_tree(parallel_depth).get_intersecting_leaves(&query) {
        match ray_triangle(origin, through, soup.triangle(f)) {
            Crossing::Miss => {}
            Crossing::Ambiguous { from } => {
                if graze.as_ref().is_none_or(|g| from.cmp_exact(g) == Ordering::Less) {
                    graze = Some(from);
                }
            }
            Crossing::Hit { t, front } => match &best {
                Some((bt, ..)) => match t.cmp_exact(bt) {
                    Ordering::Less => {
                        best = Some((t, f, front));
                        tied = false;
                    }
                    Ordering::Equal => tied = true,
                    Ordering::Greater => {}
                },
                None => best = Some((t, f, front)),
            },
        }
    }
    match best {
        _ if tied => RayCast::Ambiguous,
        Some((t, face, front)) => match graze {
            Some(g) if g.cmp_exact(&t) != Ordering::Greater => RayCast::Ambiguous,
            _ => RayCast::Nearest { face, front },
        },
        None if graze.is_some() => RayCast::Ambiguous,
        None => RayCast::Clear,
    }
}

/// Number of faces the ray crosses, or `None` when some crossing is not
/// transversal.
pub fn count_crossings<P: Sync>(soup: &TriangleSoup<P>, origin: &Point3, through: &Point3) -> Option<usize> {
    let query = RayQuery::new(origin, through);
    let mut n = 0;
    for &f in soup.face_tree(0).get_intersecting_leaves(&query) {
        match ray_triangle(origin, through, soup.triangle(f)) {
            Crossing::Miss => {}
            Crossing::Hit { .. } => n += 1,
            Crossing::Ambiguous { .. } => return None,
        }
    }
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::soup::tests::cuboid;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::from_f64(x, y, z)
    }

    #[test]
    fn crossing_kinds() {
        let (a, b, c) = (p(0.0, 0.0, 1.0), p(2.0, 0.0, 1.0), p(0.0, 2.0, 1.0));
        let tri = [&a, &b, &c];
        match ray_triangle(&p(0.5, 0.5, 0.0), &p(0.5, 0.5, 0.5), tri) {
            Crossing::Hit { t, front } => {
                assert!(!front);
                assert!(t.eq_exact(&LazyExact::from_i32(2)));
            }
            other => panic!("expected a hit, got {other:?}"),
        }
        // Pointing away.
        assert!(matches!(ray_triangle(&p(0.5, 0.5, 0.0), &p(0.5, 0.5, -1.0), tri), Crossing::Miss));
        // Through the hypotenuse.
        assert!(matches!(
            ray_triangle(&p(1.0, 1.0, 0.0), &p(1.0, 1.0, 3.0), tri),
            Crossing::Ambiguous { .. }
        ));
        // Starting on the plane.
        assert!(matches!(
            ray_triangle(&p(0.5, 0.5, 1.0), &p(0.5, 0.5, 3.0), tri),
            Crossing::Ambiguous { .. }
        ));
    }

    #[test]
    fn nearest_face_of_a_cube() {
        let cube = cuboid([0.0; 3], [1.0; 3], ());
        let from_outside = cast(&cube, &p(0.3, 0.4, -2.0), &p(0.3, 0.4, 0.5), 0);
        assert!(matches!(from_outside, RayCast::Nearest { front: true, .. }));
        let from_inside = cast(&cube, &p(0.3, 0.4, 0.2), &p(0.35, 0.45, 1.0), 0);
        assert!(matches!(from_inside, RayCast::Nearest { front: false, .. }));
        // The face diagonal of the top quad is grazed.
        assert_eq!(cast(&cube, &p(0.5, 0.5, 0.5), &p(0.5, 0.5, 3.0), 0), RayCast::Ambiguous);
        // Entering through the bottom, leaving over the top diagonal.
        let through_bottom = cast(&cube, &p(-0.25, 0.25, -1.0), &p(0.25, 0.5, 0.0), 0);
        assert!(matches!(through_bottom, RayCast::Nearest { front: true, .. }));
        // A graze in front of the first crossing still counts.
        assert_eq!(cast(&cube, &p(1.25, 1.0, 2.0), &p(0.75, 0.75, 1.0), 0), RayCast::Ambiguous);
        assert_eq!(cast(&cube, &p(3.0, 3.0, 3.0), &p(4.0, 3.0, 3.0), 0), RayCast::Clear);
    }
}
