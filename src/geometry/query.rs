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

//! Overlap predicates used to prune `AabbTree` queries.
//!
//! All of them are conservative: they may accept a box that does not touch
//! the query shape, never reject one that does.

use crate::geometry::aabb::Aabb;
use crate::geometry::point::Point3;

/// Relative inflation applied to query shapes built from rounded points.
const PAD: f64 = 1e-9;

/// Rounding slack added to the propagated coordinate enclosures.
const ULPS: f64 = 4.0 * f64::EPSILON;

pub trait Overlap {
    fn overlaps(&self, aabb: &Aabb) -> bool;
}

impl Overlap for Aabb {
    fn overlaps(&self, aabb: &Aabb) -> bool {
        self.intersects(aabb)
    }
}

/// The exact line through two points, known in floating point as
/// `o + t d` up to `eo + t ed` per axis.
#[derive(Clone, Debug)]
struct FatLine {
    o: [f64; 3],
    d: [f64; 3],
    eo: [f64; 3],
    ed: [f64; 3],
}

impl FatLine {
    /// `None` when a coordinate has no finite enclosure.
    fn new(a: &Point3, b: &Point3) -> Option<Self> {
        let (pa, pb) = (a.approx(), b.approx());
        let o: [f64; 3] = std::array::from_fn(|i| pa[i].m);
        let q: [f64; 3] = std::array::from_fn(|i| pb[i].m);
        let line = FatLine {
            o,
            d: std::array::from_fn(|i| q[i] - o[i]),
            eo: std::array::from_fn(|i| pa[i].r + o[i].abs() * ULPS + f64::MIN_POSITIVE),
            ed: std::array::from_fn(|i| pa[i].r + pb[i].r + (o[i].abs() + q[i].abs()) * ULPS + f64::MIN_POSITIVE),
        };
        let finite = (0..3).all(|i| line.eo[i].is_finite() && line.ed[i].is_finite() && line.d[i].is_finite());
        finite.then_some(line)
    }

    /// Slab test of the parameter interval `[t0, t1]` against `b`, widened
    /// on every axis by the error bound at each `t`.
    fn meets(&self, mut t0: f64, mut t1: f64, b: &Aabb) -> bool {
        for i in 0..3 {
            // o + t d >= min - eo - t ed, and o + t d <= max + eo + t ed; each reads a t >= c.
            let bounds = [
                (self.d[i] + self.ed[i], b.min[i] - self.eo[i] - self.o[i]),
                (self.ed[i] - self.d[i], self.o[i] - b.max[i] - self.eo[i]),
            ];
            for (a, c) in bounds {
                if a > 0.0 {
                    t0 = t0.max(c / a);
                } else if a < 0.0 {
                    t1 = t1.min(c / a);
                } else if c > 0.0 {
                    return false;
                }
            }
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}

/// The segment `a -> b`.
#[derive(Clone, Debug)]
pub struct SegmentQuery {
    line: Option<FatLine>,
    hull: Aabb,
}

impl SegmentQuery {
    pub fn new(a: &Point3, b: &Point3) -> Self {
        let (alo, ahi) = a.bounds();
        let (blo, bhi) = b.bounds();
        let hull = Aabb::new(
            std::array::from_fn(|i| alo[i].min(blo[i])),
            std::array::from_fn(|i| ahi[i].max(bhi[i])),
        );
        SegmentQuery {
            line: FatLine::new(a, b),
            hull,
        }
    }
}

impl Overlap for SegmentQuery {
    fn overlaps(&self, aabb: &Aabb) -> bool {
        let b = aabb.inflated(PAD);
        b.intersects(&self.hull) && self.line.as_ref().is_none_or(|l| l.meets(0.0, 1.0, &b))
    }
}

/// The ray `origin + t dir`, `t >= 0`.
#[derive(Clone, Debug)]
pub struct RayQuery {
    line: Option<FatLine>,
}

impl RayQuery {
    pub fn new(origin: &Point3, through: &Point3) -> Self {
        RayQuery {
            line: FatLine::new(origin, through),
        }
    }
}

impl Overlap for RayQuery {
    fn overlaps(&self, aabb: &Aabb) -> bool {
        self.line
            .as_ref()
            .is_none_or(|l| l.meets(0.0, f64::INFINITY, &aabb.inflated(PAD)))
    }
}

/// A triangle: rejected when its box misses, or when the box lies strictly
/// on one side of the triangle's plane.
#[derive(Clone, Debug)]
pub struct TriangleQuery {
    hull: Aabb,
    normal: [f64; 3],
    offset: f64,
    slack: f64,
}

impl TriangleQuery {
    pub fn new(a: &Point3, b: &Point3, c: &Point3) -> Self {
        let hull = Aabb::from_points([a, b, c]);
        let (a, b, c) = (a.to_f64(), b.to_f64(), c.to_f64());
        let u: [f64; 3] = std::array::from_fn(|i| b[i] - a[i]);
        let v: [f64; 3] = std::array::from_fn(|i| c[i] - a[i]);
        let normal = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let offset = normal[0] * a[0] + normal[1] * a[1] + normal[2] * a[2];
        let scale: f64 = (0..3).map(|i| normal[i].abs() * a[i].abs().max(1.0)).sum();
        TriangleQuery {
            hull,
            normal,
            offset,
            slack: scale * 1e-6 + f64::MIN_POSITIVE,
        }
    }
}

impl Overlap for TriangleQuery {
    fn overlaps(&self, aabb: &Aabb) -> bool {
        if !self.hull.inflated(PAD).intersects(aabb) {
            return false;
        }
        let (mut lo, mut hi) = (0.0, 0.0);
        for i in 0..3 {
            let (p, q) = (self.normal[i] * aabb.min[i], self.normal[i] * aabb.max[i]);
            lo += p.min(q);
            hi += p.max(q);
        }
        lo - self.slack <= self.offset && self.offset <= hi + self.slack
    }
}
