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

use crate::geometry::point::Point3;

/// An axis-aligned box with outward-rounded `f64` corners. Boxes built from
/// lazy-exact points always contain the exact point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb { min, max }
    }

    pub fn empty() -> Self {
        Aabb {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn from_point(p: &Point3) -> Self {
        let (min, max) = p.bounds();
        Aabb { min, max }
    }

    /// Smallest box containing every point.
    pub fn from_points<'a>(pts: impl IntoIterator<Item = &'a Point3>) -> Self {
        pts.into_iter()
            .fold(Aabb::empty(), |acc, p| acc.union(&Aabb::from_point(p)))
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: std::array::from_fn(|i| self.min[i].min(other.min[i])),
            max: std::array::from_fn(|i| self.max[i].max(other.max[i])),
        }
    }

    /// Does this AABB intersect `other`? Touching boxes intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|i| self.max[i] >= other.min[i] && other.max[i] >= self.min[i])
    }

    pub fn contains_point(&self, p: [f64; 3]) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// Center coordinate along axis `i`.
    pub fn center(&self, i: usize) -> f64 {
        0.5 * (self.min[i] + self.max[i])
    }

    /// Length along axis `i`.
    pub fn extent(&self, i: usize) -> f64 {
        self.max[i] - self.min[i]
    }

    /// Return the axis index with largest extent.
    pub fn longest_axis(&self) -> usize {
        let mut best = 0;
        for i in 1..3 {
            if self.extent(i) > self.extent(best) {
                best = i;
            }
        }
        best
    }

    /// Grows the box by a relative and absolute margin.
    pub fn inflated(&self, rel: f64) -> Aabb {
        let pad = |i: usize| {
            let scale = self.min[i].abs().max(self.max[i].abs());
            scale * rel + f64::MIN_POSITIVE
        };
        Aabb {
            min: std::array::from_fn(|i| self.min[i] - pad(i)),
            max: std::array::from_fn(|i| self.max[i] + pad(i)),
        }
    }
}
