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

//! Predicates on registered points, addressed by id.

use std::cmp::Ordering;

use dashmap::DashMap;

use crate::geometry::point::Point2;
use crate::kernel::orientation::{orient2d, orient3d};
use crate::mesh::ids::VertexId;
use crate::mesh::registry::PointRegistry;
use crate::numeric::lazy_exact::LazyExact;

/// Orientation tests over a frozen registry, with `orient3d` results memoized
/// per unordered quadruple.
pub struct Predicates<'r> {
    reg: &'r PointRegistry,
    cache: DashMap<[VertexId; 4], i8, ahash::RandomState>,
}

/// Sorts `ids` in place and returns the parity of the permutation applied,
/// or 0 when two ids repeat.
fn sort_with_parity(ids: &mut [VertexId; 4]) -> i8 {
    let mut parity = 1;
    for i in 1..4 {
        let mut j = i;
        while j > 0 && ids[j - 1] > ids[j] {
            ids.swap(j - 1, j);
            parity = -parity;
            j -= 1;
        }
    }
    if ids.windows(2).any(|w| w[0] == w[1]) { 0 } else { parity }
}

impl<'r> Predicates<'r> {
    pub fn new(reg: &'r PointRegistry) -> Self {
        Predicates {
            reg,
            cache: DashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    pub fn registry(&self) -> &'r PointRegistry {
        self.reg
    }

    /// `orient3d(a, b, c, d)` on registered points.
    pub fn orient3d(&self, a: VertexId, b: VertexId, c: VertexId, d: VertexId) -> i8 {
        let mut key = [a, b, c, d];
        let parity = sort_with_parity(&mut key);
        if parity == 0 {
            return 0;
        }
        if let Some(s) = self.cache.get(&key) {
            return *s * parity;
        }
        let r = self.reg;
        let s = orient3d(r.at(key[0]), r.at(key[1]), r.at(key[2]), r.at(key[3]));
        self.cache.insert(key, s);
        s * parity
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Axis dropped when projecting `abc`: the largest |normal| component,
    /// lowest index on ties. Also returns the sign of that component.
    pub fn dominant_axis(&self, a: VertexId, b: VertexId, c: VertexId) -> (usize, i8) {
        let r = self.reg;
        let (pa, pb, pc) = (r.at(a), r.at(b), r.at(c));
        let n = crate::geometry::point::cross(&pb.sub(pa), &pc.sub(pa));
        dominant_component(&n)
    }

    pub fn project(&self, v: VertexId, drop: usize) -> Point2 {
        self.reg.at(v).project(drop)
    }

    /// `orient2d` of three registered points projected along `drop`.
    pub fn orient2d(&self, a: VertexId, b: VertexId, c: VertexId, drop: usize) -> i8 {
        if a == b || b == c || a == c {
            return 0;
        }
        orient2d(&self.project(a, drop), &self.project(b, drop), &self.project(c, drop))
    }
}

pub fn dominant_component(n: &[LazyExact; 3]) -> (usize, i8) {
    let mut best = 0;
    for i in 1..3 {
        if n[i].cmp_abs(&n[best]) == Ordering::Greater {
            best = i;
        }
    }
    (best, n[best].sign())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point3;

    #[test]
    fn cached_orientation_respects_permutations() {
        let mut reg = PointRegistry::new();
        let a = reg.insert(Point3::from_f64(0.0, 0.0, 0.0));
        let b = reg.insert(Point3::from_f64(1.0, 0.0, 0.0));
        let c = reg.insert(Point3::from_f64(0.0, 1.0, 0.0));
        let d = reg.insert(Point3::from_f64(0.0, 0.0, 1.0));
        let pr = Predicates::new(&reg);
        assert_eq!(pr.orient3d(a, b, c, d), 1);
        assert_eq!(pr.orient3d(b, a, c, d), -1);
        assert_eq!(pr.orient3d(d, c, b, a), 1);
        assert_eq!(pr.orient3d(a, a, c, d), 0);
        assert_eq!(pr.cache_len(), 1);
        assert_eq!(pr.dominant_axis(a, b, c), (2, 1));
        assert_eq!(pr.dominant_axis(a, c, b), (2, -1));
        assert_eq!(pr.orient2d(a, b, c, 2), 1);
    }
}
