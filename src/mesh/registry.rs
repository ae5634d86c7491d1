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

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::geometry::point::Point3;
use crate::mesh::ids::VertexId;

type Key = [u64; 3];

/// Deduplicating point store: exactly equal points share one id.
#[derive(Default)]
pub struct PointRegistry {
    points: Vec<Point3>,
    lookup: AHashMap<Key, SmallVec<[VertexId; 1]>>,
}

impl PointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        PointRegistry {
            points: Vec::with_capacity(n),
            lookup: AHashMap::with_capacity(n),
        }
    }

    /// Nearest double of each exact coordinate. Equal points produce equal
    /// keys; only coordinates with a non-trivial enclosure are evaluated.
    fn key(p: &Point3) -> Key {
        std::array::from_fn(|i| p.coords[i].nearest_f64().to_bits())
    }

    pub fn insert(&mut self, p: Point3) -> VertexId {
        let key = Self::key(&p);
        let bucket = self.lookup.entry(key).or_default();
        if let Some(&id) = bucket.iter().find(|&&id| self.points[id.idx()].eq_exact(&p)) {
            return id;
        }
        let id = VertexId::new(self.points.len());
        self.points.push(p);
        bucket.push(id);
        id
    }

    /// Id of an exactly equal point, if registered.
    pub fn find(&self, p: &Point3) -> Option<VertexId> {
        self.lookup
            .get(&Self::key(p))?
            .iter()
            .copied()
            .find(|id| self.points[id.idx()].eq_exact(p))
    }

    #[inline]
    pub fn at(&self, id: VertexId) -> &Point3 {
        &self.points[id.idx()]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }
}
