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

use once_cell::sync::OnceCell;

use crate::geometry::aabb::Aabb;
use crate::geometry::aabb_tree::AabbTree;
use crate::geometry::point::Point3;
use crate::mesh::ids::{FaceId, VertexId};

/// An indexed list of triangles with one payload per face.
pub struct TriangleSoup<P> {
    pub points: Vec<Point3>,
    pub faces: Vec<[VertexId; 3]>,
    pub payload: Vec<P>,
    tree: OnceCell<AabbTree<FaceId>>,
}

impl<P> Default for TriangleSoup<P> {
    fn default() -> Self {
        TriangleSoup {
            points: Vec::new(),
            faces: Vec::new(),
            payload: Vec::new(),
            tree: OnceCell::new(),
        }
    }
}

// The face tree is rebuilt on demand, never copied.
impl<P: Clone> Clone for TriangleSoup<P> {
    fn clone(&self) -> Self {
        TriangleSoup {
            points: self.points.clone(),
            faces: self.faces.clone(),
            payload: self.payload.clone(),
            tree: OnceCell::new(),
        }
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for TriangleSoup<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriangleSoup")
            .field("points", &self.points.len())
            .field("faces", &self.faces)
            .field("payload", &self.payload)
            .finish()
    }
}

impl<P> TriangleSoup<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(points: Vec<Point3>, faces: Vec<[VertexId; 3]>, payload: Vec<P>) -> Self {
        debug_assert_eq!(faces.len(), payload.len());
        TriangleSoup {
            points,
            faces,
            payload,
            tree: OnceCell::new(),
        }
    }

    pub fn add_vertex(&mut self, p: Point3) -> VertexId {
        self.tree = OnceCell::new();
        self.points.push(p);
        VertexId::new(self.points.len() - 1)
    }

    pub fn add_face(&mut self, v: [VertexId; 3], payload: P) -> FaceId {
        self.tree = OnceCell::new();
        self.faces.push(v);
        self.payload.push(payload);
        FaceId::new(self.faces.len() - 1)
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[inline]
    pub fn point(&self, v: VertexId) -> &Point3 {
        &self.points[v.idx()]
    }

    pub fn triangle(&self, f: FaceId) -> [&Point3; 3] {
        let t = &self.faces[f.idx()];
        [self.point(t[0]), self.point(t[1]), self.point(t[2])]
    }

    pub fn face_aabb(&self, f: FaceId) -> Aabb {
        Aabb::from_points(self.triangle(f))
    }

    /// Flips the winding of every face.
    pub fn reversed(mut self) -> Self {
        for t in &mut self.faces {
            t.swap(1, 2);
        }
        self.tree = OnceCell::new();
        self
    }

    /// Floating point area of face `f`, for reporting.
    pub fn approx_face_area(&self, f: FaceId) -> f64 {
        let [a, b, c] = self.triangle(f).map(Point3::to_f64);
        let u: [f64; 3] = std::array::from_fn(|i| b[i] - a[i]);
        let v: [f64; 3] = std::array::from_fn(|i| c[i] - a[i]);
        let n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        0.5 * (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt()
    }

    pub fn approx_area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.approx_face_area(FaceId::new(f))).sum()
    }

    /// Total area of the faces whose payload matches `pred`.
    pub fn approx_area_where(&self, pred: impl Fn(&P) -> bool) -> f64 {
        (0..self.faces.len())
            .filter(|&f| pred(&self.payload[f]))
            .map(|f| self.approx_face_area(FaceId::new(f)))
            .sum()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.faces.iter().flatten().map(|&v| self.point(v)))
    }
}

impl<P: Sync> TriangleSoup<P> {
    /// Cached tree over the face boxes.
    pub fn face_tree(&self, parallel_depth: usize) -> &AabbTree<FaceId> {
        self.tree.get_or_init(|| {
            let items = (0..self.faces.len())
                .map(|f| (self.face_aabb(FaceId::new(f)), FaceId::new(f)))
                .collect();
            AabbTree::build(items, parallel_depth)
        })
    }
}
