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

use smallvec::SmallVec;

use crate::mesh::edge::Edge;
use crate::mesh::ids::{FaceId, VertexId};
use crate::mesh::soup::TriangleSoup;

/// A triangle soup with a vertex to incident-faces index.
#[derive(Debug)]
pub struct IndexedMesh<P> {
    soup: TriangleSoup<P>,
    offsets: Vec<u32>,
    incident: Vec<FaceId>,
    finalized: bool,
}

impl<P> IndexedMesh<P> {
    pub fn new(soup: TriangleSoup<P>) -> Self {
        IndexedMesh {
            soup,
            offsets: Vec::new(),
            incident: Vec::new(),
            finalized: false,
        }
    }

    /// Builds the CSR index. Incident lists are sorted by face id.
    pub fn finalize(&mut self) {
        let n = self.soup.points.len();
        let mut counts = vec![0u32; n + 1];
        for t in &self.soup.faces {
            for v in t {
                counts[v.idx() + 1] += 1;
            }
        }
        for i in 0..n {
            counts[i + 1] += counts[i];
        }
        let mut cursor = counts.clone();
        let mut incident = vec![FaceId::INVALID; counts[n] as usize];
        for (f, t) in self.soup.faces.iter().enumerate() {
            for v in t {
                let slot = &mut cursor[v.idx()];
                incident[*slot as usize] = FaceId::new(f);
                *slot += 1;
            }
        }
        self.offsets = counts;
        self.incident = incident;
        self.finalized = true;
    }

    pub fn soup(&self) -> &TriangleSoup<P> {
        &self.soup
    }

    /// Mutable access drops the index.
    pub fn soup_mut(&mut self) -> &mut TriangleSoup<P> {
        self.finalized = false;
        &mut self.soup
    }

    pub fn into_soup(self) -> TriangleSoup<P> {
        self.soup
    }

    pub fn num_faces(&self) -> usize {
        self.soup.faces.len()
    }

    #[inline]
    pub fn face(&self, f: FaceId) -> &[VertexId; 3] {
        &self.soup.faces[f.idx()]
    }

    #[inline]
    pub fn data(&self, f: FaceId) -> &P {
        &self.soup.payload[f.idx()]
    }

    #[inline]
    pub fn data_mut(&mut self, f: FaceId) -> &mut P {
        &mut self.soup.payload[f.idx()]
    }

    pub fn vertex_faces(&self, v: VertexId) -> &[FaceId] {
        debug_assert!(self.finalized, "IndexedMesh queried before finalize()");
        let (s, e) = (self.offsets[v.idx()], self.offsets[v.idx() + 1]);
        &self.incident[s as usize..e as usize]
    }

    /// Faces containing both endpoints of `e`, by merging the sorted lists.
    pub fn incident_faces(&self, e: Edge) -> SmallVec<[FaceId; 4]> {
        let (fa, fb) = (self.vertex_faces(e.a), self.vertex_faces(e.b));
        let mut out = SmallVec::new();
        let (mut i, mut j) = (0, 0);
        while i < fa.len() && j < fb.len() {
            match fa[i].cmp(&fb[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(fa[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::soup::tests::cuboid;

    #[test]
    fn every_cube_edge_has_two_faces() {
        let mut m = IndexedMesh::new(cuboid([0.0; 3], [1.0; 3], 0u8));
        m.finalize();
        for f in 0..m.num_faces() {
            for e in Edge::of_triangle(m.face(FaceId::new(f))) {
                let inc = m.incident_faces(e);
                assert_eq!(inc.len(), 2, "edge {e:?}");
                assert!(inc.contains(&FaceId::new(f)));
            }
        }
        assert_eq!(m.vertex_faces(VertexId(0)).len(), 6);
    }
}
