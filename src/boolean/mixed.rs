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

use ahash::AHashSet;
use tracing::debug;

use crate::boolean::corefine::{Corefined, Piece};
use crate::mesh::edge::Edge;
use crate::mesh::ids::FaceId;
use crate::mesh::indexed::IndexedMesh;
use crate::mesh::soup::TriangleSoup;

/// Classification of a corefined face against the other operand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaceTag {
    Unknown,
    /// Outside the other solid.
    Exterior,
    /// Inside the other solid.
    Interior,
    /// Coincides with a face of the other operand, same orientation.
    Coplanar,
    /// Coincides with a face of the other operand, reversed orientation.
    Opposite,
}

impl FaceTag {
    pub fn is_terminal(self) -> bool {
        self != FaceTag::Unknown
    }
}

#[derive(Clone, Debug)]
pub struct MixedFace<P> {
    pub from_left: bool,
    pub tag: FaceTag,
    pub payload: P,
}

/// Both corefined operands in one indexed mesh, left faces first.
#[derive(Debug)]
pub struct MixedMesh<P> {
    pub mesh: IndexedMesh<MixedFace<P>>,
    pub left_faces: usize,
    /// Edges used by faces of both operands: the intersection curve plus
    /// any edges the operands had in common.
    pub shared_edges: AHashSet<Edge>,
}

impl<P: Clone> MixedMesh<P> {
    pub fn assemble(c: Corefined, left: &TriangleSoup<P>, right: &TriangleSoup<P>) -> Self {
        let Corefined {
            points,
            left: lp,
            right: rp,
            ..
        } = c;
        let edges = |pieces: &[Piece]| -> AHashSet<Edge> {
            pieces.iter().flat_map(|p| Edge::of_triangle(&p.vertices)).collect()
        };
        let (le, re) = (edges(&lp), edges(&rp));
        let shared_edges: AHashSet<Edge> = le.intersection(&re).copied().collect();

        let left_faces = lp.len();
        let mut faces = Vec::with_capacity(lp.len() + rp.len());
        let mut payload = Vec::with_capacity(lp.len() + rp.len());
        for (pieces, soup, from_left) in [(&lp, left, true), (&rp, right, false)] {
            for p in pieces {
                faces.push(p.vertices);
                payload.push(MixedFace {
                    from_left,
                    tag: FaceTag::Unknown,
                    payload: soup.payload[p.parent.idx()].clone(),
                });
            }
        }
        let mut mesh = IndexedMesh::new(TriangleSoup::from_parts(points, faces, payload));
        mesh.finalize();
        debug!(
            faces = mesh.num_faces(),
            left_faces,
            shared_edges = shared_edges.len(),
            "mixed mesh assembled"
        );
        MixedMesh {
            mesh,
            left_faces,
            shared_edges,
        }
    }
}

impl<P> MixedMesh<P> {
    pub fn num_faces(&self) -> usize {
        self.mesh.num_faces()
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.mesh.num_faces()).map(FaceId::new)
    }

    #[inline]
    pub fn tag(&self, f: FaceId) -> FaceTag {
        self.mesh.data(f).tag
    }

    #[inline]
    pub fn from_left(&self, f: FaceId) -> bool {
        f.idx() < self.left_faces
    }

    pub fn is_shared(&self, e: Edge) -> bool {
        self.shared_edges.contains(&e)
    }

    pub fn unknown_count(&self) -> usize {
        self.face_ids().filter(|&f| self.tag(f) == FaceTag::Unknown).count()
    }
}
