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

use crate::boolean::symbolic::{RegionPair, Simplex};
use crate::error::{BooleanError, BooleanResult};
use crate::geometry::point::Point3;
use crate::kernel::construct::{line_line, line_plane};
use crate::mesh::edge::Edge;
use crate::mesh::ids::VertexId;
use crate::mesh::registry::PointRegistry;

/// Canonical name of a constructed point, independent of which triangle
/// pair produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstructionKey {
    EdgeEdge(Edge, Edge),
    EdgePlane(Edge, [VertexId; 3]),
}

impl ConstructionKey {
    fn edge_edge(e: Edge, f: Edge) -> Self {
        if e <= f {
            ConstructionKey::EdgeEdge(e, f)
        } else {
            ConstructionKey::EdgeEdge(f, e)
        }
    }

    fn edge_plane(e: Edge, mut plane: [VertexId; 3]) -> Self {
        plane.sort_unstable();
        ConstructionKey::EdgePlane(e, plane)
    }
}

/// Turns intersection pairs into registry ids, building new points only when
/// neither side names an existing vertex.
pub struct PointConstructor<'r> {
    reg: &'r mut PointRegistry,
    memo: AHashMap<ConstructionKey, VertexId>,
    constructed: usize,
}

impl<'r> PointConstructor<'r> {
    pub fn new(reg: &'r mut PointRegistry) -> Self {
        PointConstructor {
            reg,
            memo: AHashMap::default(),
            constructed: 0,
        }
    }

    /// Number of points created so far (memo hits and existing vertices
    /// excluded).
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    pub fn registry(&self) -> &PointRegistry {
        self.reg
    }

    pub fn point_id(&mut self, a: &[VertexId; 3], b: &[VertexId; 3], r: RegionPair) -> BooleanResult<VertexId> {
        if r.left.dim() == 0 {
            return Ok(r.left.vertices(a)[0]);
        }
        if r.right.dim() == 0 {
            return Ok(r.right.vertices(b)[0]);
        }
        let key = match (r.left.dim(), r.right.dim()) {
            (1, 1) => ConstructionKey::edge_edge(edge_of(r.left, a), edge_of(r.right, b)),
            (1, _) => ConstructionKey::edge_plane(edge_of(r.left, a), *b),
            (_, 1) => ConstructionKey::edge_plane(edge_of(r.right, b), *a),
            _ => {
                return Err(BooleanError::InvalidSimplex(
                    "face/face pair does not name a point".into(),
                ));
            }
        };
        if let Some(&id) = self.memo.get(&key) {
            return Ok(id);
        }
        let p = self.build(&key).ok_or_else(|| {
            BooleanError::InvalidSimplex(format!("{key:?} has no unique intersection"))
        })?;
        let before = self.reg.len();
        let id = self.reg.insert(p);
        if self.reg.len() > before {
            self.constructed += 1;
        }
        self.memo.insert(key, id);
        Ok(id)
    }

    fn build(&self, key: &ConstructionKey) -> Option<Point3> {
        let at = |v: VertexId| self.reg.at(v);
        match *key {
            ConstructionKey::EdgeEdge(e, f) => line_line(at(e.a), at(e.b), at(f.a), at(f.b)),
            ConstructionKey::EdgePlane(e, t) => line_plane(at(e.a), at(e.b), at(t[0]), at(t[1]), at(t[2])),
        }
    }
}

fn edge_of(s: Simplex, t: &[VertexId; 3]) -> Edge {
    let v = s.vertices(t);
    Edge::new(v[0], v[1])
}
