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

use crate::mesh::ids::VertexId;

/// Undirected edge, smaller endpoint first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
}

impl Edge {
    pub fn new(p: VertexId, q: VertexId) -> Self {
        if p <= q { Edge { a: p, b: q } } else { Edge { a: q, b: p } }
    }

    /// The three edges of a triangle, in winding order.
    pub fn of_triangle(t: &[VertexId; 3]) -> [Edge; 3] {
        [Edge::new(t[0], t[1]), Edge::new(t[1], t[2]), Edge::new(t[2], t[0])]
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.a == v || self.b == v
    }
}

/// `+1` if `t` traverses `from -> to`, `-1` if it traverses `to -> from`,
/// `0` if the edge is not in `t`.
pub fn winding_along(t: &[VertexId; 3], from: VertexId, to: VertexId) -> i8 {
    for i in 0..3 {
        let (p, q) = (t[i], t[(i + 1) % 3]);
        if p == from && q == to {
            return 1;
        }
        if p == to && q == from {
            return -1;
        }
    }
    0
}

/// Vertex of `t` that is not an endpoint of `e`.
pub fn opposite_vertex(t: &[VertexId; 3], e: Edge) -> Option<VertexId> {
    t.iter().copied().find(|&v| !e.contains(v))
}
