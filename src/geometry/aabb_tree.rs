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

use crate::geometry::aabb::Aabb;
use crate::geometry::query::Overlap;

/// Child of an inner node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeRef {
    Leaf(usize),
    Inner(usize),
}

#[derive(Clone, Debug)]
struct Inner {
    aabb: Aabb,
    left: NodeRef,
    right: NodeRef,
}

/// A static AABB-tree of generic data `D`.
///
/// Leaves and inner nodes live in two arenas. Inner nodes are stored in
/// preorder, so the subtree over `k` leaves at inner index `i` occupies
/// `i..i + k - 1`.
#[derive(Clone, Debug)]
pub struct AabbTree<D> {
    leaves: Vec<(Aabb, D)>,
    inner: Vec<Inner>,
}

impl<D: Send> AabbTree<D> {
    /// Build over `(aabb, data)` pairs by recursive longest-axis median split.
    /// Forks with `rayon::join` for the first `parallel_depth` levels.
    pub fn build(mut items: Vec<(Aabb, D)>, parallel_depth: usize) -> Self {
        let n = items.len();
        let mut inner: Vec<Option<Inner>> = Vec::new();
        inner.resize_with(n.saturating_sub(1), || None);
        if n > 1 {
            build_range(&mut items, 0, &mut inner, 0, 0, parallel_depth);
        }
        AabbTree {
            leaves: items,
            inner: inner.into_iter().flatten().collect(),
        }
    }
}

impl<D> AabbTree<D> {
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    fn root(&self) -> Option<NodeRef> {
        match self.leaves.len() {
            0 => None,
            1 => Some(NodeRef::Leaf(0)),
            _ => Some(NodeRef::Inner(0)),
        }
    }

    fn node_aabb(&self, n: NodeRef) -> &Aabb {
        match n {
            NodeRef::Leaf(i) => &self.leaves[i].0,
            NodeRef::Inner(i) => &self.inner[i].aabb,
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.root().map(|r| *self.node_aabb(r))
    }

    /// Collect all `&D` whose box passes `query`.
    pub fn get_intersecting_leaves<Q: Overlap + ?Sized>(&self, query: &Q) -> Vec<&D> {
        let mut out = Vec::new();
        let Some(root) = self.root() else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            if !query.overlaps(self.node_aabb(n)) {
                continue;
            }
            match n {
                NodeRef::Leaf(i) => out.push(&self.leaves[i].1),
                NodeRef::Inner(i) => {
                    stack.push(self.inner[i].right);
                    stack.push(self.inner[i].left);
                }
            }
        }
        out
    }
}

/// Builds the subtree over `items` (leaf offset `leaf_base`) into
/// `inner[0..]`, whose global index is `inner_base`. Returns its aabb.
fn build_range<D: Send>(
    items: &mut [(Aabb, D)],
    leaf_base: usize,
    inner: &mut [Option<Inner>],
    inner_base: usize,
    depth: usize,
    parallel_depth: usize,
) -> Aabb {
    let n = items.len();
    debug_assert!(n >= 2 && inner.len() == n - 1);

    let bounds = items
        .iter()
        .fold(Aabb::empty(), |acc, (b, _)| acc.union(b));
    let mid = n / 2;
    if n > 2 {
        let axis = centroid_bounds(items).longest_axis();
        items.select_nth_unstable_by(mid, |a, b| a.0.center(axis).total_cmp(&b.0.center(axis)));
    }

    let (left_items, right_items) = items.split_at_mut(mid);
    let (slot, rest) = inner.split_at_mut(1);
    let (left_inner, right_inner) = rest.split_at_mut(mid.saturating_sub(1));

    let left_ref = if mid == 1 {
        NodeRef::Leaf(leaf_base)
    } else {
        NodeRef::Inner(inner_base + 1)
    };
    let right_ref = if n - mid == 1 {
        NodeRef::Leaf(leaf_base + mid)
    } else {
        NodeRef::Inner(inner_base + mid)
    };

    let build_left = |li: &mut [(Aabb, D)], ln: &mut [Option<Inner>]| {
        if li.len() > 1 {
            build_range(li, leaf_base, ln, inner_base + 1, depth + 1, parallel_depth);
        }
    };
    let build_right = |ri: &mut [(Aabb, D)], rn: &mut [Option<Inner>]| {
        if ri.len() > 1 {
            build_range(ri, leaf_base + mid, rn, inner_base + mid, depth + 1, parallel_depth);
        }
    };

    if depth < parallel_depth {
        rayon::join(
            || build_left(left_items, left_inner),
            || build_right(right_items, right_inner),
        );
    } else {
        build_left(left_items, left_inner);
        build_right(right_items, right_inner);
    }

    slot[0] = Some(Inner {
        aabb: bounds,
        left: left_ref,
        right: right_ref,
    });
    bounds
}

fn centroid_bounds<D>(items: &[(Aabb, D)]) -> Aabb {
    items.iter().fold(Aabb::empty(), |acc, (b, _)| {
        let c: [f64; 3] = std::array::from_fn(|i| b.center(i));
        acc.union(&Aabb::new(c, c))
    })
}
