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

use corefine::Point3;
use corefine::geometry::query::{SegmentQuery, TriangleQuery};
use corefine::geometry::{Aabb, AabbTree};

#[test]
fn test_aabb_from_union_and_intersection() {
    let p1 = Point3::from_f64(0.0, 1.0, 0.0);
    let p2 = Point3::from_f64(2.0, -1.0, 0.5);
    let a = Aabb::from_points([&p1, &p2]);
    assert_eq!(a.min, [0.0, -1.0, 0.0]);
    assert_eq!(a.max, [2.0, 1.0, 0.5]);

    let b = Aabb::new([0.5, -0.5, 0.0], [2.0, 0.5, 3.0]);
    let u = a.union(&b);
    assert_eq!(u.min, [0.0, -1.0, 0.0]);
    assert_eq!(u.max, [2.0, 1.0, 3.0]);

    let c = Aabb::new([2.5, 2.5, 2.5], [3.0, 3.0, 3.0]);
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
}

#[test]
fn test_aabb_tree_build_and_query() {
    // A row of unit boxes along x.
    let items: Vec<(Aabb, usize)> = (0..64)
        .map(|i| {
            let x = i as f64;
            (Aabb::new([x, 0.0, 0.0], [x + 0.5, 1.0, 1.0]), i)
        })
        .collect();
    let tree = AabbTree::build(items, 2);
    assert_eq!(tree.len(), 64);

    let mut hits: Vec<usize> = tree
        .get_intersecting_leaves(&Aabb::new([9.75, 0.2, 0.2], [12.25, 0.8, 0.8]))
        .into_iter()
        .copied()
        .collect();
    hits.sort_unstable();
    assert_eq!(hits, vec![10, 11, 12]);

    let seg = SegmentQuery::new(&Point3::from_f64(3.25, 0.5, 0.5), &Point3::from_f64(5.25, 0.5, 0.5));
    let mut hits: Vec<usize> = tree.get_intersecting_leaves(&seg).into_iter().copied().collect();
    hits.sort_unstable();
    assert_eq!(hits, vec![3, 4, 5]);

    // A triangle in the plane y = 2 misses every box.
    let tri = TriangleQuery::new(
        &Point3::from_f64(0.0, 2.0, 0.0),
        &Point3::from_f64(64.0, 2.0, 0.0),
        &Point3::from_f64(0.0, 2.0, 1.0),
    );
    assert!(tree.get_intersecting_leaves(&tri).is_empty());
}
