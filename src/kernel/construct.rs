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

//! Exact constructions. Every coordinate produced here is a lazy-exact
//! expression over the input coordinates, so predicates on constructed
//! points stay exact.

use crate::geometry::point::{Point3, cross, dot};

/// Intersection of the line through `q0, q1` with the plane through
/// `p0, p1, p2`. `None` when the line is parallel to the plane.
pub fn line_plane(q0: &Point3, q1: &Point3, p0: &Point3, p1: &Point3, p2: &Point3) -> Option<Point3> {
    let n = cross(&p1.sub(p0), &p2.sub(p0));
    let s0 = dot(&n, &q0.sub(p0));
    let s1 = dot(&n, &q1.sub(p0));
    let denom = &s0 - &s1;
    if denom.sign() == 0 {
        return None;
    }
    let t = &s0 / &denom;
    Some(q0.add_scaled(&q1.sub(q0), &t))
}

/// Intersection of the coplanar lines `a0 a1` and `b0 b1`. `None` when the
/// lines are parallel.
pub fn line_line(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> Option<Point3> {
    let d1 = a1.sub(a0);
    let d2 = b1.sub(b0);
    let n = cross(&d1, &d2);
    let nn = dot(&n, &n);
    if nn.sign() == 0 {
        return None;
    }
    let t = &dot(&cross(&b0.sub(a0), &d2), &n) / &nn;
    Some(a0.add_scaled(&d1, &t))
}
