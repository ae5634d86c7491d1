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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use corefine::geometry::ray::count_crossings;
use corefine::{BooleanOp, Point3, Region, TriangleSoup, VertexId};

fn tetrahedron(p: [[f64; 3]; 4]) -> TriangleSoup<()> {
    let mut s = TriangleSoup::new();
    let v: Vec<VertexId> = p.iter().map(|c| s.add_vertex(Point3::from(*c))).collect();
    for [a, b, c] in [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]] {
        s.add_face([v[a], v[b], v[c]], ());
    }
    s
}

fn random_direction(rng: &mut StdRng) -> [f64; 3] {
    std::array::from_fn(|_| rng.random_range(-1.0..1.0))
}

#[test]
fn rays_from_inside_a_tetrahedron_cross_once() {
    let tet = tetrahedron([[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
    let mut rng = StdRng::seed_from_u64(7);
    let mut counted = 0;
    for _ in 0..200 {
        // Barycentric weights keep the origin strictly inside.
        let w: [f64; 4] = std::array::from_fn(|_| rng.random_range(0.05..1.0));
        let sum: f64 = w.iter().sum();
        let o = [4.0 * w[1] / sum, 4.0 * w[2] / sum, 4.0 * w[3] / sum];
        let d = random_direction(&mut rng);
        let through = [o[0] + d[0], o[1] + d[1], o[2] + d[2]];
        if let Some(n) = count_crossings(&tet, &Point3::from(o), &Point3::from(through)) {
            assert_eq!(n, 1);
            counted += 1;
        }
    }
    assert!(counted > 150);
}

#[test]
fn parity_holds_on_a_boolean_result() {
    let a = tetrahedron([[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
    let b = tetrahedron([[1.0, 1.0, 1.0], [5.0, 1.25, 0.75], [0.75, 5.0, 1.25], [1.25, 0.75, 5.0]]);
    let (ra, rb) = (Region::normal(a).expect("a"), Region::normal(b).expect("b"));
    let Region::Normal(u) = ra.boolean(&rb).apply(BooleanOp::Union).expect("union") else {
        panic!("union of overlapping solids has a boundary");
    };

    let mut rng = StdRng::seed_from_u64(11);
    let mut counted = 0;
    for _ in 0..200 {
        // Points near the first solid's corner stay inside the union.
        let o: [f64; 3] = std::array::from_fn(|_| rng.random_range(0.05..0.5));
        let d = random_direction(&mut rng);
        let through = [o[0] + d[0], o[1] + d[1], o[2] + d[2]];
        if let Some(n) = count_crossings(&u, &Point3::from(o), &Point3::from(through)) {
            assert_eq!(n % 2, 1, "origin {o:?} direction {d:?}");
            counted += 1;
        }
    }
    assert!(counted > 150);
}
