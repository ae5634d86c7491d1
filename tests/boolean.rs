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
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use corefine::{BooleanConfig, BooleanError, BooleanOp, Point3, Region, TriangleSoup, VertexId, Warnings};

fn cuboid(lo: [f64; 3], hi: [f64; 3], payload: u8) -> TriangleSoup<u8> {
    let mut s = TriangleSoup::new();
    let v: Vec<VertexId> = (0..8)
        .map(|i| {
            let pick = |k: usize| if i & (1 << k) == 0 { lo[k] } else { hi[k] };
            s.add_vertex(Point3::from_f64(pick(0), pick(1), pick(2)))
        })
        .collect();
    for q in [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ] {
        s.add_face([v[q[0]], v[q[1]], v[q[2]]], payload);
        s.add_face([v[q[0]], v[q[2]], v[q[3]]], payload);
    }
    s
}

fn octahedron(c: [f64; 3], r: f64, payload: u8) -> TriangleSoup<u8> {
    let mut s = TriangleSoup::new();
    let mut at = |d: [f64; 3]| s.add_vertex(Point3::from_f64(c[0] + d[0], c[1] + d[1], c[2] + d[2]));
    let px = at([r, 0.0, 0.0]);
    let nx = at([-r, 0.0, 0.0]);
    let py = at([0.0, r, 0.0]);
    let ny = at([0.0, -r, 0.0]);
    let pz = at([0.0, 0.0, r]);
    let nz = at([0.0, 0.0, -r]);
    for [a, b, c] in [
        [px, py, pz],
        [py, nx, pz],
        [nx, ny, pz],
        [ny, px, pz],
        [py, px, nz],
        [nx, py, nz],
        [ny, nx, nz],
        [px, ny, nz],
    ] {
        s.add_face([a, b, c], payload);
    }
    s
}

fn normal(s: TriangleSoup<u8>) -> Region<u8> {
    Region::normal(s).expect("non-empty boundary")
}

fn boundary(r: Region<u8>) -> TriangleSoup<u8> {
    r.into_boundary().expect("a boundary mesh")
}

/// Every directed edge is matched by exactly one edge running the other way.
fn is_closed(s: &TriangleSoup<u8>) -> bool {
    let mut open: AHashSet<(VertexId, VertexId)> = AHashSet::default();
    for t in &s.faces {
        for i in 0..3 {
            let (a, b) = (t[i], t[(i + 1) % 3]);
            if !open.remove(&(b, a)) && !open.insert((a, b)) {
                return false;
            }
        }
    }
    open.is_empty()
}

#[test]
fn truth_tables_on_symbolic_regions() {
    let regions = [Region::<u8>::empty(), Region::full()];
    for op in BooleanOp::ALL {
        for (x, a) in regions.iter().enumerate() {
            for (y, b) in regions.iter().enumerate() {
                let r = a.boolean(b).apply(op).expect("symbolic operands");
                assert_eq!(r.is_full(), op.truth(x == 1, y == 1), "{op:?} {x} {y}");
                assert_eq!(r.is_empty(), !op.truth(x == 1, y == 1));
            }
        }
    }
}

#[test]
fn full_and_empty_identities() {
    let r = normal(cuboid([0.0; 3], [1.0; 3], 1));
    let (full, empty) = (Region::full(), Region::empty());
    assert_eq!(r.boolean(&full).apply(BooleanOp::Intersection).expect("and"), r);
    assert!(r.boolean(&full).apply(BooleanOp::Union).expect("or").is_full());
    assert_eq!(r.boolean(&empty).apply(BooleanOp::Union).expect("or"), r);
    assert!(r.boolean(&empty).apply(BooleanOp::Intersection).expect("and").is_empty());
    assert_eq!(full.boolean(&r).apply(BooleanOp::Difference).expect("minus"), r.complement());
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(matches!(Region::<u8>::normal(TriangleSoup::new()), Err(BooleanError::EmptyBoundary)));
    assert!(matches!(BooleanOp::try_from(0u8), Err(BooleanError::InvalidOperator(0))));
    assert!(matches!(BooleanOp::try_from(0b1110u8), Ok(BooleanOp::Union)));
}

#[test]
fn disjoint_cubes() {
    let a = normal(cuboid([0.0; 3], [1.0; 3], 1));
    let b = normal(cuboid([2.0, 0.0, 0.0], [3.0, 1.0, 1.0], 2));
    let builder = a.boolean(&b).with_config(BooleanConfig::sequential());
    let union = builder.build(BooleanOp::Union, true).expect("union");
    assert_eq!(union.warnings, Warnings::empty());
    let u = boundary(union.region);
    assert_eq!(u.num_faces(), 24);
    assert!(is_closed(&u));
    assert!((u.approx_area_where(|&p| p == 1) - 6.0).abs() < 1e-9);
    assert!(builder.apply(BooleanOp::Intersection).expect("intersection").is_empty());
    assert_eq!(builder.apply(BooleanOp::Difference).expect("difference"), a);
}

#[test]
fn offset_cubes() {
    let a = normal(cuboid([0.0; 3], [1.0; 3], 1));
    let b = normal(cuboid([0.5, 0.0, 0.0], [1.5, 1.0, 1.0], 2));
    let builder = a.boolean(&b).with_config(BooleanConfig::default().with_threads(2));

    let u = boundary(builder.apply(BooleanOp::Union).expect("union"));
    assert!(is_closed(&u));
    assert!((u.approx_area() - 8.0).abs() < 1e-9);
    assert!((u.approx_area_where(|&p| p == 1) - 5.0).abs() < 1e-9);
    assert!((u.approx_area_where(|&p| p == 2) - 3.0).abs() < 1e-9);

    let i = boundary(builder.apply(BooleanOp::Intersection).expect("intersection"));
    assert!(is_closed(&i));
    assert!((i.approx_area() - 4.0).abs() < 1e-9);
    assert!((i.approx_area_where(|&p| p == 1) - 3.0).abs() < 1e-9);

    let d = boundary(builder.apply(BooleanOp::Difference).expect("difference"));
    assert!(is_closed(&d));
    assert!((d.approx_area() - 4.0).abs() < 1e-9);
    assert!((d.approx_area_where(|&p| p == 2) - 1.0).abs() < 1e-9);

    // Coinciding faces come from the second operand when it is preferred.
    let u2 = boundary(builder.build(BooleanOp::Union, false).expect("union").region);
    assert!((u2.approx_area_where(|&p| p == 2) - 5.0).abs() < 1e-9);
}

#[test]
fn identical_solids_follow_the_truth_table() {
    let a = normal(cuboid([0.0; 3], [1.0; 3], 1));
    let b = normal(cuboid([0.0; 3], [1.0; 3], 2));
    let builder = a.boolean(&b).with_config(BooleanConfig::sequential());
    for op in BooleanOp::ALL {
        let r = builder.apply(op).expect("identical operands");
        let expected = match (op.truth(false, false), op.truth(true, true)) {
            (false, false) => Region::empty(),
            (true, true) => Region::full(),
            (false, true) => a.clone(),
            (true, false) => a.complement(),
        };
        assert_eq!(r, expected, "{op:?}");
    }
}

#[test]
fn union_is_part_of_the_symmetric_difference() {
    let a = normal(cuboid([0.0; 3], [1.0; 3], 1));
    let b = normal(octahedron([0.9, 0.55, 0.45], 0.6, 2));
    let builder = a.boolean(&b);
    let u = boundary(builder.apply(BooleanOp::Union).expect("union"));
    let x = boundary(builder.apply(BooleanOp::SymmetricDifference).expect("xor"));
    assert!(is_closed(&u));
    assert!(u.num_faces() < x.num_faces());

    let key = |s: &TriangleSoup<u8>, t: &[VertexId; 3]| -> [[u64; 3]; 3] {
        let k = t.map(|v| s.point(v).to_f64().map(f64::to_bits));
        let m = (0..3).min_by_key(|&i| k[i]).unwrap_or(0);
        [k[m], k[(m + 1) % 3], k[(m + 2) % 3]]
    };
    let xor_faces: AHashSet<[[u64; 3]; 3]> = x.faces.iter().map(|t| key(&x, t)).collect();
    for t in &u.faces {
        assert!(xor_faces.contains(&key(&u, t)));
    }
    for t in &x.faces {
        assert!(!xor_faces.contains(&key(&x, &[t[0], t[2], t[1]])));
    }
}

#[test]
fn random_mixes_conserve_boundary_area() {
    let a = normal(cuboid([0.0; 3], [1.0; 3], 1));
    let mut rng = StdRng::seed_from_u64(0xc0fe);
    for _ in 0..16 {
        let c: [f64; 3] = std::array::from_fn(|_| rng.random_range(0.2..0.8));
        let r = rng.random_range(0.3..0.8);
        let oct = octahedron(c, r, 2);
        let oct_area = oct.approx_area();
        let b = normal(oct);
        let builder = a.boolean(&b).with_config(BooleanConfig::sequential());
        let union = builder.apply(BooleanOp::Union).expect("union");
        let inter = builder.apply(BooleanOp::Intersection).expect("intersection");
        let area = |x: &Region<u8>| x.boundary().map_or(0.0, TriangleSoup::approx_area);
        // Every boundary face ends up in exactly one of the two results.
        assert!(
            (area(&union) + area(&inter) - 6.0 - oct_area).abs() < 1e-9,
            "centre {c:?} radius {r}"
        );
        if let Some(u) = union.boundary() {
            assert!(is_closed(u), "centre {c:?} radius {r}");
        }
    }
}

/// Tetrahedron with outward faces whatever the order of `p`.
fn tetrahedron(mut p: [[f64; 3]; 4], payload: u8) -> TriangleSoup<u8> {
    let e = |i: usize| std::array::from_fn::<f64, 3, _>(|k| p[i][k] - p[0][k]);
    let (a, b, c) = (e(1), e(2), e(3));
    let det = a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0]) + a[2] * (b[0] * c[1] - b[1] * c[0]);
    if det < 0.0 {
        p.swap(1, 2);
    }
    let mut s = TriangleSoup::new();
    let v: Vec<VertexId> = p.iter().map(|q| s.add_vertex(Point3::from_f64(q[0], q[1], q[2]))).collect();
    for [i, j, k] in [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]] {
        s.add_face([v[i], v[j], v[k]], payload);
    }
    s
}

/// Appends `b` to `a` as one soup.
fn merged(mut a: TriangleSoup<u8>, b: &TriangleSoup<u8>) -> TriangleSoup<u8> {
    let base = a.num_vertices();
    for p in &b.points {
        a.add_vertex(p.clone());
    }
    for (t, &payload) in b.faces.iter().zip(&b.payload) {
        a.add_face(t.map(|v| VertexId::new(base + v.idx())), payload);
    }
    a
}

#[test]
fn solids_touching_at_one_vertex_stay_apart() {
    // Every ray from the first component's leading face grazes the second.
    let a = normal(tetrahedron([[-0.1, 0.1, -0.1], [0.1, -0.1, 0.0], [-0.1, 0.0, 0.0], [0.0, 0.0, -0.1]], 1));
    let b = normal(tetrahedron([[-0.1, 0.0, 0.0], [0.1, 0.0, 0.0], [0.1, -0.1, 0.1], [0.0, 0.1, 0.0]], 2));
    let builder = a.boolean(&b).with_config(BooleanConfig::sequential());

    let union = builder.build(BooleanOp::Union, true).expect("union");
    assert_eq!(union.warnings, Warnings::empty());
    let u = boundary(union.region);
    assert_eq!(u.num_faces(), 8);
    assert!(is_closed(&u));
    assert!(builder.apply(BooleanOp::Intersection).expect("intersection").is_empty());
    assert_eq!(builder.apply(BooleanOp::Difference).expect("difference"), a);
}

#[test]
fn overlapping_shells_raise_a_partial_intersection_warning() {
    // Two nested outward shells in one soup: the slab between them is both in and out.
    let left = merged(cuboid([0.0; 3], [2.0; 3], 1), &cuboid([0.5; 3], [1.5; 3], 1));
    let slab = cuboid([-1.3, -0.7, 0.8], [3.1, 3.9, 1.2], 2);
    let (a, b) = (normal(left), normal(slab));
    let out = a
        .boolean(&b)
        .with_config(BooleanConfig::sequential())
        .build(BooleanOp::Union, true)
        .expect("union with a warning");
    assert_eq!(out.warnings, Warnings::SECOND_MESH_PARTIALLY_INTERSECTS_FIRST);
}

#[test]
fn crossing_traces_are_a_self_intersection() {
    let left = merged(cuboid([0.0; 3], [2.0; 3], 1), &cuboid([1.0, 0.5, 0.0], [3.0, 2.5, 2.0], 1));
    let slab = cuboid([-1.3, -0.7, 0.8], [4.1, 3.9, 1.2], 2);
    let (a, b) = (normal(left), normal(slab));
    let r = a.boolean(&b).with_config(BooleanConfig::sequential()).apply(BooleanOp::Union);
    assert!(matches!(r, Err(BooleanError::SelfIntersection { .. })), "{r:?}");
}

#[test]
fn sliver_on_a_shared_edge_is_degenerate() {
    let mut left = cuboid([0.0; 3], [1.0; 3], 1);
    let m = left.add_vertex(Point3::from_f64(0.5, 0.0, 0.0));
    left.add_face([VertexId::new(0), VertexId::new(1), m], 1);
    let (a, b) = (normal(left), normal(cuboid([0.0; 3], [1.0; 3], 2)));
    let r = a.boolean(&b).with_config(BooleanConfig::sequential()).apply(BooleanOp::Union);
    assert!(matches!(r, Err(BooleanError::DegenerateFace { .. })), "{r:?}");
}

#[test]
fn duplicated_faces_tie_every_ray() {
    let mut right = TriangleSoup::new();
    let t = [[5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [5.0, 1.0, 0.0]].map(|q| right.add_vertex(Point3::from_f64(q[0], q[1], q[2])));
    right.add_face(t, 2);
    right.add_face(t, 2);
    let (a, b) = (normal(cuboid([0.0; 3], [1.0; 3], 1)), normal(right));
    let builder = a.boolean(&b).with_config(BooleanConfig::sequential().with_max_ray_attempts(4));
    let r = builder.apply(BooleanOp::Union);
    assert!(matches!(r, Err(BooleanError::UnresolvedOrientation { unknown: 12, .. })), "{r:?}");
}

#[test]
fn mismatched_sheets_are_inconsistent() {
    let sheet = |flip: bool, payload: u8| {
        let mut s = TriangleSoup::new();
        let p = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]].map(|q| s.add_vertex(Point3::from_f64(q[0], q[1], 0.0)));
        s.add_face(if flip { [p[0], p[2], p[1]] } else { [p[0], p[1], p[2]] }, payload);
        s.add_face([p[0], p[2], p[3]], payload);
        s
    };
    let (a, b) = (normal(sheet(false, 1)), normal(sheet(true, 2)));
    let r = a
        .boolean(&b)
        .with_config(BooleanConfig::sequential())
        .apply(BooleanOp::SymmetricDifference);
    assert!(matches!(r, Err(BooleanError::InconsistentOrientation)), "{r:?}");
}
