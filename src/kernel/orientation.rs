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

//! Filtered exact orientation predicates.
//!
//! Each predicate evaluates its determinant on the coordinate enclosures
//! first and only falls back to `rug::Rational` arithmetic when the interval
//! straddles zero.

use std::cmp::Ordering;

use rug::Rational;

use crate::geometry::point::{Point2, Point3};
use crate::numeric::ball::Ball;

#[inline]
fn sign_of(r: &Rational) -> i8 {
    match r.cmp0() {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

#[inline]
fn sub_q(a: &Rational, b: &Rational) -> Rational {
    Rational::from(a - b)
}

#[inline]
fn mul_q(a: &Rational, b: &Rational) -> Rational {
    Rational::from(a * b)
}

/// Returns:
/// - >0 if counter-clockwise
/// - <0 if clockwise
/// - =0 if collinear
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    let f = |p: &Point2| [p[0].approx(), p[1].approx()];
    let (fa, fb, fc) = (f(a), f(b), f(c));
    let det = fb[0]
        .sub(fa[0])
        .mul(fc[1].sub(fa[1]))
        .sub(fb[1].sub(fa[1]).mul(fc[0].sub(fa[0])));
    if let Some(s) = det.sign_if_certain() {
        return s;
    }

    let (ax, ay) = (a[0].exact(), a[1].exact());
    let bx = sub_q(b[0].exact(), ax);
    let by = sub_q(b[1].exact(), ay);
    let cx = sub_q(c[0].exact(), ax);
    let cy = sub_q(c[1].exact(), ay);
    sign_of(&sub_q(&mul_q(&bx, &cy), &mul_q(&by, &cx)))
}

/// Sign of `((b - a) × (c - a)) · (d - a)`: positive when `d` lies on the
/// side the counter-clockwise normal of `abc` points to.
pub fn orient3d(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> i8 {
    let (fa, fb, fc, fd) = (a.approx(), b.approx(), c.approx(), d.approx());
    let u: [Ball; 3] = std::array::from_fn(|i| fb[i].sub(fa[i]));
    let v: [Ball; 3] = std::array::from_fn(|i| fc[i].sub(fa[i]));
    let w: [Ball; 3] = std::array::from_fn(|i| fd[i].sub(fa[i]));
    let det = u[1]
        .mul(v[2])
        .sub(u[2].mul(v[1]))
        .mul(w[0])
        .add(u[2].mul(v[0]).sub(u[0].mul(v[2])).mul(w[1]))
        .add(u[0].mul(v[1]).sub(u[1].mul(v[0])).mul(w[2]));
    if let Some(s) = det.sign_if_certain() {
        return s;
    }

    let q = |p: &Point3| -> [Rational; 3] {
        std::array::from_fn(|i| sub_q(p.coords[i].exact(), a.coords[i].exact()))
    };
    let (u, v, w) = (q(b), q(c), q(d));
    let n0 = sub_q(&mul_q(&u[1], &v[2]), &mul_q(&u[2], &v[1]));
    let n1 = sub_q(&mul_q(&u[2], &v[0]), &mul_q(&u[0], &v[2]));
    let n2 = sub_q(&mul_q(&u[0], &v[1]), &mul_q(&u[1], &v[0]));
    let det = Rational::from(&mul_q(&n0, &w[0]) + &mul_q(&n1, &w[1]));
    sign_of(&Rational::from(&det + &mul_q(&n2, &w[2])))
}

/// Positive when `d` lies strictly inside the circle through the
/// counter-clockwise triangle `abc`, negative outside, zero on it.
pub fn incircle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> i8 {
    let f = |p: &Point2| [p[0].approx(), p[1].approx()];
    let (fa, fb, fc, fd) = (f(a), f(b), f(c), f(d));
    let rel = |p: [Ball; 2]| {
        let x = p[0].sub(fd[0]);
        let y = p[1].sub(fd[1]);
        (x, y, x.mul(x).add(y.mul(y)))
    };
    let (ax, ay, al) = rel(fa);
    let (bx, by, bl) = rel(fb);
    let (cx, cy, cl) = rel(fc);
    let det = al
        .mul(bx.mul(cy).sub(cx.mul(by)))
        .add(bl.mul(cx.mul(ay).sub(ax.mul(cy))))
        .add(cl.mul(ax.mul(by).sub(bx.mul(ay))));
    if let Some(s) = det.sign_if_certain() {
        return s;
    }

    let rel = |p: &Point2| {
        let x = sub_q(p[0].exact(), d[0].exact());
        let y = sub_q(p[1].exact(), d[1].exact());
        let l = Rational::from(&mul_q(&x, &x) + &mul_q(&y, &y));
        (x, y, l)
    };
    let (ax, ay, al) = rel(a);
    let (bx, by, bl) = rel(b);
    let (cx, cy, cl) = rel(c);
    let t0 = mul_q(&al, &sub_q(&mul_q(&bx, &cy), &mul_q(&cx, &by)));
    let t1 = mul_q(&bl, &sub_q(&mul_q(&cx, &ay), &mul_q(&ax, &cy)));
    let t2 = mul_q(&cl, &sub_q(&mul_q(&ax, &by), &mul_q(&bx, &ay)));
    let det = Rational::from(&t0 + &t1);
    sign_of(&Rational::from(&det + &t2))
}

/// `incircle` with cocircular ties broken by a symbolic lift of each point,
/// where a smaller `rank` dominates. Equivalent to lifting point `i` by
/// `ε^(rank_i)` on the paraboloid, so every consumer sharing the ranks builds
/// the same Delaunay triangulation. Never returns 0 for four distinct points
/// in convex position.
pub fn incircle_perturbed(p: [&Point2; 4], rank: [u32; 4]) -> i8 {
    let s = incircle(p[0], p[1], p[2], p[3]);
    if s != 0 {
        return s;
    }
    let mut order = [0usize, 1, 2, 3];
    order.sort_by_key(|&i| rank[i]);
    for &m in &order {
        // Cofactor of the lifted column for row m.
        let s = match m {
            0 => orient2d(p[1], p[2], p[3]),
            1 => -orient2d(p[0], p[2], p[3]),
            2 => orient2d(p[0], p[1], p[3]),
            _ => -orient2d(p[0], p[1], p[2]),
        };
        if s != 0 {
            return s;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::lazy_exact::LazyExact;

    fn p2(x: f64, y: f64) -> Point2 {
        Point2 {
            coords: [LazyExact::from_f64(x), LazyExact::from_f64(y)],
        }
    }

    #[test]
    fn ccw_test() {
        assert_eq!(orient2d(&p2(0.0, 0.0), &p2(1.0, 0.0), &p2(0.0, 1.0)), 1);
        assert_eq!(orient2d(&p2(0.0, 0.0), &p2(0.0, 1.0), &p2(1.0, 0.0)), -1);
        assert_eq!(orient2d(&p2(0.0, 0.0), &p2(1.0, 1.0), &p2(3.0, 3.0)), 0);
    }

    #[test]
    fn near_collinear_is_decided_exactly() {
        // Classic floating point failure: points almost on y = x.
        let a = p2(0.5, 0.5);
        let b = p2(12.0, 12.0);
        let c = p2(24.0, 24.0 + 2f64.powi(-48));
        assert_eq!(orient2d(&a, &b, &c), 1);
        let c = p2(24.0, 24.0);
        assert_eq!(orient2d(&a, &b, &c), 0);
    }

    #[test]
    fn orientation_3d_signs() {
        let a = Point3::from_f64(0.0, 0.0, 0.0);
        let b = Point3::from_f64(1.0, 0.0, 0.0);
        let c = Point3::from_f64(0.0, 1.0, 0.0);
        assert_eq!(orient3d(&a, &b, &c, &Point3::from_f64(0.0, 0.0, 1.0)), 1);
        assert_eq!(orient3d(&a, &b, &c, &Point3::from_f64(0.0, 0.0, -1.0)), -1);
        assert_eq!(orient3d(&a, &b, &c, &Point3::from_f64(1.0, 1.0, 0.0)), 0);
    }

    #[test]
    fn orientation_3d_with_constructed_point() {
        let a = Point3::from_f64(0.0, 0.0, 0.0);
        let b = Point3::from_f64(1.0, 0.0, 0.0);
        let c = Point3::from_f64(0.0, 1.0, 0.0);
        // (1/3, 1/3, 0) built through divisions sits exactly on the plane.
        let g = Point3::centroid(&a, &b, &c);
        assert_eq!(orient3d(&a, &b, &c, &g), 0);
    }

    #[test]
    fn incircle_signs_and_ties() {
        let a = p2(1.0, 0.0);
        let b = p2(0.0, 1.0);
        let c = p2(-1.0, 0.0);
        assert_eq!(incircle(&a, &b, &c, &p2(0.0, 0.0)), 1);
        assert_eq!(incircle(&a, &b, &c, &p2(2.0, 2.0)), -1);
        let d = p2(0.0, -1.0);
        assert_eq!(incircle(&a, &b, &c, &d), 0);
        // Lifting d (lowest rank) pushes it outside.
        assert_eq!(incircle_perturbed([&a, &b, &c, &d], [3, 4, 5, 0]), -1);
        // Lifting a pulls d inside.
        assert_eq!(incircle_perturbed([&a, &b, &c, &d], [0, 4, 5, 3]), 1);
    }
}
