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

use std::ops::Index;

use rug::Rational;

use crate::numeric::ball::Ball;
use crate::numeric::lazy_exact::LazyExact;

/// A point in 3D whose coordinates are lazy-exact scalars.
#[derive(Clone, Debug)]
pub struct Point3 {
    pub coords: [LazyExact; 3],
}

/// A point in a 2D projection of some plane.
#[derive(Clone, Debug)]
pub struct Point2 {
    pub coords: [LazyExact; 2],
}

impl Point3 {
    pub fn new(x: LazyExact, y: LazyExact, z: LazyExact) -> Self {
        Point3 { coords: [x, y, z] }
    }

    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Point3::new(x.into(), y.into(), z.into())
    }

    pub fn from_rationals(x: Rational, y: Rational, z: Rational) -> Self {
        Point3::new(x.into(), y.into(), z.into())
    }

    pub fn approx(&self) -> [Ball; 3] {
        std::array::from_fn(|i| self.coords[i].approx())
    }

    /// Midpoint of the coordinate enclosures, for reporting and boxes.
    pub fn to_f64(&self) -> [f64; 3] {
        std::array::from_fn(|i| self.coords[i].approx().m)
    }

    /// Outward-rounded bounds of this point, per axis.
    pub fn bounds(&self) -> ([f64; 3], [f64; 3]) {
        let a = self.approx();
        (
            std::array::from_fn(|i| a[i].lo()),
            std::array::from_fn(|i| a[i].hi()),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(LazyExact::is_finite)
    }

    pub fn eq_exact(&self, other: &Point3) -> bool {
        (0..3).all(|i| self.coords[i].eq_exact(&other.coords[i]))
    }

    /// Drops coordinate `drop`, keeping the remaining two in cyclic order so
    /// that a face whose normal has a positive `drop` component projects
    /// counter-clockwise.
    pub fn project(&self, drop: usize) -> Point2 {
        let (i0, i1) = projection_axes(drop);
        Point2 {
            coords: [self.coords[i0].clone(), self.coords[i1].clone()],
        }
    }

    pub fn sub(&self, other: &Point3) -> [LazyExact; 3] {
        std::array::from_fn(|i| &self.coords[i] - &other.coords[i])
    }

    pub fn add_scaled(&self, dir: &[LazyExact; 3], t: &LazyExact) -> Point3 {
        Point3 {
            coords: std::array::from_fn(|i| &self.coords[i] + &(&dir[i] * t)),
        }
    }

    pub fn centroid(a: &Point3, b: &Point3, c: &Point3) -> Point3 {
        let three = LazyExact::from_i32(3);
        Point3 {
            coords: std::array::from_fn(|i| {
                &(&(&a.coords[i] + &b.coords[i]) + &c.coords[i]) / &three
            }),
        }
    }
}

impl Index<usize> for Point3 {
    type Output = LazyExact;
    fn index(&self, i: usize) -> &Self::Output {
        &self.coords[i]
    }
}

impl Index<usize> for Point2 {
    type Output = LazyExact;
    fn index(&self, i: usize) -> &Self::Output {
        &self.coords[i]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(c: [f64; 3]) -> Self {
        Point3::from_f64(c[0], c[1], c[2])
    }
}

pub fn projection_axes(drop: usize) -> (usize, usize) {
    ((drop + 1) % 3, (drop + 2) % 3)
}

pub fn cross(a: &[LazyExact; 3], b: &[LazyExact; 3]) -> [LazyExact; 3] {
    [
        &(&a[1] * &b[2]) - &(&a[2] * &b[1]),
        &(&a[2] * &b[0]) - &(&a[0] * &b[2]),
        &(&a[0] * &b[1]) - &(&a[1] * &b[0]),
    ]
}

pub fn dot(a: &[LazyExact; 3], b: &[LazyExact; 3]) -> LazyExact {
    &(&(&a[0] * &b[0]) + &(&a[1] * &b[1])) + &(&a[2] * &b[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_keeps_cyclic_order() {
        assert_eq!(projection_axes(2), (0, 1));
        assert_eq!(projection_axes(0), (1, 2));
        assert_eq!(projection_axes(1), (2, 0));
    }

    #[test]
    fn centroid_is_exact() {
        let a = Point3::from_f64(0.0, 0.0, 0.0);
        let b = Point3::from_f64(1.0, 0.0, 0.0);
        let c = Point3::from_f64(0.0, 1.0, 0.0);
        let g = Point3::centroid(&a, &b, &c);
        let third = LazyExact::from_rational(Rational::from((1, 3)));
        assert!(g.coords[0].eq_exact(&third));
        assert!(g.coords[1].eq_exact(&third));
        assert_eq!(g.coords[2].sign(), 0);
    }
}
