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

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rug::Rational;

use crate::numeric::ball::Ball;

/// A lazily-evaluated scalar expression:
/// - Stores a conservative interval (`Ball`) eagerly
/// - Computes the exact `rug::Rational` only on demand, memoized
///
/// Expression nodes are immutable and shared via `Arc`, so constructed
/// coordinates form a DAG over the input coordinates.
#[derive(Clone)]
pub struct LazyExact(Arc<Node>);

struct Node {
    kind: Kind,
    approx: Ball,
    exact: OnceCell<Rational>,
}

enum Kind {
    LeafF64(f64),
    LeafExact,
    Add(LazyExact, LazyExact),
    Sub(LazyExact, LazyExact),
    Mul(LazyExact, LazyExact),
    Div(LazyExact, LazyExact),
    Neg(LazyExact),
}

impl LazyExact {
    /* ========= Constructors ========= */

    pub fn from_f64(v: f64) -> Self {
        // -0.0 and 0.0 are the same number; keep one representation.
        let v = if v == 0.0 { 0.0 } else { v };
        LazyExact(Arc::new(Node {
            kind: Kind::LeafF64(v),
            approx: if v.is_finite() {
                Ball::from_f64(v)
            } else {
                Ball::unknown()
            },
            exact: OnceCell::new(),
        }))
    }

    pub fn from_i32(v: i32) -> Self {
        Self::from_f64(v as f64)
    }

    pub fn from_rational(r: Rational) -> Self {
        let m = r.to_f64();
        let approx = match Rational::from_f64(m) {
            Some(back) if back == r => Ball::from_f64(m),
            _ => Ball::rounded(m),
        };
        let exact = OnceCell::new();
        let _ = exact.set(r);
        LazyExact(Arc::new(Node {
            kind: Kind::LeafExact,
            approx,
            exact,
        }))
    }

    /* ========= Basic queries ========= */

    /// False when some input of the expression was NaN or an infinity.
    pub fn is_finite(&self) -> bool {
        match &self.0.kind {
            Kind::LeafF64(v) => v.is_finite(),
            Kind::LeafExact => true,
            Kind::Add(a, b) | Kind::Sub(a, b) | Kind::Mul(a, b) | Kind::Div(a, b) => a.is_finite() && b.is_finite(),
            Kind::Neg(a) => a.is_finite(),
        }
    }

    /// Cheap conservative enclosure (always available).
    #[inline]
    pub fn approx(&self) -> Ball {
        self.0.approx
    }

    /// Exact value; computed lazily and cached.
    pub fn exact(&self) -> &Rational {
        self.0.exact.get_or_init(|| match &self.0.kind {
            Kind::LeafF64(v) => Rational::from_f64(*v).unwrap_or_default(),
            // Leaf exact values are seeded at construction.
            Kind::LeafExact => Rational::new(),
            Kind::Add(a, b) => Rational::from(a.exact() + b.exact()),
            Kind::Sub(a, b) => Rational::from(a.exact() - b.exact()),
            Kind::Mul(a, b) => Rational::from(a.exact() * b.exact()),
            Kind::Div(a, b) => {
                let denom = b.exact();
                assert!(
                    denom.cmp0() != Ordering::Equal,
                    "LazyExact: division by zero in exact()"
                );
                Rational::from(a.exact() / denom)
            }
            Kind::Neg(x) => Rational::from(-x.exact()),
        })
    }

    pub fn has_exact(&self) -> bool {
        self.0.exact.get().is_some()
    }

    /// Sign with lazy exact fallback: the interval decides when it can,
    /// otherwise the exact value is evaluated. Returns -1, 0, or +1.
    pub fn sign(&self) -> i8 {
        if let Some(s) = self.0.approx.sign_if_certain() {
            return s;
        }
        match self.exact().cmp0() {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// Exact comparison, filtered by the enclosures.
    pub fn cmp_exact(&self, other: &LazyExact) -> Ordering {
        let (a, b) = (self.approx(), other.approx());
        if a.is_exact() && b.is_exact() {
            return a.m.partial_cmp(&b.m).unwrap_or(Ordering::Equal);
        }
        if a.hi() < b.lo() {
            return Ordering::Less;
        }
        if a.lo() > b.hi() {
            return Ordering::Greater;
        }
        self.exact().cmp(other.exact())
    }

    pub fn eq_exact(&self, other: &LazyExact) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.cmp_exact(other) == Ordering::Equal
    }

    /// Compares `|self|` against `|other|` exactly.
    pub fn cmp_abs(&self, other: &LazyExact) -> Ordering {
        let a = if self.sign() < 0 { -self } else { self.clone() };
        let b = if other.sign() < 0 { -other } else { other.clone() };
        a.cmp_exact(&b)
    }

    /// A double determined by the exact value alone (two equal values always
    /// give the same bits). Only forces the exact value when the enclosure is
    /// not a single double.
    pub fn nearest_f64(&self) -> f64 {
        let a = self.approx();
        let v = if a.is_exact() { a.m } else { self.exact().to_f64() };
        if v == 0.0 { 0.0 } else { v }
    }

    /* ========= Internal helpers ========= */

    #[inline]
    fn new(kind: Kind) -> Self {
        let approx = match &kind {
            Kind::LeafF64(v) => Ball::from_f64(*v),
            Kind::LeafExact => Ball::unknown(),
            Kind::Add(a, b) => a.approx().add(b.approx()),
            Kind::Sub(a, b) => a.approx().sub(b.approx()),
            Kind::Mul(a, b) => a.approx().mul(b.approx()),
            Kind::Div(a, b) => a.approx().div(b.approx()),
            Kind::Neg(x) => x.approx().neg(),
        };
        LazyExact(Arc::new(Node {
            kind,
            approx,
            exact: OnceCell::new(),
        }))
    }
}

/* ========= Operator overloads (build expression DAGs) ========= */

impl Add for LazyExact {
    type Output = LazyExact;
    fn add(self, rhs: LazyExact) -> LazyExact {
        LazyExact::new(Kind::Add(self, rhs))
    }
}

impl<'a, 'b> Add<&'b LazyExact> for &'a LazyExact {
    type Output = LazyExact;
    fn add(self, rhs: &'b LazyExact) -> LazyExact {
        LazyExact::new(Kind::Add(self.clone(), rhs.clone()))
    }
}

impl Sub for LazyExact {
    type Output = LazyExact;
    fn sub(self, rhs: LazyExact) -> LazyExact {
        LazyExact::new(Kind::Sub(self, rhs))
    }
}

impl<'a, 'b> Sub<&'b LazyExact> for &'a LazyExact {
    type Output = LazyExact;
    fn sub(self, rhs: &'b LazyExact) -> LazyExact {
        LazyExact::new(Kind::Sub(self.clone(), rhs.clone()))
    }
}

impl Mul for LazyExact {
    type Output = LazyExact;
    fn mul(self, rhs: LazyExact) -> LazyExact {
        LazyExact::new(Kind::Mul(self, rhs))
    }
}

impl<'a, 'b> Mul<&'b LazyExact> for &'a LazyExact {
    type Output = LazyExact;
    fn mul(self, rhs: &'b LazyExact) -> LazyExact {
        LazyExact::new(Kind::Mul(self.clone(), rhs.clone()))
    }
}

impl Div for LazyExact {
    type Output = LazyExact;
    fn div(self, rhs: LazyExact) -> LazyExact {
        LazyExact::new(Kind::Div(self, rhs))
    }
}

impl<'a, 'b> Div<&'b LazyExact> for &'a LazyExact {
    type Output = LazyExact;
    fn div(self, rhs: &'b LazyExact) -> LazyExact {
        LazyExact::new(Kind::Div(self.clone(), rhs.clone()))
    }
}

impl Neg for LazyExact {
    type Output = LazyExact;
    fn neg(self) -> LazyExact {
        LazyExact::new(Kind::Neg(self))
    }
}

impl<'a> Neg for &'a LazyExact {
    type Output = LazyExact;
    fn neg(self) -> LazyExact {
        LazyExact::new(Kind::Neg(self.clone()))
    }
}

impl num_traits::Zero for LazyExact {
    fn zero() -> Self {
        LazyExact::from_f64(0.0)
    }

    fn is_zero(&self) -> bool {
        self.sign() == 0
    }
}

impl num_traits::One for LazyExact {
    fn one() -> Self {
        LazyExact::from_f64(1.0)
    }
}

/* ========= Conversions ========= */

impl From<f64> for LazyExact {
    fn from(v: f64) -> Self {
        Self::from_f64(v)
    }
}

impl From<i32> for LazyExact {
    fn from(v: i32) -> Self {
        Self::from_i32(v)
    }
}

impl From<Rational> for LazyExact {
    fn from(v: Rational) -> Self {
        Self::from_rational(v)
    }
}

/* ========= Debug ========= */

impl fmt::Debug for LazyExact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show approx eagerly; exact only if already realized
        let a = self.approx();
        if let Some(e) = self.0.exact.get() {
            write!(f, "LazyExact(approx={:.6}±{:.1e}, exact={})", a.m, a.r, e)
        } else {
            write!(f, "LazyExact(approx={:.6}±{:.1e}, exact=<lazy>)", a.m, a.r)
        }
    }
}
