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

/// Midpoint-radius interval. The represented value lies in `[m - r, m + r]`.
///
/// Every operation widens the radius by the rounding error of the midpoint
/// (error-free transforms) plus a relative slack covering the rounding of the
/// radius computation itself, so the enclosure is always conservative.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ball {
    pub m: f64,
    pub r: f64,
}

/// Relative slack applied to every computed radius (a few ulps).
const SLACK: f64 = 4.0 * f64::EPSILON;

#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    // uses FMA when available (compile with -C target-cpu=native)
    let err = f64::mul_add(a, b, -p);
    (p, err)
}

#[inline]
fn widen(r: f64) -> f64 {
    if r == 0.0 {
        0.0
    } else {
        r * (1.0 + SLACK) + f64::MIN_POSITIVE
    }
}

impl Ball {
    #[inline]
    pub fn from_f64(x: f64) -> Self {
        Ball { m: x, r: 0.0 }
    }

    #[inline]
    pub fn unknown() -> Self {
        Ball {
            m: 0.0,
            r: f64::INFINITY,
        }
    }

    /// Enclosure of a rounded value `x` whose exact counterpart is within
    /// half an ulp.
    #[inline]
    pub fn rounded(x: f64) -> Self {
        if !x.is_finite() {
            return Ball::unknown();
        }
        Ball {
            m: x,
            r: x.abs() * f64::EPSILON + f64::MIN_POSITIVE,
        }
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        self.r == 0.0 && self.m.is_finite()
    }

    #[inline]
    pub fn lo(&self) -> f64 {
        if self.r == 0.0 {
            self.m
        } else {
            let lo = self.m - self.r;
            lo - lo.abs() * SLACK - f64::MIN_POSITIVE
        }
    }

    #[inline]
    pub fn hi(&self) -> f64 {
        if self.r == 0.0 {
            self.m
        } else {
            let hi = self.m + self.r;
            hi + hi.abs() * SLACK + f64::MIN_POSITIVE
        }
    }

    #[inline]
    pub fn add(self, o: Self) -> Self {
        let (s, e) = two_sum(self.m, o.m);
        Ball {
            m: s,
            r: widen(self.r + o.r + e.abs()),
        }
    }

    #[inline]
    pub fn sub(self, o: Self) -> Self {
        self.add(Ball { m: -o.m, r: o.r })
    }

    #[inline]
    pub fn neg(self) -> Self {
        Ball {
            m: -self.m,
            r: self.r,
        }
    }

    #[inline]
    pub fn mul(self, o: Self) -> Self {
        let (p, e) = two_prod(self.m, o.m);
        Ball {
            m: p,
            r: widen(self.m.abs() * o.r + o.m.abs() * self.r + self.r * o.r + e.abs()),
        }
    }

    // Safe but conservative division; if denom straddles zero, return “unknown”
    #[inline]
    pub fn div(self, o: Self) -> Self {
        if o.m.abs() <= o.r {
            return Ball::unknown();
        }
        let denom = o.m.abs() * (o.m.abs() - o.r);
        if denom <= 0.0 {
            return Ball::unknown();
        }
        let m = self.m / o.m;
        let quot_err = (m * o.m - self.m).abs() / o.m.abs();
        let r = (self.m.abs() * o.r + o.m.abs() * self.r) / denom;
        Ball {
            m,
            r: widen(r + quot_err + m.abs() * f64::EPSILON),
        }
    }

    /// Returns `Some(-1 | 0 | 1)` when the sign is certain.
    #[inline]
    pub fn sign_if_certain(self) -> Option<i8> {
        if !self.r.is_finite() || !self.m.is_finite() {
            return None;
        }
        if self.m > self.r {
            Some(1)
        } else if self.m < -self.r {
            Some(-1)
        } else if self.r == 0.0 && self.m == 0.0 {
            Some(0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_operands_stay_exact() {
        let a = Ball::from_f64(3.0);
        let b = Ball::from_f64(0.5);
        let s = a.add(b);
        assert!(s.is_exact());
        assert_eq!(s.m, 3.5);
        assert_eq!(a.mul(b).sign_if_certain(), Some(1));
    }

    #[test]
    fn rounding_error_is_captured() {
        // 0.1 + 0.2 is not representable; the error term must be absorbed.
        let s = Ball::from_f64(0.1).add(Ball::from_f64(0.2));
        assert!(s.r > 0.0);
        assert!(s.lo() <= 0.30000000000000004 && s.hi() >= 0.3);
    }

    #[test]
    fn straddling_zero_is_uncertain() {
        let x = Ball { m: 1e-20, r: 1e-18 };
        assert_eq!(x.sign_if_certain(), None);
        assert_eq!(Ball::from_f64(0.0).sign_if_certain(), Some(0));
        assert_eq!(Ball::from_f64(1.0).div(x).sign_if_certain(), None);
    }
}
