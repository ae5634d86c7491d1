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

use crate::boolean::mixed::FaceTag;
use crate::error::BooleanError;

/// The non-trivial two-operand set operators.
///
/// The discriminant is the truth table: bit `2a + b` holds `f(a, b)`, so
/// bit 0 is `f(0,0)`, bit 1 is `f(0,1)`, bit 2 is `f(1,0)` and bit 3 is
/// `f(1,1)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BooleanOp {
    Nor = 0b0001,
    ReverseDifference = 0b0010,
    NotFirst = 0b0011,
    Difference = 0b0100,
    NotSecond = 0b0101,
    SymmetricDifference = 0b0110,
    Nand = 0b0111,
    Intersection = 0b1000,
    Equivalence = 0b1001,
    Second = 0b1010,
    Implication = 0b1011,
    First = 0b1100,
    ReverseImplication = 0b1101,
    Union = 0b1110,
    Universe = 0b1111,
}

impl BooleanOp {
    pub const ALL: [BooleanOp; 15] = [
        BooleanOp::Nor,
        BooleanOp::ReverseDifference,
        BooleanOp::NotFirst,
        BooleanOp::Difference,
        BooleanOp::NotSecond,
        BooleanOp::SymmetricDifference,
        BooleanOp::Nand,
        BooleanOp::Intersection,
        BooleanOp::Equivalence,
        BooleanOp::Second,
        BooleanOp::Implication,
        BooleanOp::First,
        BooleanOp::ReverseImplication,
        BooleanOp::Union,
        BooleanOp::Universe,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Membership of a point given its membership in each operand.
    #[inline]
    pub fn truth(self, a: bool, b: bool) -> bool {
        (self.code() >> (2 * u8::from(a) + u8::from(b))) & 1 == 1
    }

    pub fn masks(self) -> Masks {
        Masks {
            left: SideMasks {
                exterior: self.emit(true, false, false, false),
                interior: self.emit(true, true, false, true),
                coplanar: self.emit(true, true, false, false),
                opposite: self.emit(true, false, false, true),
            },
            right: SideMasks {
                exterior: self.emit(false, true, false, false),
                interior: self.emit(true, true, true, false),
                coplanar: self.emit(true, true, false, false),
                opposite: self.emit(false, true, true, false),
            },
        }
    }

    /// 2-bit mask for a face with `(behind_a, behind_b)` on the side its
    /// normal points away from and `(front_a, front_b)` on the other.
    fn emit(self, behind_a: bool, behind_b: bool, front_a: bool, front_b: bool) -> u8 {
        match (self.truth(behind_a, behind_b), self.truth(front_a, front_b)) {
            (true, false) => EMIT,
            (false, true) => EMIT_REVERSED,
            _ => 0,
        }
    }
}

impl TryFrom<u8> for BooleanOp {
    type Error = BooleanError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        BooleanOp::ALL
            .into_iter()
            .find(|op| op.code() == code)
            .ok_or(BooleanError::InvalidOperator(code))
    }
}

pub const EMIT: u8 = 0b01;
pub const EMIT_REVERSED: u8 = 0b10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SideMasks {
    pub exterior: u8,
    pub interior: u8,
    pub coplanar: u8,
    pub opposite: u8,
}

impl SideMasks {
    pub fn for_tag(&self, tag: FaceTag) -> u8 {
        match tag {
            FaceTag::Exterior => self.exterior,
            FaceTag::Interior => self.interior,
            FaceTag::Coplanar => self.coplanar,
            FaceTag::Opposite => self.opposite,
            FaceTag::Unknown => 0,
        }
    }
}

/// Emission masks of one operator, per operand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Masks {
    pub left: SideMasks,
    pub right: SideMasks,
}

impl Masks {
    pub fn side(&self, from_left: bool) -> &SideMasks {
        if from_left { &self.left } else { &self.right }
    }
}

/// Point membership `(behind, front)` of a tagged face, in operator value.
pub fn face_values(op: BooleanOp, from_left: bool, tag: FaceTag) -> Option<(bool, bool)> {
    let t = |a, b| op.truth(a, b);
    Some(match (from_left, tag) {
        (_, FaceTag::Unknown) => return None,
        (true, FaceTag::Exterior) => (t(true, false), t(false, false)),
        (true, FaceTag::Interior) => (t(true, true), t(false, true)),
        (false, FaceTag::Exterior) => (t(false, true), t(false, false)),
        (false, FaceTag::Interior) => (t(true, true), t(true, false)),
        (_, FaceTag::Coplanar) => (t(true, true), t(false, false)),
        (true, FaceTag::Opposite) => (t(true, false), t(false, true)),
        (false, FaceTag::Opposite) => (t(false, true), t(true, false)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_tables() {
        assert!(BooleanOp::Union.truth(true, false));
        assert!(!BooleanOp::Union.truth(false, false));
        assert!(BooleanOp::Difference.truth(true, false));
        assert!(!BooleanOp::Difference.truth(true, true));
        assert!(BooleanOp::Implication.truth(false, true));
        assert!(!BooleanOp::Implication.truth(true, false));
        for op in BooleanOp::ALL {
            assert_eq!(BooleanOp::try_from(op.code()).ok(), Some(op));
        }
        assert!(matches!(BooleanOp::try_from(0), Err(BooleanError::InvalidOperator(0))));
        assert!(BooleanOp::try_from(16).is_err());
    }

    #[test]
    fn union_and_difference_masks() {
        let u = BooleanOp::Union.masks();
        assert_eq!(u.left.exterior, EMIT);
        assert_eq!(u.left.interior, 0);
        assert_eq!(u.right.exterior, EMIT);
        assert_eq!(u.left.coplanar, EMIT);
        assert_eq!(u.left.opposite, 0);

        let d = BooleanOp::Difference.masks();
        assert_eq!(d.left.exterior, EMIT);
        assert_eq!(d.left.interior, 0);
        assert_eq!(d.right.exterior, 0);
        assert_eq!(d.right.interior, EMIT_REVERSED);
        assert_eq!(d.left.coplanar, 0);
        assert_eq!(d.left.opposite, EMIT);
    }

    #[test]
    fn masks_agree_with_face_values() {
        for op in BooleanOp::ALL {
            let m = op.masks();
            for from_left in [true, false] {
                for tag in [FaceTag::Exterior, FaceTag::Interior, FaceTag::Coplanar, FaceTag::Opposite] {
                    let (behind, front) = face_values(op, from_left, tag).expect("terminal");
                    let expected = match (behind, front) {
                        (true, false) => EMIT,
                        (false, true) => EMIT_REVERSED,
                        _ => 0,
                    };
                    assert_eq!(m.side(from_left).for_tag(tag), expected, "{op:?} {from_left} {tag:?}");
                }
            }
        }
    }
}
