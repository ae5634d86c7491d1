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

use bitflags::bitflags;

bitflags! {
    /// Non-fatal findings of a Boolean evaluation.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Warnings: u8 {
        /// Part of the first operand's boundary touches the second without
        /// consistent classification (a face got two different tags).
        const FIRST_MESH_PARTIALLY_INTERSECTS_SECOND = 1 << 0;
        /// Same, for the second operand.
        const SECOND_MESH_PARTIALLY_INTERSECTS_FIRST = 1 << 1;
    }
}

impl Warnings {
    pub fn partial_intersection(from_left: bool) -> Self {
        if from_left {
            Warnings::FIRST_MESH_PARTIALLY_INTERSECTS_SECOND
        } else {
            Warnings::SECOND_MESH_PARTIALLY_INTERSECTS_FIRST
        }
    }
}
