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

//! Exact Boolean operations on closed triangle meshes.
//!
//! Both operands are corefined along their intersection curve using exact
//! sign predicates, every resulting face is classified against the other
//! operand, and the faces an operator keeps are extracted into a new
//! boundary. See [`Region::boolean`].

pub mod boolean;
pub mod config;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod mesh;
pub mod numeric;
pub mod operations;
pub mod region;
pub mod warnings;

pub use boolean::operator::BooleanOp;
pub use config::BooleanConfig;
pub use error::{BooleanError, BooleanResult};
pub use geometry::point::Point3;
pub use mesh::ids::{FaceId, VertexId};
pub use mesh::soup::TriangleSoup;
pub use region::{BooleanOutput, BooleanResultBuilder, Region};
pub use warnings::Warnings;
