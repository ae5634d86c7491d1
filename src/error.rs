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

use thiserror::Error;

use crate::mesh::ids::{FaceId, VertexId};

/// Fatal failures of a Boolean evaluation.
#[derive(Debug, Error)]
pub enum BooleanError {
    #[error("face {face:?} is degenerate: vertex {vertex:?} lies on its shared edge")]
    DegenerateFace { face: FaceId, vertex: VertexId },

    #[error("boundary orientation is inconsistent; operands are not closed, oriented solids")]
    InconsistentOrientation,

    #[error("could not classify a component of {unknown} faces after {attempts} ray attempts")]
    UnresolvedOrientation { unknown: usize, attempts: usize },

    #[error("constraint {a:?}-{b:?} crosses another constraint in face {face:?}")]
    SelfIntersection {
        face: FaceId,
        a: VertexId,
        b: VertexId,
    },

    #[error("unknown boolean operator code {0}")]
    InvalidOperator(u8),

    #[error("a normal region needs at least one boundary face")]
    EmptyBoundary,

    #[error("vertex {vertex:?} has a non-finite coordinate")]
    NonFiniteCoordinate { vertex: VertexId },

    #[error("invalid symbolic region: {0}")]
    InvalidSimplex(String),

    #[error("retriangulation of face {face:?} failed: {reason}")]
    Triangulation { face: FaceId, reason: &'static str },

    #[error("failed to build the thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type BooleanResult<T> = Result<T, BooleanError>;
