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

use std::thread;

/// Knobs for one Boolean evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BooleanConfig {
    /// Worker threads of the pool that runs the evaluation.
    pub threads: usize,
    /// When false every phase runs on the calling thread.
    pub parallel: bool,
    /// Rays cast from one origin face, and origin faces tried per
    /// component, before the global classifier gives up.
    pub max_ray_attempts: usize,
}

impl Default for BooleanConfig {
    fn default() -> Self {
        BooleanConfig {
            threads: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            parallel: true,
            max_ray_attempts: 32,
        }
    }
}

impl BooleanConfig {
    pub fn sequential() -> Self {
        BooleanConfig {
            threads: 1,
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_ray_attempts(mut self, attempts: usize) -> Self {
        self.max_ray_attempts = attempts.max(1);
        self
    }

    /// Recursion depth up to which tree construction forks.
    pub fn parallel_depth(&self) -> usize {
        if !self.parallel || self.threads <= 1 {
            0
        } else {
            self.threads.ilog2() as usize
        }
    }
}
