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

//! Classification of faces the intersection curve never reaches.

use std::collections::VecDeque;

use tracing::debug;

use crate::boolean::mixed::{FaceTag, MixedMesh};
use crate::boolean::try_map;
use crate::config::BooleanConfig;
use crate::error::{BooleanError, BooleanResult};
use crate::geometry::point::Point3;
use crate::geometry::ray::{RayCast, cast};
use crate::mesh::edge::Edge;
use crate::mesh::ids::FaceId;
use crate::mesh::soup::TriangleSoup;
use crate::numeric::lazy_exact::LazyExact;

/// Connected sets of Unknown faces, split at shared edges. Each component
/// lists its faces in discovery order, lowest face id first.
pub fn unknown_components<P>(mm: &MixedMesh<P>) -> Vec<Vec<FaceId>> {
    let mut seen = vec![false; mm.num_faces()];
    let mut out = Vec::new();
    for start in mm.face_ids() {
        if seen[start.idx()] || mm.tag(start) != FaceTag::Unknown {
            continue;
        }
        seen[start.idx()] = true;
        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(f) = queue.pop_front() {
            for e in Edge::of_triangle(mm.mesh.face(f)) {
                if mm.is_shared(e) {
                    continue;
                }
                for g in mm.mesh.incident_faces(e) {
                    if !seen[g.idx()] && mm.tag(g) == FaceTag::Unknown {
                        seen[g.idx()] = true;
                        component.push(g);
                        queue.push_back(g);
                    }
                }
            }
        }
        out.push(component);
    }
    out
}

/// Barycentric weights of the aiming points, tried in order: centroids
/// first, then an off-centre interior point of every face.
const AIMS: [[i32; 3]; 2] = [[1, 1, 1], [1, 2, 4]];

fn aim(t: [&Point3; 3], w: [i32; 3]) -> Point3 {
    if w == [1, 1, 1] {
        return Point3::centroid(t[0], t[1], t[2]);
    }
    let total = LazyExact::from_i32(w.iter().sum());
    let w = w.map(LazyExact::from_i32);
    Point3 {
        coords: std::array::from_fn(|i| {
            let sum = &(&(&t[0].coords[i] * &w[0]) + &(&t[1].coords[i] * &w[1])) + &(&t[2].coords[i] * &w[2]);
            &sum / &total
        }),
    }
}

/// Interior or Exterior for the solid bounded by `other`, for a component
/// whose faces all lie on the same side of it.
fn classify_component<P: Sync>(
    mm: &MixedMesh<P>,
    faces: &[FaceId],
    other: &TriangleSoup<P>,
    config: &BooleanConfig,
) -> BooleanResult<FaceTag> {
    let n = other.num_faces();
    if n == 0 {
        return Ok(FaceTag::Exterior);
    }
    let per_origin = config.max_ray_attempts.min(n);
    let mut attempts = 0;
    for w in AIMS {
        // Fall back to further faces when every ray from one grazes.
        for &f in faces.iter().take(config.max_ray_attempts) {
            let origin = aim(mm.mesh.soup().triangle(f), w);
            // Spread the first targets of neighbouring components over the soup.
            let start = (f.idx() as u64).wrapping_mul(2_654_435_761) as usize % n;
            for k in 0..per_origin {
                let through = aim(other.triangle(FaceId::new((start + k) % n)), w);
                if through.eq_exact(&origin) {
                    continue;
                }
                attempts += 1;
                match cast(other, &origin, &through, config.parallel_depth()) {
                    RayCast::Clear => return Ok(FaceTag::Exterior),
                    RayCast::Nearest { front: true, .. } => return Ok(FaceTag::Exterior),
                    RayCast::Nearest { front: false, .. } => return Ok(FaceTag::Interior),
                    RayCast::Ambiguous => {}
                }
            }
        }
    }
    Err(BooleanError::UnresolvedOrientation {
        unknown: faces.len(),
        attempts,
    })
}

/// Tags every remaining Unknown face by casting rays from each component.
pub fn classify_global<P: Sync>(
    mm: &mut MixedMesh<P>,
    left: &TriangleSoup<P>,
    right: &TriangleSoup<P>,
    config: &BooleanConfig,
) -> BooleanResult<()> {
    let components = unknown_components(mm);
    if components.is_empty() {
        return Ok(());
    }
    debug!(components = components.len(), "casting rays for unresolved components");
    let tags = {
        let view: &MixedMesh<P> = mm;
        try_map(config.parallel, &components, |faces| {
            let other = if view.from_left(faces[0]) { right } else { left };
            classify_component(view, faces, other, config)
        })?
    };
    for (faces, tag) in components.iter().zip(tags) {
        for &f in faces {
            mm.mesh.data_mut(f).tag = tag;
        }
    }
    Ok(())
}
