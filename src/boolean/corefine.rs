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

use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

use crate::boolean::construct::PointConstructor;
use crate::boolean::symbolic::{Intersection, intersect};
use crate::boolean::try_map;
use crate::config::BooleanConfig;
use crate::error::BooleanResult;
use crate::geometry::point::Point3;
use crate::kernel::predicates::Predicates;
use crate::mesh::ids::{FaceId, VertexId};
use crate::mesh::registry::PointRegistry;
use crate::mesh::soup::TriangleSoup;
use crate::operations::triangulation::cdt::retriangulate;

/// One output triangle of a corefined face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub vertices: [VertexId; 3],
    pub parent: FaceId,
}

/// Both operands subdivided along their intersection, over one shared
/// point set.
pub struct Corefined {
    pub points: Vec<Point3>,
    pub left: Vec<Piece>,
    pub right: Vec<Piece>,
    pub constructed: usize,
}

#[derive(Default)]
struct FaceJob {
    points: Vec<VertexId>,
    constraints: Vec<(VertexId, VertexId)>,
}

impl FaceJob {
    fn add(&mut self, ids: &[VertexId]) {
        for &v in ids {
            if !self.points.contains(&v) {
                self.points.push(v);
            }
        }
        match ids.len() {
            0 | 1 => {}
            2 => self.constraints.push((ids[0], ids[1])),
            n => (0..n).for_each(|i| self.constraints.push((ids[i], ids[(i + 1) % n]))),
        }
    }
}

/// Rotation so that the smallest id comes first.
fn normalized(t: [VertexId; 3]) -> [VertexId; 3] {
    let m = (0..3).min_by_key(|&i| t[i]).unwrap_or(0);
    [t[m], t[(m + 1) % 3], t[(m + 2) % 3]]
}

pub fn corefine<P: Sync>(
    left: &TriangleSoup<P>,
    right: &TriangleSoup<P>,
    config: &BooleanConfig,
) -> BooleanResult<Corefined> {
    let mut reg = PointRegistry::with_capacity(left.num_vertices() + right.num_vertices());
    let lmap: Vec<VertexId> = left.points.iter().map(|p| reg.insert(p.clone())).collect();
    let rmap: Vec<VertexId> = right.points.iter().map(|p| reg.insert(p.clone())).collect();
    let remap = |map: &[VertexId], t: &[VertexId; 3]| t.map(|v| map[v.idx()]);
    let lf: Vec<[VertexId; 3]> = left.faces.iter().map(|t| remap(&lmap, t)).collect();
    let rf: Vec<[VertexId; 3]> = right.faces.iter().map(|t| remap(&rmap, t)).collect();

    let (candidates, hits) = {
        let pr = Predicates::new(&reg);
        let degenerate = |faces: &[[VertexId; 3]], side: &str| -> Vec<bool> {
            faces
                .iter()
                .enumerate()
                .map(|(f, t)| {
                    let bad = pr.dominant_axis(t[0], t[1], t[2]).1 == 0;
                    if bad {
                        warn!(side, face = f, "skipping zero-area face");
                    }
                    bad
                })
                .collect()
        };
        let ldeg = degenerate(&lf, "left");
        let rdeg = degenerate(&rf, "right");

        // Faces with identical corners are coplanar or opposite; they share
        // every point and need no intersection test.
        let mut same: AHashSet<(usize, usize)> = AHashSet::default();
        let by_corners: AHashMap<[VertexId; 3], Vec<usize>> =
            rf.iter().enumerate().fold(AHashMap::default(), |mut m, (j, t)| {
                m.entry(normalized(*t)).or_default().push(j);
                m
            });
        for (i, t) in lf.iter().enumerate() {
            for key in [normalized(*t), normalized([t[0], t[2], t[1]])] {
                for &j in by_corners.get(&key).into_iter().flatten() {
                    same.insert((i, j));
                }
            }
        }

        // Broad phase: the larger soup queries the smaller one's tree.
        let depth = config.parallel_depth();
        let swap = left.num_faces() < right.num_faces();
        let (big, small) = if swap { (right, left) } else { (left, right) };
        let tree = small.face_tree(depth);
        let big_ids: Vec<usize> = (0..big.num_faces()).collect();
        let found: Vec<Vec<(usize, usize)>> = try_map(config.parallel, &big_ids, |&f| {
            let hits = tree.get_intersecting_leaves(&big.face_aabb(FaceId::new(f)));
            Ok(hits
                .into_iter()
                .map(|g| if swap { (g.idx(), f) } else { (f, g.idx()) })
                .filter(|&(i, j)| !ldeg[i] && !rdeg[j] && !same.contains(&(i, j)))
                .collect())
        })?;
        let candidates: Vec<(usize, usize)> = found.into_iter().flatten().collect();

        let results: Vec<Intersection> =
            try_map(config.parallel, &candidates, |&(i, j)| Ok(intersect(&pr, &lf[i], &rf[j])))?;
        debug!(
            candidates = candidates.len(),
            identical = same.len(),
            cached_orientations = pr.cache_len(),
            "symbolic intersection done"
        );
        (candidates, results)
    };

    let mut ljobs: AHashMap<usize, FaceJob> = AHashMap::default();
    let mut rjobs: AHashMap<usize, FaceJob> = AHashMap::default();
    let mut pc = PointConstructor::new(&mut reg);
    let mut intersecting = 0;
    for (&(i, j), pairs) in candidates.iter().zip(&hits) {
        if pairs.is_empty() {
            continue;
        }
        intersecting += 1;
        let ids = pairs
            .iter()
            .map(|&r| pc.point_id(&lf[i], &rf[j], r))
            .collect::<BooleanResult<Vec<_>>>()?;
        ljobs.entry(i).or_default().add(&ids);
        rjobs.entry(j).or_default().add(&ids);
    }
    let constructed = pc.constructed();
    debug!(intersecting, constructed, "intersection points constructed");

    let split = |faces: &[[VertexId; 3]], jobs: AHashMap<usize, FaceJob>| -> BooleanResult<Vec<Piece>> {
        let mut jobs: Vec<(usize, FaceJob)> = jobs
            .into_iter()
            .filter(|(f, job)| job.points.iter().any(|v| !faces[*f].contains(v)))
            .collect();
        jobs.sort_unstable_by_key(|(f, _)| *f);
        let done = try_map(config.parallel, &jobs, |(f, job)| {
            retriangulate(FaceId::new(*f), faces[*f], &reg, &job.points, &job.constraints)
        })?;
        let mut by_face: AHashMap<usize, Vec<[VertexId; 3]>> =
            jobs.iter().map(|(f, _)| *f).zip(done).collect();
        let retriangulated = by_face.len();
        let mut out = Vec::with_capacity(faces.len() + 2 * retriangulated);
        for (f, t) in faces.iter().enumerate() {
            let parent = FaceId::new(f);
            match by_face.remove(&f) {
                Some(subs) => out.extend(subs.into_iter().map(|vertices| Piece { vertices, parent })),
                None => out.push(Piece { vertices: *t, parent }),
            }
        }
        debug!(retriangulated, pieces = out.len(), "faces retriangulated");
        Ok(out)
    };
    let left_pieces = split(&lf, ljobs)?;
    let right_pieces = split(&rf, rjobs)?;

    Ok(Corefined {
        points: reg.into_points(),
        left: left_pieces,
        right: right_pieces,
        constructed,
    })
}
