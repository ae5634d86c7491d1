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

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use rayon::ThreadPoolBuilder;
use tracing::info;

use crate::boolean::classify_global::classify_global;
use crate::boolean::classify_local::classify_local;
use crate::boolean::corefine::corefine;
use crate::boolean::extract::extract;
use crate::boolean::mixed::MixedMesh;
use crate::boolean::operator::BooleanOp;
use crate::config::BooleanConfig;
use crate::error::{BooleanError, BooleanResult};
use crate::geometry::point::Point3;
use crate::mesh::ids::{FaceId, VertexId};
use crate::mesh::soup::TriangleSoup;
use crate::warnings::Warnings;

/// A solid: nothing, everything, or the volume bounded by a closed,
/// outward oriented triangle mesh.
///
/// Build `Normal` regions with [`Region::normal`], which rejects an empty
/// boundary.
#[derive(Clone, Debug)]
pub enum Region<P> {
    Empty,
    Full,
    Normal(TriangleSoup<P>),
}

impl<P> Region<P> {
    pub fn empty() -> Self {
        Region::Empty
    }

    pub fn full() -> Self {
        Region::Full
    }

    pub fn normal(boundary: TriangleSoup<P>) -> BooleanResult<Self> {
        validate(&boundary)?;
        Ok(Region::Normal(boundary))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Region::Empty)
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Region::Full)
    }

    pub fn boundary(&self) -> Option<&TriangleSoup<P>> {
        match self {
            Region::Normal(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_boundary(self) -> Option<TriangleSoup<P>> {
        match self {
            Region::Normal(s) => Some(s),
            _ => None,
        }
    }

    /// Starts a Boolean evaluation of `self` against `other`.
    pub fn boolean<'a>(&'a self, other: &'a Region<P>) -> BooleanResultBuilder<'a, P> {
        BooleanResultBuilder {
            first: self,
            second: other,
            config: BooleanConfig::default(),
            mixed: OnceCell::new(),
        }
    }
}

impl<P: Clone> Region<P> {
    pub fn complement(&self) -> Self {
        match self {
            Region::Empty => Region::Full,
            Region::Full => Region::Empty,
            Region::Normal(s) => Region::Normal(s.clone().reversed()),
        }
    }
}

/// A boundary must have faces, and every point must be finite.
fn validate<P>(s: &TriangleSoup<P>) -> BooleanResult<()> {
    if s.is_empty() {
        return Err(BooleanError::EmptyBoundary);
    }
    match s.points.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(BooleanError::NonFiniteCoordinate {
            vertex: VertexId::new(i),
        }),
        None => Ok(()),
    }
}

type FaceKey = [[u64; 3]; 3];

fn face_keys<P>(s: &TriangleSoup<P>) -> Vec<(FaceKey, FaceId)> {
    let mut keys: Vec<(FaceKey, FaceId)> = (0..s.num_faces())
        .map(|f| {
            let f = FaceId::new(f);
            let k = s.triangle(f).map(|p| p.coords.each_ref().map(|c| c.nearest_f64().to_bits()));
            // Smallest rotation, so corners that round alike still agree.
            let key = (0..3).map(|r| [k[r], k[(r + 1) % 3], k[(r + 2) % 3]]).min().unwrap_or(k);
            (key, f)
        })
        .collect();
    keys.sort_unstable_by_key(|&(k, _)| k);
    keys
}

/// Same corners in the same cyclic order, compared exactly.
fn same_oriented(t: [&Point3; 3], u: [&Point3; 3]) -> bool {
    (0..3).any(|r| (0..3).all(|i| t[i].eq_exact(u[(i + r) % 3])))
}

/// Equal when both regions are the same kind and Normal boundaries carry
/// the same oriented triangles with equal payloads, in any order.
impl<P: Clone + PartialEq> PartialEq for Region<P> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Region::Empty, Region::Empty) | (Region::Full, Region::Full) => true,
            (Region::Normal(a), Region::Normal(b)) => {
                if a.num_faces() != b.num_faces() {
                    return false;
                }
                let mut pending: AHashMap<FaceKey, Vec<FaceId>> = AHashMap::default();
                for (k, f) in face_keys(b) {
                    pending.entry(k).or_default().push(f);
                }
                face_keys(a).into_iter().all(|(k, f)| {
                    let Some(candidates) = pending.get_mut(&k) else {
                        return false;
                    };
                    let found = candidates.iter().position(|&g| {
                        a.payload[f.idx()] == b.payload[g.idx()] && same_oriented(a.triangle(f), b.triangle(g))
                    });
                    match found {
                        Some(i) => {
                            candidates.swap_remove(i);
                            true
                        }
                        None => false,
                    }
                })
            }
            _ => false,
        }
    }
}

/// Result of one Boolean evaluation.
#[derive(Clone, Debug)]
pub struct BooleanOutput<P> {
    pub region: Region<P>,
    pub warnings: Warnings,
}

/// Evaluates Boolean operators between two regions. The corefined and
/// classified mesh is computed on first use and shared by every later
/// call on the same builder.
pub struct BooleanResultBuilder<'a, P> {
    first: &'a Region<P>,
    second: &'a Region<P>,
    config: BooleanConfig,
    mixed: OnceCell<(MixedMesh<P>, Warnings)>,
}

impl<'a, P> BooleanResultBuilder<'a, P>
where
    P: Clone + Send + Sync,
{
    pub fn with_config(mut self, config: BooleanConfig) -> Self {
        self.config = config;
        self.mixed = OnceCell::new();
        self
    }

    pub fn config(&self) -> &BooleanConfig {
        &self.config
    }

    /// Region of `op`, preferring the first operand on coinciding faces.
    pub fn apply(&self, op: BooleanOp) -> BooleanResult<Region<P>> {
        self.build(op, true).map(|out| out.region)
    }

    pub fn build(&self, op: BooleanOp, prefer_first: bool) -> BooleanResult<BooleanOutput<P>> {
        let region = match (self.first, self.second) {
            (Region::Normal(a), Region::Normal(b)) => {
                let (mm, warnings) = self.mixed(a, b)?;
                let region = extract(mm, op, prefer_first)?;
                info!(
                    op = ?op,
                    faces = region.boundary().map_or(0, TriangleSoup::num_faces),
                    warnings = ?warnings,
                    "boolean evaluated"
                );
                return Ok(BooleanOutput {
                    region,
                    warnings: *warnings,
                });
            }
            (r @ Region::Normal(_), s) => {
                let y = s.is_full();
                restricted(r, op.truth(false, y), op.truth(true, y))?
            }
            (s, r @ Region::Normal(_)) => {
                let x = s.is_full();
                restricted(r, op.truth(x, false), op.truth(x, true))?
            }
            (s, t) => constant(op.truth(s.is_full(), t.is_full())),
        };
        Ok(BooleanOutput {
            region,
            warnings: Warnings::empty(),
        })
    }

    fn mixed(&self, a: &TriangleSoup<P>, b: &TriangleSoup<P>) -> BooleanResult<&(MixedMesh<P>, Warnings)> {
        self.mixed.get_or_try_init(|| {
            validate(a)?;
            validate(b)?;
            let config = &self.config;
            let pool = ThreadPoolBuilder::new().num_threads(config.threads).build()?;
            pool.install(|| {
                let corefined = corefine(a, b, config)?;
                let mut mm = MixedMesh::assemble(corefined, a, b);
                let warnings = classify_local(&mut mm, config)?;
                classify_global(&mut mm, a, b, config)?;
                Ok((mm, warnings))
            })
        })
    }
}

fn constant<P>(value: bool) -> Region<P> {
    if value { Region::Full } else { Region::Empty }
}

/// `op` with one operand fixed: `outside` and `inside` are its values
/// outside and inside the remaining Normal operand `r`.
fn restricted<P: Clone>(r: &Region<P>, outside: bool, inside: bool) -> BooleanResult<Region<P>> {
    if let Region::Normal(s) = r {
        validate(s)?;
    }
    Ok(match (outside, inside) {
        (false, false) => Region::Empty,
        (true, true) => Region::Full,
        (false, true) => r.clone(),
        (true, false) => r.complement(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::soup::tests::cuboid;
    use rug::{Integer, Rational};

    #[test]
    fn normal_rejects_empty_boundary() {
        assert!(matches!(
            Region::<()>::normal(TriangleSoup::new()),
            Err(BooleanError::EmptyBoundary)
        ));
    }

    #[test]
    fn normal_rejects_non_finite_points() {
        let mut s = cuboid([0.0; 3], [1.0; 3], 0u8);
        s.points[5] = Point3::from_f64(1.0, f64::NAN, 1.0);
        assert!(matches!(
            Region::normal(s.clone()),
            Err(BooleanError::NonFiniteCoordinate { vertex: VertexId(5) })
        ));
        // Regions built without `normal` are checked before any geometry.
        let (bad, good) = (Region::Normal(s), Region::normal(cuboid([0.0; 3], [1.0; 3], 0u8)).expect("cube"));
        assert!(matches!(
            good.boolean(&bad).apply(BooleanOp::Union),
            Err(BooleanError::NonFiniteCoordinate { .. })
        ));
        assert!(matches!(
            bad.boolean(&Region::full()).apply(BooleanOp::Intersection),
            Err(BooleanError::NonFiniteCoordinate { .. })
        ));
    }

    fn sheet(corners: [&Point3; 3]) -> Region<u8> {
        let mut s = TriangleSoup::new();
        let v = corners.map(|p| s.add_vertex(p.clone()));
        s.add_face(v, 0);
        Region::normal(s).expect("one face")
    }

    #[test]
    fn equality_is_exact_when_corners_round_alike() {
        let near_one = |shift: u32| {
            let den = Integer::from(1u64 << shift);
            Point3::from_rationals(
                Rational::from((den.clone() + 1u32, den)),
                Rational::new(),
                Rational::new(),
            )
        };
        let p = Point3::from_f64(1.0, 0.0, 0.0);
        let (q, q2) = (near_one(60), near_one(59));
        let r = Point3::from_f64(0.0, 1.0, 0.0);
        assert_eq!(q.to_f64(), p.to_f64());

        let base = sheet([&p, &q, &r]);
        assert_eq!(base, sheet([&q, &r, &p]));
        assert_ne!(base, sheet([&q, &p, &r]));
        assert_ne!(base, sheet([&p, &q2, &r]));
    }

    #[test]
    fn complement_flips_windings() {
        let r = Region::normal(cuboid([0.0; 3], [1.0; 3], 0u8)).expect("cube");
        let c = r.complement();
        assert_ne!(r, c);
        assert_eq!(r, c.complement());
        assert!(Region::<u8>::empty().complement().is_full());
    }

    #[test]
    fn symbolic_operands_skip_geometry() {
        let r = Region::normal(cuboid([0.0; 3], [1.0; 3], 0u8)).expect("cube");
        let full = Region::full();
        let b = r.boolean(&full).with_config(BooleanConfig::sequential());
        assert_eq!(b.apply(BooleanOp::Intersection).expect("and"), r);
        assert!(b.apply(BooleanOp::Union).expect("or").is_full());
        assert_eq!(b.apply(BooleanOp::Nand).expect("nand"), r.complement());
        assert!(b.mixed.get().is_none());
    }
}
