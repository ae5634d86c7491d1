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

use tracing::debug;

use crate::boolean::mixed::{FaceTag, MixedMesh};
use crate::boolean::operator::{BooleanOp, EMIT, EMIT_REVERSED, face_values};
use crate::error::{BooleanError, BooleanResult};
use crate::mesh::ids::VertexId;
use crate::mesh::soup::TriangleSoup;
use crate::region::Region;

/// Builds the result boundary of `op` from a fully tagged mixed mesh.
///
/// A face coinciding with a face of the other operand is emitted from the
/// first operand when `prefer_first`, from the second otherwise.
pub fn extract<P: Clone>(mm: &MixedMesh<P>, op: BooleanOp, prefer_first: bool) -> BooleanResult<Region<P>> {
    let masks = op.masks();
    let src = mm.mesh.soup();
    let mut out = TriangleSoup::new();
    let mut remap = vec![VertexId::INVALID; src.num_vertices()];

    for f in mm.face_ids() {
        let data = mm.mesh.data(f);
        if data.tag == FaceTag::Unknown {
            return Err(BooleanError::InconsistentOrientation);
        }
        if matches!(data.tag, FaceTag::Coplanar | FaceTag::Opposite) && data.from_left != prefer_first {
            continue;
        }
        let mask = masks.side(data.from_left).for_tag(data.tag);
        if mask == 0 {
            continue;
        }
        let corners = *mm.mesh.face(f);
        let mut t = corners.map(|v| {
            let slot = &mut remap[v.idx()];
            if !slot.is_valid() {
                *slot = out.add_vertex(src.point(v).clone());
            }
            *slot
        });
        if mask & EMIT_REVERSED != 0 {
            t.swap(1, 2);
        }
        debug_assert!(mask == EMIT || mask == EMIT_REVERSED);
        out.add_face(t, data.payload.clone());
    }

    debug!(op = ?op, faces = out.num_faces(), "extracted");
    if !out.is_empty() {
        return Ok(Region::Normal(out));
    }
    // Nothing separates inside from outside: the result is uniform.
    let mut value = None;
    for f in mm.face_ids() {
        let data = mm.mesh.data(f);
        let (behind, front) =
            face_values(op, data.from_left, data.tag).ok_or(BooleanError::InconsistentOrientation)?;
        if behind != front || value.is_some_and(|v| v != behind) {
            return Err(BooleanError::InconsistentOrientation);
        }
        value = Some(behind);
    }
    Ok(match value {
        Some(true) => Region::Full,
        _ => Region::Empty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::classify_global::classify_global;
    use crate::boolean::classify_local::classify_local;
    use crate::boolean::corefine::corefine;
    use crate::config::BooleanConfig;
    use crate::mesh::soup::tests::cuboid;

    fn tagged(a: &TriangleSoup<u8>, b: &TriangleSoup<u8>) -> MixedMesh<u8> {
        let config = BooleanConfig::sequential();
        let c = corefine(a, b, &config).expect("corefine");
        let mut mm = MixedMesh::assemble(c, a, b);
        classify_local(&mut mm, &config).expect("local");
        classify_global(&mut mm, a, b, &config).expect("global");
        mm
    }

    #[test]
    fn nested_difference_keeps_both_shells() {
        let outer = cuboid([0.0; 3], [4.0; 3], 1u8);
        let inner = cuboid([1.0; 3], [2.0; 3], 2u8);
        let mm = tagged(&outer, &inner);
        let Region::Normal(d) = extract(&mm, BooleanOp::Difference, true).expect("difference") else {
            panic!("expected a boundary");
        };
        assert_eq!(d.num_faces(), 24);
        assert_eq!(d.num_vertices(), 16);
        let Region::Normal(i) = extract(&mm, BooleanOp::Intersection, true).expect("intersection") else {
            panic!("expected a boundary");
        };
        assert!(i.payload.iter().all(|&p| p == 2));
        assert!((i.approx_area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn identical_cubes_collapse_to_uniform_results() {
        let a = cuboid([0.0; 3], [1.0; 3], 1u8);
        let b = cuboid([0.0; 3], [1.0; 3], 2u8);
        let mm = tagged(&a, &b);
        assert!(matches!(extract(&mm, BooleanOp::Difference, true), Ok(Region::Empty)));
        assert!(matches!(extract(&mm, BooleanOp::Universe, true), Ok(Region::Full)));
        let Ok(Region::Normal(u)) = extract(&mm, BooleanOp::Union, false) else {
            panic!("expected a boundary");
        };
        assert!(u.payload.iter().all(|&p| p == 2));
        assert_eq!(u.num_faces(), 12);
    }
}
