use std::array;

use assert2::debug_assert;
use index_vec::IndexSlice;
use simba::simd::{SimdPartialOrd as _, SimdValue};

use super::{CastStatus, LaneMask, commit, select_closest};
use crate::{
    geometry::{BarycentricCoordinates, FloatType, Ray, SimdFloatType, Triangle, TriangleHit},
    packing::{PACK_SIZE, TriangleIdx, TrianglePack},
};

/// Replaces the determinant of failed lanes, any non-zero value works.
const DETERMINANT_SENTINEL: FloatType = 4321.0;

/// Intersects the ray with all four triangles of the pack at once.
///
/// `triangles` must be the array the pack was built from; the winning triangle is
/// looked up there. On `CastStatus::Hit` the ray's hit fields are updated, for every
/// other status the ray is left unchanged.
pub fn cast4(
    triangles: &IndexSlice<TriangleIdx, [Triangle]>,
    ray: &mut Ray,
    pack: &TrianglePack,
) -> CastStatus {
    let zero = SimdFloatType::splat(0.0);
    let one = SimdFloatType::splat(1.0);
    let tri = &pack.geometry;
    let origin = ray.origin.map(SimdFloatType::splat);
    let direction = ray.direction.map(SimdFloatType::splat);

    let p = direction.cross(&tri.e2);
    let det = tri.e1.dot(&p);

    let mut fail = det.simd_eq(zero);
    if LaneMask::from_simd(fail).all_failed() {
        return CastStatus::Parallel;
    }

    let det = SimdFloatType::splat(DETERMINANT_SENTINEL).select(fail, det);
    let inv_det = one / det;

    let s = origin - tri.p1;
    let u = inv_det * s.dot(&p);
    fail = fail | u.simd_lt(zero) | u.simd_gt(one);
    if LaneMask::from_simd(fail).all_failed() {
        return CastStatus::OutsideU;
    }

    let q = s.cross(&tri.e1);
    let v = inv_det * direction.dot(&q);
    fail = fail | v.simd_lt(zero) | (u + v).simd_gt(one);
    if LaneMask::from_simd(fail).all_failed() {
        return CastStatus::OutsideV;
    }

    let t = inv_det * tri.e2.dot(&q);
    fail = fail | t.simd_lt(zero);
    let fail = LaneMask::from_simd(fail);
    if fail.all_failed() {
        return CastStatus::BehindOrigin;
    }

    let distances: [FloatType; PACK_SIZE] = array::from_fn(|lane| t.extract(lane));
    let Some(lane) = select_closest(fail, &distances) else {
        return CastStatus::BehindOrigin;
    };
    debug_assert!(!fail.is_failed(lane), "selected lane {lane} is failed: {fail:?}");

    let uv = BarycentricCoordinates { u, v }.extract(lane);
    commit(
        triangles,
        ray,
        pack,
        lane,
        TriangleHit {
            t: distances[lane],
            uv,
        },
    )
}
