use std::array;

use index_vec::IndexSlice;
use simba::simd::SimdValue as _;

use super::{CastStatus, LaneMask, commit, select_closest};
use crate::{
    geometry::{FloatType, MissStage, Ray, Triangle, TriangleHit},
    packing::{PACK_SIZE, TriangleIdx, TrianglePack},
};

/// Reference version of `cast4`, testing the lanes one by one.
///
/// Produces the same status and the same ray state as the SIMD version, bit for bit.
pub fn cast4_scalar(
    triangles: &IndexSlice<TriangleIdx, [Triangle]>,
    ray: &mut Ray,
    pack: &TrianglePack,
) -> CastStatus {
    let results: [Result<TriangleHit, MissStage>; PACK_SIZE] =
        array::from_fn(|lane| pack.geometry.extract(lane).intersect(ray));

    let mut fail = LaneMask::NONE;
    let mut latest = MissStage::Determinant;
    for (lane, result) in results.iter().enumerate() {
        if let Err(stage) = result {
            fail.fail(lane);
            latest = latest.max(*stage);
        }
    }

    if fail.all_failed() {
        return latest.into();
    }

    let distances: [FloatType; PACK_SIZE] = array::from_fn(|lane| match &results[lane] {
        Ok(hit) => hit.t,
        Err(_) => FloatType::INFINITY,
    });
    let Some(lane) = select_closest(fail, &distances) else {
        return latest.into();
    };
    let Ok(hit) = results[lane] else {
        return latest.into();
    };

    commit(triangles, ray, pack, lane, hit)
}
