//! Intersection of a single ray with a pack of four triangles.
//!
//! The pack is tested with the Moller-Trumbore algorithm on all four lanes at once.
//! Every lane carries a failure flag; once all four flags are set the test returns
//! early with the status of the checkpoint where that happened. Otherwise the nearest
//! surviving lane is written into the ray, if it improves the ray's current best hit.

mod lane_mask;
mod scalar;
mod simd;

use index_vec::IndexSlice;
use thiserror::Error;

use crate::{
    geometry::{FloatType, MissStage, Ray, Triangle, TriangleHit},
    packing::{PACK_SIZE, TriangleIdx, TrianglePack},
    util::Rgb,
};

pub use lane_mask::LaneMask;
pub use scalar::cast4_scalar;
pub use simd::cast4;

/// Color written into the ray on a successful hit.
pub const HIT_COLOR: Rgb = Rgb {
    r: 0.3,
    g: 0.7,
    b: 1.0,
};

/// Outcome of one ray vs. pack test.
///
/// Negative values are misses, named after the last checkpoint reached:
/// when some lanes fail early and the rest later, the later checkpoint is reported.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastStatus {
    /// All lanes parallel to the ray or degenerate.
    Parallel = -1,
    /// All lanes failed by the time u was checked.
    OutsideU = -2,
    /// All lanes failed by the time v and u + v were checked.
    OutsideV = -3,
    /// All lanes failed, the last ones because they lie behind the ray origin.
    BehindOrigin = -4,
    /// Nearer hit found, the ray was updated.
    Hit = 1,
    /// A hit exists, but it is not nearer than the ray's current one. Ray unchanged.
    NotNearer = 2,
}

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown cast status code {0}")]
pub struct UnknownStatusCode(pub i32);

impl CastStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_hit(self) -> bool {
        self == CastStatus::Hit
    }

    /// True if no triangle of the pack was hit at all.
    pub fn is_miss(self) -> bool {
        self.code() < 0
    }
}

impl From<MissStage> for CastStatus {
    fn from(stage: MissStage) -> Self {
        match stage {
            MissStage::Determinant => CastStatus::Parallel,
            MissStage::U => CastStatus::OutsideU,
            MissStage::V => CastStatus::OutsideV,
            MissStage::Distance => CastStatus::BehindOrigin,
        }
    }
}

impl TryFrom<i32> for CastStatus {
    type Error = UnknownStatusCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(CastStatus::Parallel),
            -2 => Ok(CastStatus::OutsideU),
            -3 => Ok(CastStatus::OutsideV),
            -4 => Ok(CastStatus::BehindOrigin),
            1 => Ok(CastStatus::Hit),
            2 => Ok(CastStatus::NotNearer),
            _ => Err(UnknownStatusCode(code)),
        }
    }
}

/// Ray vs. triangle pack test. Implemented by the SIMD version and the scalar reference.
pub trait PackIntersector {
    fn cast(
        &self,
        triangles: &IndexSlice<TriangleIdx, [Triangle]>,
        ray: &mut Ray,
        pack: &TrianglePack,
    ) -> CastStatus;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SimdIntersector;

#[derive(Copy, Clone, Debug, Default)]
pub struct ScalarIntersector;

impl PackIntersector for SimdIntersector {
    fn cast(
        &self,
        triangles: &IndexSlice<TriangleIdx, [Triangle]>,
        ray: &mut Ray,
        pack: &TrianglePack,
    ) -> CastStatus {
        cast4(triangles, ray, pack)
    }
}

impl PackIntersector for ScalarIntersector {
    fn cast(
        &self,
        triangles: &IndexSlice<TriangleIdx, [Triangle]>,
        ray: &mut Ray,
        pack: &TrianglePack,
    ) -> CastStatus {
        cast4_scalar(triangles, ray, pack)
    }
}

/// Picks the surviving lane with the smallest distance, ties go to the lower lane.
/// A NaN distance only wins if every survivor has one.
fn select_closest(fail: LaneMask, t: &[FloatType; PACK_SIZE]) -> Option<usize> {
    if let Some(lane) = fail.single_survivor() {
        return Some(lane);
    }

    let mut survivors = fail.survivors();
    let first = survivors.next()?;
    Some(survivors.fold(first, |best, lane| {
        let nearer = t[lane] < t[best] || (t[best].is_nan() && !t[lane].is_nan());
        if nearer { lane } else { best }
    }))
}

/// Writes the hit into the ray, unless the ray already has a nearer one.
fn commit(
    triangles: &IndexSlice<TriangleIdx, [Triangle]>,
    ray: &mut Ray,
    pack: &TrianglePack,
    lane: usize,
    hit: TriangleHit,
) -> CastStatus {
    if hit.t.abs() > ray.t.abs() {
        return CastStatus::NotNearer;
    }

    let index = pack.triangle_index(lane);
    ray.intersection = triangles[index].point_at(&hit.uv);
    ray.t = hit.t;
    ray.color = HIT_COLOR;
    ray.triangle = Some(index);

    CastStatus::Hit
}
