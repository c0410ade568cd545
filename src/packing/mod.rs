//! Grouping of scene triangles into 4-wide packs and the linear loop over them.

use index_vec::{IndexSlice, IndexVec};
use simba::simd::SimdValue;
use thiserror::Error;

use crate::{
    cast::{CastStatus, PackIntersector},
    geometry::{Ray, Triangle, Triangle4},
    util::simba::simd_windows,
};

pub const PACK_SIZE: usize = 4;

index_vec::define_index_type! {
    pub struct TriangleIdx = usize;
}

index_vec::define_index_type! {
    pub struct TrianglePackIdx = u32;
}

impl TrianglePackIdx {
    pub fn first_triangle(self) -> TriangleIdx {
        (self.raw() as usize * PACK_SIZE).into()
    }
}

/// Four triangles in SIMD layout, together with the index of the triangle in lane 0.
/// Lane `i` holds triangle `first + i`.
#[derive(Clone, Debug)]
pub struct TrianglePack {
    pub first: TriangleIdx,
    pub geometry: Triangle4,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackError {
    #[error("a pack needs at least one triangle")]
    Empty,
    #[error("a pack holds at most {PACK_SIZE} triangles, got {0}")]
    TooMany(usize),
}

impl TrianglePack {
    /// Packs one to four consecutive triangles, starting at `first`.
    /// Unused lanes get the zero triangle, which never intersects.
    pub fn new(first: TriangleIdx, triangles: &[Triangle]) -> Result<TrianglePack, PackError> {
        if triangles.is_empty() {
            return Err(PackError::Empty);
        }
        if triangles.len() > PACK_SIZE {
            return Err(PackError::TooMany(triangles.len()));
        }

        let mut geometry = Triangle4::default();
        for (lane, triangle) in triangles.iter().enumerate() {
            geometry.replace(lane, *triangle);
        }

        Ok(TrianglePack { first, geometry })
    }

    /// Index of the triangle in the given lane
    pub fn triangle_index(&self, lane: usize) -> TriangleIdx {
        self.first + lane
    }
}

/// Splits the triangle array into consecutive packs of four.
pub fn pack_triangles(
    triangles: &IndexSlice<TriangleIdx, [Triangle]>,
) -> IndexVec<TrianglePackIdx, TrianglePack> {
    let packs: IndexVec<TrianglePackIdx, TrianglePack> =
        simd_windows::<Triangle4>(triangles.iter().copied())
            .enumerate()
            .map(|(i, (geometry, _mask))| TrianglePack {
                first: TrianglePackIdx::from_usize(i).first_triangle(),
                geometry,
            })
            .collect();

    log::debug!(
        "packed {} triangles into {} packs ({} padding lanes)",
        triangles.len(),
        packs.len(),
        packs.len() * PACK_SIZE - triangles.len()
    );

    packs
}

/// Casts the ray against all packs in order.
/// Returns the nearest triangle hit during this call, the ray holds the hit details.
pub fn cast_packs(
    intersector: &(impl PackIntersector + ?Sized),
    triangles: &IndexSlice<TriangleIdx, [Triangle]>,
    packs: &IndexSlice<TrianglePackIdx, [TrianglePack]>,
    ray: &mut Ray,
) -> Option<TriangleIdx> {
    let mut hit = None;
    for pack in packs.iter() {
        if intersector.cast(triangles, ray, pack) == CastStatus::Hit {
            hit = ray.triangle;
        }
    }
    hit
}
