pub mod cast;
pub mod geometry;
pub mod packing;
mod util;

pub use cast::{
    CastStatus, HIT_COLOR, LaneMask, PackIntersector, ScalarIntersector, SimdIntersector,
    UnknownStatusCode, cast4, cast4_scalar,
};
pub use geometry::{Ray, Triangle, Triangle4};
pub use packing::{PackError, TriangleIdx, TrianglePack, TrianglePackIdx, cast_packs, pack_triangles};
pub use util::Rgb;
