mod ray_triangle_intersection;
mod triangle;

use bon::bon;
use nalgebra::{Point3, Vector3};
use simba::simd::{WideBoolF32x4, WideF32x4};

use crate::{packing::TriangleIdx, util::Rgb};

pub use ray_triangle_intersection::{MissStage, TriangleHit};
pub use triangle::{BarycentricCoordinates, EdgeTriangle, Triangle, Triangle4};

pub type FloatType = f32;
pub type SimdFloatType = WideF32x4;
pub type SimdMaskType = WideBoolF32x4;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type WorldPoint4 = Point3<SimdFloatType>;
pub type WorldVector4 = Vector3<SimdFloatType>;

#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray, not normalized.
    /// All distances along the ray are multiples of this vector.
    pub direction: WorldVector,

    /// Distance of the best hit so far.
    /// Before the first hit this is the farthest distance the caller accepts.
    pub t: FloatType,
    pub intersection: WorldPoint,
    pub color: Rgb,
    /// Triangle of the best hit, indexing the array the packs were built from.
    pub triangle: Option<TriangleIdx>,
}

#[bon]
impl Ray {
    #[builder]
    pub fn new(
        origin: WorldPoint,
        direction: WorldVector,
        #[builder(default = FloatType::INFINITY)] max_distance: FloatType,
    ) -> Ray {
        Ray {
            origin,
            direction,
            t: max_distance,
            intersection: WorldPoint::origin(),
            color: Rgb::new(0.0, 0.0, 0.0),
            triangle: None,
        }
    }
}

impl Ray {
    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction * distance
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use assert2::assert;
    use proptest::prelude::*;

    /// Helper macro that creates a wrapper around a type that implements Deref and Arbitrary
    macro_rules! arbitrary_wrapper {
        ( $wrapper_name:ident ( $type:ty ) -> $block:block ) => {
            #[derive(Clone, Debug)]
            pub struct $wrapper_name(pub $type);

            impl std::ops::Deref for $wrapper_name {
                type Target = $type;
                fn deref(&self) -> &$type {
                    &self.0
                }
            }

            impl Arbitrary for $wrapper_name {
                type Parameters = ();
                type Strategy = proptest::strategy::BoxedStrategy<Self>;
                fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
                    $block.prop_map(|x| $wrapper_name(x)).boxed()
                }
            }
        };
    }

    /// Floats on a 1/64 grid, small enough that products stay exact-ish.
    pub fn simple_float() -> BoxedStrategy<f32> {
        (-1024i32..=1024).prop_map(|n| n as f32 / 64.0).boxed()
    }

    arbitrary_wrapper! {
        WorldPointWrapper(WorldPoint) -> {
            (simple_float(), simple_float(), simple_float())
                .prop_map(|coords| WorldPoint::new(coords.0, coords.1, coords.2))
        }
    }

    arbitrary_wrapper! {
        NonzeroWorldVectorWrapper(WorldVector) -> {
            (simple_float(), simple_float(), simple_float())
                .prop_filter_map("vector is zero", |coords| {
                    let vector = WorldVector::new(coords.0, coords.1, coords.2);
                    if vector.norm() < 1e-6 {
                        None
                    } else {
                        Some(vector)
                    }
                })
        }
    }

    arbitrary_wrapper! {
        TriangleWrapper(Triangle) -> {
            (
                any::<WorldPointWrapper>(),
                any::<WorldPointWrapper>(),
                any::<WorldPointWrapper>(),
            )
                .prop_map(|(a, b, c)| Triangle::from_vertices(*a, *b, *c))
        }
    }

    arbitrary_wrapper! {
        RayWrapper(Ray) -> {
            (any::<WorldPointWrapper>(), any::<NonzeroWorldVectorWrapper>())
                .prop_map(|(origin, direction)| {
                    Ray::builder().origin(*origin).direction(*direction).build()
                })
        }
    }

    #[test]
    fn builder_defaults_to_unlimited_distance() {
        let ray = Ray::builder()
            .origin(WorldPoint::new(1.0, 2.0, 3.0))
            .direction(WorldVector::new(0.0, 0.0, 2.0))
            .build();

        assert!(ray.t == FloatType::INFINITY);
        assert!(ray.triangle.is_none());
    }

    #[test]
    fn builder_max_distance() {
        let ray = Ray::builder()
            .origin(WorldPoint::origin())
            .direction(WorldVector::new(1.0, 0.0, 0.0))
            .max_distance(7.5)
            .build();

        assert!(ray.t == 7.5);
    }

    #[test]
    fn point_at_uses_unnormalized_direction() {
        let ray = Ray::builder()
            .origin(WorldPoint::new(1.0, 0.0, 0.0))
            .direction(WorldVector::new(0.0, 0.0, 2.0))
            .build();

        assert!(ray.point_at(1.5) == WorldPoint::new(1.0, 0.0, 3.0));
    }
}
