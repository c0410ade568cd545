use super::{BarycentricCoordinates, FloatType, Ray, Triangle};

/// The test of the intersection algorithm that rejected a triangle, in evaluation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MissStage {
    /// Ray is parallel to the triangle plane (or the triangle is degenerate).
    Determinant,
    /// Barycentric u is outside of [0, 1].
    U,
    /// Barycentric v is negative or u + v is above 1.
    V,
    /// Triangle plane is behind the ray origin.
    Distance,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    pub t: FloatType,
    pub uv: BarycentricCoordinates<FloatType>,
}

impl Triangle {
    /// Calculates ray intersection with a single (two sided) triangle.
    ///
    /// Evaluates the same expressions in the same order as the pack intersection in
    /// `crate::cast`, so that every lane of a pack gives bit-identical results.
    /// Boundaries are inclusive: u = 0, u = 1, v = 0, u + v = 1 and t = 0 are all hits.
    pub fn intersect(&self, ray: &Ray) -> Result<TriangleHit, MissStage> {
        let p = ray.direction.cross(&self.e2);
        let det = self.e1.dot(&p);
        if det == 0.0 {
            return Err(MissStage::Determinant);
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.p1;
        let u = inv_det * s.dot(&p);
        // Comparisons spelled out so that NaN passes, same as in the SIMD lanes.
        if u < 0.0 || u > 1.0 {
            return Err(MissStage::U);
        }

        let q = s.cross(&self.e1);
        let v = inv_det * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return Err(MissStage::V);
        }

        let t = inv_det * self.e2.dot(&q);
        if t < 0.0 {
            return Err(MissStage::Distance);
        }

        Ok(TriangleHit {
            t,
            uv: BarycentricCoordinates { u, v },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{WorldPoint, WorldVector};
    use assert2::{assert, let_assert};
    use test_case::test_case;

    /// Triangle (0, 0, 0), (1, 0, 0), (0, 1, 0).
    /// For rays along +z, u equals the origin's x, v equals its y and t is -z.
    fn unit_triangle() -> Triangle {
        Triangle::from_vertices(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
        )
    }

    fn ray_up(x: f32, y: f32, z: f32) -> Ray {
        Ray::builder()
            .origin(WorldPoint::new(x, y, z))
            .direction(WorldVector::new(0.0, 0.0, 1.0))
            .build()
    }

    #[test]
    fn hit_inside() {
        let_assert!(Ok(hit) = unit_triangle().intersect(&ray_up(0.25, 0.5, -2.0)));
        assert!(hit.t == 2.0);
        assert!(hit.uv == BarycentricCoordinates { u: 0.25, v: 0.5 });
    }

    #[test]
    fn hit_from_behind_is_two_sided() {
        let ray = Ray::builder()
            .origin(WorldPoint::new(0.25, 0.25, 3.0))
            .direction(WorldVector::new(0.0, 0.0, -1.0))
            .build();
        let_assert!(Ok(hit) = unit_triangle().intersect(&ray));
        assert!(hit.t == 3.0);
    }

    #[test]
    fn distance_scales_with_direction_length() {
        let ray = Ray::builder()
            .origin(WorldPoint::new(0.25, 0.25, -4.0))
            .direction(WorldVector::new(0.0, 0.0, 2.0))
            .build();
        let_assert!(Ok(hit) = unit_triangle().intersect(&ray));
        assert!(hit.t == 2.0);
    }

    #[test_case(0.0, 0.0, -1.0 ; "u_v_zero")]
    #[test_case(1.0, 0.0, -1.0 ; "u_one")]
    #[test_case(0.0, 1.0, -1.0 ; "v_one")]
    #[test_case(0.5, 0.5, -1.0 ; "u_plus_v_one")]
    #[test_case(0.25, 0.25, 0.0 ; "t_zero")]
    fn boundaries_are_hits(x: f32, y: f32, z: f32) {
        assert!(unit_triangle().intersect(&ray_up(x, y, z)).is_ok());
    }

    #[test_case(-0.001, 0.25, -1.0, MissStage::U ; "u_negative")]
    #[test_case(1.001, 0.0, -1.0, MissStage::U ; "u_above_one")]
    #[test_case(0.25, -0.001, -1.0, MissStage::V ; "v_negative")]
    #[test_case(0.5, 0.5001, -1.0, MissStage::V ; "u_plus_v_above_one")]
    #[test_case(0.25, 0.25, 0.001, MissStage::Distance ; "behind_origin")]
    fn misses(x: f32, y: f32, z: f32, stage: MissStage) {
        assert!(unit_triangle().intersect(&ray_up(x, y, z)) == Err(stage));
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::builder()
            .origin(WorldPoint::new(0.25, 0.25, -1.0))
            .direction(WorldVector::new(1.0, 0.0, 0.0))
            .build();
        assert!(unit_triangle().intersect(&ray) == Err(MissStage::Determinant));
    }

    #[test]
    fn degenerate_triangle_misses() {
        let result = Triangle::default().intersect(&ray_up(0.0, 0.0, -1.0));
        assert!(result == Err(MissStage::Determinant));
    }

    #[test]
    fn stages_are_ordered() {
        assert!(MissStage::Determinant < MissStage::U);
        assert!(MissStage::U < MissStage::V);
        assert!(MissStage::V < MissStage::Distance);
    }
}
