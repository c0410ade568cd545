use nalgebra::{Point3, Scalar, Vector3};
use num_traits::Zero;
use simba::simd::SimdValue;

use super::{FloatType, WorldPoint, WorldPoint4, WorldVector, WorldVector4};

/// Triangle stored as one vertex and the two edges leaving it.
///
/// With scalar coordinates this is a single scene triangle, with SIMD coordinates
/// it is a structure-of-arrays pack holding one triangle per lane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeTriangle<Point, Vector> {
    pub p1: Point,
    /// p2 - p1
    pub e1: Vector,
    /// p3 - p1
    pub e2: Vector,
}

pub type Triangle = EdgeTriangle<WorldPoint, WorldVector>;
pub type Triangle4 = EdgeTriangle<WorldPoint4, WorldVector4>;

impl<Point, Vector> EdgeTriangle<Point, Vector> {
    pub fn new(p1: Point, e1: Vector, e2: Vector) -> Self {
        EdgeTriangle { p1, e1, e2 }
    }
}

impl Triangle {
    pub fn from_vertices(p1: WorldPoint, p2: WorldPoint, p3: WorldPoint) -> Triangle {
        EdgeTriangle::new(p1, p2 - p1, p3 - p1)
    }

    pub fn vertices(&self) -> [WorldPoint; 3] {
        [self.p1, self.p1 + self.e1, self.p1 + self.e2]
    }

    /// Returns the point at barycentric coordinates `uv`, ie. `p1 + u * e1 + v * e2`.
    pub fn point_at(&self, uv: &BarycentricCoordinates<FloatType>) -> WorldPoint {
        self.p1 + (self.e1 * uv.u + self.e2 * uv.v)
    }

    /// Returns a normal vector of the triangle, not normalized.
    pub fn normal(&self) -> WorldVector {
        self.e1.cross(&self.e2)
    }
}

/// All-zero triangle. As a pack lane it never passes the determinant test.
impl<T: Scalar + Zero> Default for EdgeTriangle<Point3<T>, Vector3<T>> {
    fn default() -> Self {
        EdgeTriangle::new(Point3::origin(), Vector3::zeros(), Vector3::zeros())
    }
}

impl<T: SimdValue + Scalar> SimdValue for EdgeTriangle<Point3<T>, Vector3<T>>
where
    T::Element: Scalar,
{
    const LANES: usize = T::LANES;
    type Element = EdgeTriangle<Point3<T::Element>, Vector3<T::Element>>;
    type SimdBool = T::SimdBool;

    fn splat(val: Self::Element) -> Self {
        EdgeTriangle {
            p1: val.p1.map(T::splat),
            e1: val.e1.map(T::splat),
            e2: val.e2.map(T::splat),
        }
    }

    fn extract(&self, i: usize) -> Self::Element {
        EdgeTriangle {
            p1: self.p1.map(|x| x.extract(i)),
            e1: self.e1.map(|x| x.extract(i)),
            e2: self.e2.map(|x| x.extract(i)),
        }
    }

    unsafe fn extract_unchecked(&self, i: usize) -> Self::Element {
        unsafe {
            EdgeTriangle {
                p1: self.p1.map(|x| x.extract_unchecked(i)),
                e1: self.e1.map(|x| x.extract_unchecked(i)),
                e2: self.e2.map(|x| x.extract_unchecked(i)),
            }
        }
    }

    fn replace(&mut self, i: usize, val: Self::Element) {
        self.p1.coords.zip_apply(&val.p1.coords, |x, y| x.replace(i, y));
        self.e1.zip_apply(&val.e1, |x, y| x.replace(i, y));
        self.e2.zip_apply(&val.e2, |x, y| x.replace(i, y));
    }

    unsafe fn replace_unchecked(&mut self, i: usize, val: Self::Element) {
        unsafe {
            self.p1
                .coords
                .zip_apply(&val.p1.coords, |x, y| x.replace_unchecked(i, y));
            self.e1.zip_apply(&val.e1, |x, y| x.replace_unchecked(i, y));
            self.e2.zip_apply(&val.e2, |x, y| x.replace_unchecked(i, y));
        }
    }

    fn select(self, cond: Self::SimdBool, other: Self) -> Self {
        EdgeTriangle {
            p1: Point3::from(
                self.p1
                    .coords
                    .zip_map(&other.p1.coords, |x, y| x.select(cond, y)),
            ),
            e1: self.e1.zip_map(&other.e1, |x, y| x.select(cond, y)),
            e2: self.e2.zip_map(&other.e2, |x, y| x.select(cond, y)),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BarycentricCoordinates<T: SimdValue> {
    pub u: T,
    pub v: T,
}

impl<T: SimdValue> SimdValue for BarycentricCoordinates<T> {
    const LANES: usize = T::LANES;

    type Element = BarycentricCoordinates<T::Element>;

    type SimdBool = T::SimdBool;

    fn splat(val: Self::Element) -> Self {
        BarycentricCoordinates {
            u: T::splat(val.u),
            v: T::splat(val.v),
        }
    }

    fn extract(&self, i: usize) -> Self::Element {
        BarycentricCoordinates {
            u: self.u.extract(i),
            v: self.v.extract(i),
        }
    }

    unsafe fn extract_unchecked(&self, i: usize) -> Self::Element {
        unsafe {
            BarycentricCoordinates {
                u: self.u.extract_unchecked(i),
                v: self.v.extract_unchecked(i),
            }
        }
    }

    fn replace(&mut self, i: usize, val: Self::Element) {
        self.u.replace(i, val.u);
        self.v.replace(i, val.v);
    }

    unsafe fn replace_unchecked(&mut self, i: usize, val: Self::Element) {
        unsafe {
            self.u.replace_unchecked(i, val.u);
            self.v.replace_unchecked(i, val.v);
        }
    }

    fn select(self, cond: Self::SimdBool, other: Self) -> Self {
        BarycentricCoordinates {
            u: self.u.select(cond, other.u),
            v: self.v.select(cond, other.v),
        }
    }
}
