use simba::simd::{SimdBool, SimdValue};

use crate::geometry::SimdMaskType;

/// Converts a flat iterator of elements into an iterator of SIMD values and mask.
/// If input iterator length is not divisible by T::LANES, remainder of the last
/// vector will be filled with the content of T::default() and mask will be false.
pub fn simd_windows<T: SimdValue + Default>(
    value: impl IntoIterator<Item = T::Element>,
) -> impl Iterator<Item = (T, T::SimdBool)>
where
    T::SimdBool: SimdValue,
    <T::SimdBool as SimdValue>::Element: From<bool>,
{
    let mut iter = value.into_iter();
    std::iter::from_fn(move || {
        let mut t = T::default();
        let mut mask = <T::SimdBool as SimdValue>::splat(false.into());

        for (j, v) in (0..T::LANES).zip(&mut iter) {
            t.replace(j, v);
            mask.replace(j, true.into());
        }

        if mask.any() { Some((t, mask)) } else { None }
    })
}

/// Gathers one bit per lane, lane 0 in the lowest bit.
#[inline(always)]
pub fn lane_bits(mask: SimdMaskType) -> u8 {
    mask.0.move_mask() as u8
}
