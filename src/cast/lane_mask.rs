use std::ops::{BitOr, BitOrAssign};

use assert2::debug_assert;

use crate::{
    geometry::SimdMaskType,
    packing::PACK_SIZE,
    util::{BitIter, bit_iter, simba::lane_bits},
};

/// Gathered per-lane failure flags of a pack test.
/// Bit `i` set means triangle in lane `i` is known not to be hit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LaneMask(u8);

impl LaneMask {
    const LANE_BITS: u8 = (1 << PACK_SIZE) - 1;

    pub const NONE: LaneMask = LaneMask(0);
    pub const ALL: LaneMask = LaneMask(Self::LANE_BITS);

    pub fn from_bits(bits: u8) -> LaneMask {
        LaneMask(bits & Self::LANE_BITS)
    }

    pub fn from_simd(mask: SimdMaskType) -> LaneMask {
        Self::from_bits(lane_bits(mask))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn fail(&mut self, lane: usize) {
        debug_assert!(lane < PACK_SIZE);
        self.0 |= 1 << lane;
    }

    pub fn is_failed(self, lane: usize) -> bool {
        self.0 & (1 << lane) != 0
    }

    pub fn all_failed(self) -> bool {
        self == Self::ALL
    }

    pub fn survivor_count(self) -> usize {
        PACK_SIZE - self.0.count_ones() as usize
    }

    /// Lane of the only surviving triangle, None if there are zero or several survivors.
    pub fn single_survivor(self) -> Option<usize> {
        let alive = !self.0 & Self::LANE_BITS;
        if alive.is_power_of_two() {
            Some(alive.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Iterates surviving lanes in increasing order.
    pub fn survivors(self) -> BitIter {
        bit_iter(!self.0 & Self::LANE_BITS)
    }
}

impl BitOr for LaneMask {
    type Output = LaneMask;

    fn bitor(self, rhs: LaneMask) -> LaneMask {
        LaneMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for LaneMask {
    fn bitor_assign(&mut self, rhs: LaneMask) {
        self.0 |= rhs.0;
    }
}
