// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::ops::Not;

/// Gets the bit at an offset from the most significant bit. Does NOT perform range checking
#[inline]
pub(crate) fn get_bit(data: &[u8], position: usize) -> usize {
    if (data[position / 8] as usize) & (1 << (8 - 1 - (position % 8))) > 0 {
        return 1;
    }
    0
}

/// Sets the bit at an offset from the most significant bit. Does NOT perform range checking
#[inline]
pub(crate) fn set_bit(data: &mut [u8], position: usize) {
    data[position / 8] |= 1 << (8 - 1 - (position % 8));
}

pub const fn bit_to_dir(bit: usize) -> TraverseDirection {
    match bit {
        0 => TraverseDirection::Left,
        1 => TraverseDirection::Right,
        _ => panic!("Invalid bit"),
    }
}

/// The direction taken at one level of the descent from the root towards a leaf. A `0` bit in the key indicates a
/// left traversal, and a `1` bit a right traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraverseDirection {
    Left,
    Right,
}

impl Not for TraverseDirection {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            TraverseDirection::Left => TraverseDirection::Right,
            TraverseDirection::Right => TraverseDirection::Left,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn get_bits() {
        let val = [0b10101010, 0b10101010, 0b00000000, 0b11111111];
        for i in 0..16 {
            assert_eq!(get_bit(&val, i), (i + 1) % 2);
        }
        for i in 16..24 {
            assert_eq!(get_bit(&val, i), 0);
        }
        for i in 24..32 {
            assert_eq!(get_bit(&val, i), 1);
        }
    }

    #[test]
    fn set_bits() {
        let mut val = [0u8; 4];
        set_bit(&mut val, 0);
        set_bit(&mut val, 9);
        set_bit(&mut val, 31);
        assert_eq!(val, [0b1000_0000, 0b0100_0000, 0b0000_0000, 0b0000_0001]);
        for (i, expected) in [(0, 1), (1, 0), (9, 1), (30, 0), (31, 1)] {
            assert_eq!(get_bit(&val, i), expected);
        }
    }

    #[test]
    fn bits_to_dirs() {
        assert_eq!(bit_to_dir(0), TraverseDirection::Left);
        assert_eq!(bit_to_dir(1), TraverseDirection::Right);
        assert_eq!(!TraverseDirection::Left, TraverseDirection::Right);
        assert_eq!(!TraverseDirection::Right, TraverseDirection::Left);
    }
}
