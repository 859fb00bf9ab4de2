use std::{fmt::Display, mem};

use num_traits::PrimInt;

// Bit buffer
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { bits: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    // Appends the `size` low bits of `bits`, most significant first.
    // Requires 0 <= bits < 2^size and size <= 31.
    pub fn append_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        assert!(size <= 31, "Bit count out of range: {size}");
        assert!(bits >= T::zero(), "Negative value cannot be appended: {bits}");
        assert!(
            size >= max_bits || bits >> size == T::zero(),
            "Value doesn't fit in bit length: Length {size}, Bits {bits}"
        );

        self.bits.reserve(size);
        for i in (0..size).rev() {
            let bit = i < max_bits && (bits >> i) & T::one() == T::one();
            self.bits.push(bit);
        }
    }

    pub fn extend(&mut self, other: &BitBuffer) {
        self.bits.extend_from_slice(&other.bits);
    }

    // Packs bits into bytes big endian, zero padding the last byte
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut res = vec![0u8; self.bits.len().div_ceil(8)];
        for (i, &b) in self.bits.iter().enumerate() {
            res[i >> 3] |= (b as u8) << (7 - (i & 7));
        }
        res
    }
}

#[inline]
pub fn get_bit(number: u32, i: usize) -> bool {
    (number >> i) & 1 != 0
}

#[cfg(test)]
mod bit_buffer_tests {
    use proptest::prelude::*;

    use super::{get_bit, BitBuffer};

    fn read_bits(bytes: &[u8], offset: usize, size: usize) -> u32 {
        (offset..offset + size)
            .fold(0, |acc, i| (acc << 1) | ((bytes[i >> 3] >> (7 - (i & 7))) & 1) as u32)
    }

    #[test]
    fn test_len() {
        let mut bb = BitBuffer::new();
        assert!(bb.is_empty());
        bb.append_bits(0u8, 0);
        assert_eq!(bb.len(), 0);
        bb.append_bits(0b1000u8, 4);
        assert_eq!(bb.len(), 4);
        bb.append_bits(0b1000u16, 12);
        assert_eq!(bb.len(), 16);
        bb.append_bits(0b1111111u32, 7);
        assert_eq!(bb.len(), 23);
        bb.push(true);
        assert_eq!(bb.len(), 24);
    }

    #[test]
    fn test_append_bits_msb_first() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0b101u8, 3);
        bb.append_bits(0b01u8, 4);
        assert_eq!(bb.bits(), &[true, false, true, false, false, false, true]);
    }

    #[test]
    fn test_append_wider_than_type() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0xFFu8, 10);
        assert_eq!(bb.to_bytes(), vec![0b00111111, 0b11000000]);
    }

    #[test]
    fn test_to_bytes() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0b0100u8, 4);
        bb.append_bits(0b00010011u8, 8);
        bb.append_bits(0b1u8, 1);
        assert_eq!(bb.to_bytes(), vec![0b01000001, 0b00111000]);
        assert!(BitBuffer::new().to_bytes().is_empty());
    }

    #[test]
    fn test_extend() {
        let mut a = BitBuffer::new();
        a.append_bits(0b11u8, 2);
        let mut b = BitBuffer::new();
        b.append_bits(0b001u8, 3);
        a.extend(&b);
        assert_eq!(a.to_bytes(), vec![0b11001000]);
    }

    #[test]
    fn test_get_bit() {
        assert!(get_bit(0b100, 2));
        assert!(!get_bit(0b100, 1));
    }

    #[test]
    #[should_panic]
    fn test_append_bits_overflow() {
        BitBuffer::new().append_bits(0b1000u8, 3);
    }

    #[test]
    #[should_panic]
    fn test_append_bits_size_out_of_range() {
        BitBuffer::new().append_bits(1u64, 32);
    }

    proptest! {
        #[test]
        fn proptest_append_round_trip(size in 0usize..=31, raw in any::<u32>(), prefix in 0usize..8) {
            let val = if size == 0 { 0 } else { raw & ((1u32 << size) - 1) };
            let mut bb = BitBuffer::new();
            bb.append_bits(0u8, prefix);
            bb.append_bits(val, size);
            prop_assert_eq!(bb.len(), prefix + size);
            prop_assert_eq!(read_bits(&bb.to_bytes(), prefix, size), val);
        }
    }
}
