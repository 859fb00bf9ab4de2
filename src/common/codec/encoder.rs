pub use encode::*;

// Segment factories
//------------------------------------------------------------------------------

pub mod encode {
    use encoding_rs::SHIFT_JIS;
    use tracing::debug;

    use crate::common::bit_utils::BitBuffer;
    use crate::common::codec::{alphanumeric_digit, Mode, Segment};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    impl Segment {
        // Segments for text in the cheapest single mode: numeric, then
        // alphanumeric, then byte over UTF-8. Kanji is never chosen here.
        pub fn make_segments(text: &str) -> Vec<Segment> {
            if text.is_empty() {
                return Vec::new();
            }

            let seg = if text.chars().all(|c| Mode::Numeric.contains(c)) {
                Self::encode_numeric(text)
            } else if text.chars().all(|c| Mode::Alphanumeric.contains(c)) {
                Self::encode_alphanumeric(text)
            } else {
                Self::make_bytes(text.as_bytes())
            };
            debug!(mode = ?seg.mode(), chars = seg.num_chars(), bits = seg.data().len(), "Built segment");
            vec![seg]
        }

        pub fn make_bytes(data: &[u8]) -> Segment {
            let mut bb = BitBuffer::with_capacity(data.len() * 8);
            for &b in data {
                bb.append_bits(b, 8);
            }
            Segment::new(Mode::Byte, data.len(), bb)
        }

        pub fn make_numeric(digits: &str) -> QRResult<Segment> {
            if let Some(ch) = digits.chars().find(|&c| !Mode::Numeric.contains(c)) {
                return Err(QRError::InvalidChar { ch, mode: Mode::Numeric });
            }
            Ok(Self::encode_numeric(digits))
        }

        pub fn make_alphanumeric(text: &str) -> QRResult<Segment> {
            if let Some(ch) = text.chars().find(|&c| !Mode::Alphanumeric.contains(c)) {
                return Err(QRError::InvalidChar { ch, mode: Mode::Alphanumeric });
            }
            Ok(Self::encode_alphanumeric(text))
        }

        // Kanji mode over the Shift_JIS double byte ranges 0x8140-0x9FFC and
        // 0xE040-0xEBBF, 13 bits per char
        pub fn make_kanji(text: &str) -> QRResult<Segment> {
            let mut bb = BitBuffer::new();
            let mut num_chars = 0;
            let mut buf = [0u8; 4];
            for ch in text.chars() {
                let (sjis, _, had_errors) = SHIFT_JIS.encode(ch.encode_utf8(&mut buf));
                let invalid = QRError::InvalidChar { ch, mode: Mode::Kanji };
                if had_errors || sjis.len() != 2 {
                    return Err(invalid);
                }
                let code = (sjis[0] as u16) << 8 | sjis[1] as u16;
                let offset = match code {
                    0x8140..=0x9FFC => code - 0x8140,
                    0xE040..=0xEBBF => code - 0xC140,
                    _ => return Err(invalid),
                };
                bb.append_bits((offset >> 8) * 0xC0 + (offset & 0xFF), 13);
                num_chars += 1;
            }
            Ok(Segment::new(Mode::Kanji, num_chars, bb))
        }

        // Extended Channel Interpretation designator with no data chars
        pub fn make_eci(assign_val: u32) -> QRResult<Segment> {
            let mut bb = BitBuffer::new();
            match assign_val {
                0..=0x7F => bb.append_bits(assign_val, 8),
                0x80..=0x3FFF => {
                    bb.append_bits(0b10u8, 2);
                    bb.append_bits(assign_val, 14);
                }
                0x4000..=999_999 => {
                    bb.append_bits(0b110u8, 3);
                    bb.append_bits(assign_val, 21);
                }
                _ => return Err(QRError::InvalidEciAssignment(assign_val)),
            }
            Ok(Segment::new(Mode::Eci, 0, bb))
        }

        fn encode_numeric(digits: &str) -> Segment {
            let bytes = digits.as_bytes();
            let mut bb = BitBuffer::with_capacity(Self::numeric_len(bytes.len()));
            for chunk in bytes.chunks(3) {
                let val = chunk.iter().fold(0u16, |n, b| n * 10 + (b - b'0') as u16);
                bb.append_bits(val, chunk.len() * 3 + 1);
            }
            Segment::new(Mode::Numeric, bytes.len(), bb)
        }

        fn encode_alphanumeric(text: &str) -> Segment {
            let digits = text.chars().filter_map(alphanumeric_digit).collect::<Vec<_>>();
            debug_assert!(
                digits.len() == text.chars().count(),
                "Non alphanumeric char in text: {text}"
            );

            let mut bb = BitBuffer::with_capacity((digits.len() * 11).div_ceil(2));
            for chunk in digits.chunks(2) {
                let val = chunk.iter().fold(0u16, |n, d| n * 45 + d);
                bb.append_bits(val, chunk.len() * 5 + 1);
            }
            Segment::new(Mode::Alphanumeric, digits.len(), bb)
        }

        fn numeric_len(len: usize) -> usize {
            (len * 10).div_ceil(3)
        }
    }

    // Version selection & codeword assembly
    //--------------------------------------------------------------------------

    // Smallest version in range whose data capacity at `ecl` holds the
    // segments. Returns the version with the bits used.
    pub fn find_version(
        segs: &[Segment],
        ecl: ECLevel,
        min: Version,
        max: Version,
    ) -> QRResult<(Version, usize)> {
        if min > max {
            return Err(QRError::InvalidVersionRange { min: *min, max: *max });
        }

        for ver in Version::range(min, max) {
            let bit_capacity = ver.data_bit_capacity(ecl);
            if let Some(used) = Segment::total_bits(segs, ver) {
                if used <= bit_capacity {
                    return Ok((ver, used));
                }
            }
        }
        Err(QRError::DataTooLong { capacity: max.data_codewords(ecl) })
    }

    // Highest level of M, Q, H that still holds `used_bits` at `ver`, or `ecl`
    // if none of them is higher and fits
    pub fn boost_ec_level(used_bits: usize, ver: Version, ecl: ECLevel) -> ECLevel {
        [ECLevel::M, ECLevel::Q, ECLevel::H]
            .into_iter()
            .filter(|&e| e > ecl && used_bits <= ver.data_bit_capacity(e))
            .last()
            .unwrap_or(ecl)
    }

    // Concatenates segments and fills the data capacity with terminator,
    // bit padding and alternating pad codewords
    pub fn assemble_codewords(segs: &[Segment], ver: Version, ecl: ECLevel) -> Vec<u8> {
        let bit_capacity = ver.data_bit_capacity(ecl);
        let mut bs = BitBuffer::with_capacity(bit_capacity);
        for seg in segs {
            push_segment(seg, ver, &mut bs);
        }
        assert!(
            bs.len() <= bit_capacity,
            "Segments overflow data capacity: Capacity {bit_capacity}, Size {}",
            bs.len()
        );

        push_terminator(&mut bs, bit_capacity);
        pad_remaining_capacity(&mut bs, bit_capacity);

        let res = bs.to_bytes();
        assert_eq!(res.len(), ver.data_codewords(ecl), "Data codeword count mismatch");
        res
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitBuffer;
    use crate::common::codec::{Segment, PADDING_CODEWORDS};
    use crate::common::metadata::Version;

    pub fn push_segment(seg: &Segment, ver: Version, out: &mut BitBuffer) {
        push_header(seg, ver, out);
        out.extend(seg.data());
    }

    fn push_header(seg: &Segment, ver: Version, out: &mut BitBuffer) {
        let len_bits = seg.mode().char_cnt_bits(ver);
        let char_cnt = seg.num_chars();
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.append_bits(seg.mode().mode_bits(), 4);
        out.append_bits(char_cnt, len_bits);
    }

    pub fn push_terminator(out: &mut BitBuffer, bit_capacity: usize) {
        let bit_len = out.len();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.append_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitBuffer, bit_capacity: usize) {
        push_padding_bits(out);
        push_padding_codewords(out, bit_capacity);
    }

    fn push_padding_bits(out: &mut BitBuffer) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.append_bits(0u8, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitBuffer, bit_capacity: usize) {
        let offset = out.len() & 7;
        debug_assert!(offset == 0, "Bit offset should be zero before padding codewords: {offset}");

        let remain_byte_capacity = (bit_capacity - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.append_bits(pc, 8);
        });
    }

    #[cfg(test)]
    mod writer_tests {
        use super::{push_header, push_padding_bits, push_padding_codewords, push_terminator};
        use crate::common::bit_utils::BitBuffer;
        use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};
        use crate::common::metadata::Version;

        #[test]
        fn test_push_header_v1() {
            let ver = Version::new(1).unwrap();
            let exp_vecs: Vec<Vec<u8>> = vec![
                vec![0b00011111, 0b11111100],
                vec![0b00101111, 0b11111000],
                vec![0b01001111, 0b11110000],
            ];
            let modes = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];
            let max_chars = [1023, 511, 255];
            for ((mode, cnt), exp_vec) in modes.iter().zip(max_chars).zip(exp_vecs.iter()) {
                let mut bs = BitBuffer::new();
                push_header(&Segment::new(*mode, cnt, BitBuffer::new()), ver, &mut bs);
                assert_eq!(bs.to_bytes(), *exp_vec);
            }
        }

        #[test]
        fn test_push_header_v27() {
            let ver = Version::new(27).unwrap();
            let exp_vecs: Vec<Vec<u8>> = vec![
                vec![0b00011111, 0b11111111, 0b11000000],
                vec![0b00101111, 0b11111111, 0b10000000],
                vec![0b01001111, 0b11111111, 0b11110000],
            ];
            let modes = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];
            let max_chars = [16383, 8191, 65535];
            for ((mode, cnt), exp_vec) in modes.iter().zip(max_chars).zip(exp_vecs.iter()) {
                let mut bs = BitBuffer::new();
                push_header(&Segment::new(*mode, cnt, BitBuffer::new()), ver, &mut bs);
                assert_eq!(bs.to_bytes(), *exp_vec);
            }
        }

        #[test]
        fn test_push_terminator() {
            let bit_capacity = 152;
            let mut bs = BitBuffer::new();
            bs.append_bits(0b1u8, 1);
            push_terminator(&mut bs, bit_capacity);
            assert_eq!(bs.to_bytes(), vec![0b10000000]);
            assert_eq!(bs.len(), 5);
            while bs.len() < bit_capacity - 2 {
                bs.push(true);
            }
            push_terminator(&mut bs, bit_capacity);
            assert_eq!(bs.len(), bit_capacity);
            push_terminator(&mut bs, bit_capacity);
            assert_eq!(bs.len(), bit_capacity);
        }

        #[test]
        fn test_push_padding_bits() {
            let mut bs = BitBuffer::new();
            bs.append_bits(0b1u8, 1);
            push_padding_bits(&mut bs);
            assert_eq!(bs.to_bytes(), vec![0b10000000]);
            assert_eq!(bs.len() & 7, 0);
        }

        #[test]
        fn test_push_padding_codewords() {
            let bit_capacity = 152;
            let mut bs = BitBuffer::new();
            bs.append_bits(0b1u8, 1);
            push_padding_bits(&mut bs);
            push_padding_codewords(&mut bs, bit_capacity);
            let mut output = vec![0b10000000];
            output.extend(PADDING_CODEWORDS.iter().cycle().take(18));
            assert_eq!(bs.to_bytes(), output);
        }
    }
}
