use crate::common::bit_utils::BitBuffer;
use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
    Eci = 0b0111,
}

impl Mode {
    // 4 bit mode indicator
    pub fn mode_bits(self) -> u8 {
        self as u8
    }

    // Width of the character count field for versions 1-9, 10-26 and 27-40
    fn char_cnt_bits_table(self) -> [usize; 3] {
        match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
            Self::Kanji => [8, 10, 12],
            Self::Eci => [0, 0, 0],
        }
    }

    pub fn char_cnt_bits(self, ver: Version) -> usize {
        let tier = match *ver {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        self.char_cnt_bits_table()[tier]
    }

    pub fn contains(self, ch: char) -> bool {
        match self {
            Self::Numeric => ch.is_ascii_digit(),
            Self::Alphanumeric => alphanumeric_digit(ch).is_some(),
            Self::Byte => true,
            Self::Kanji | Self::Eci => false,
        }
    }
}

// Index of the char in the alphanumeric charset
pub(crate) fn alphanumeric_digit(ch: char) -> Option<u16> {
    let digit = match ch {
        '0'..='9' => ch as u16 - '0' as u16,
        'A'..='Z' => ch as u16 - 'A' as u16 + 10,
        ' ' => 36,
        '$' => 37,
        '%' => 38,
        '*' => 39,
        '+' => 40,
        '-' => 41,
        '.' => 42,
        '/' => 43,
        ':' => 44,
        _ => return None,
    };
    Some(digit)
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Segment {
    mode: Mode,
    // Count of source characters, not bits
    num_chars: usize,
    data: BitBuffer,
}

impl Segment {
    pub fn new(mode: Mode, num_chars: usize, data: BitBuffer) -> Self {
        Self { mode, num_chars, data }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.num_chars
    }

    pub fn data(&self) -> &BitBuffer {
        &self.data
    }

    // Header and payload bit length at the given version, or None if the char
    // count doesn't fit in the count field
    pub fn bit_len(&self, ver: Version) -> Option<usize> {
        let len_bits = self.mode.char_cnt_bits(ver);
        if self.num_chars >= 1 << len_bits {
            return None;
        }
        Some(4 + len_bits + self.data.len())
    }

    pub fn total_bits(segs: &[Segment], ver: Version) -> Option<usize> {
        segs.iter().try_fold(0, |acc, s| s.bit_len(ver).map(|l| acc + l))
    }
}

#[cfg(test)]
mod segment_tests {
    use super::{Mode, Segment};
    use crate::common::bit_utils::BitBuffer;
    use crate::common::metadata::Version;

    #[test]
    fn test_bit_len() {
        let mut data = BitBuffer::new();
        for b in b"hello" {
            data.append_bits(*b, 8);
        }
        let seg = Segment::new(Mode::Byte, 5, data);
        assert_eq!(seg.bit_len(Version::new(1).unwrap()), Some(4 + 8 + 40));
        assert_eq!(seg.bit_len(Version::new(10).unwrap()), Some(4 + 16 + 40));
    }

    #[test]
    fn test_char_count_overflow() {
        let seg = Segment::new(Mode::Byte, 256, BitBuffer::new());
        assert_eq!(seg.bit_len(Version::new(9).unwrap()), None);
        assert_eq!(seg.bit_len(Version::new(10).unwrap()), Some(20));
    }

    #[test]
    fn test_eci_has_no_count_field() {
        let seg = Segment::new(Mode::Eci, 0, BitBuffer::new());
        assert_eq!(seg.bit_len(Version::MIN), Some(4));
    }

    #[test]
    fn test_total_bits() {
        let ver = Version::MIN;
        let a = Segment::new(Mode::Numeric, 3, BitBuffer::new());
        let b = Segment::new(Mode::Alphanumeric, 512, BitBuffer::new());
        assert_eq!(Segment::total_bits(&[], ver), Some(0));
        assert_eq!(Segment::total_bits(&[a.clone(), a.clone()], ver), Some(28));
        assert_eq!(Segment::total_bits(&[a, b], ver), None);
    }
}

// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
