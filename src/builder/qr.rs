use std::ops::Deref;

use crate::common::bit_utils::get_bit;
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    format_info, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN, VERSION_INFO_BIT_LEN,
};

// Module state while the symbol is under construction. Every variant other
// than Empty and Data is a function module, which masking never touches.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

impl Module {
    pub fn is_function(self) -> bool {
        matches!(self, Module::Func(_) | Module::Version(_) | Module::Format(_))
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    // Row major module colors, consuming the builder grid
    pub fn into_colors(self) -> Vec<Color> {
        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module in finished qr");
        self.grid.into_iter().map(|m| *m).collect()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i32;
        let mut res = String::with_capacity((w * (w + 1) + 1) as usize);
        res.push('\n');
        for y in 0..w {
            for x in 0..w {
                let c = match self.get(x, y) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates count back from the far edge
    fn coord_to_index(&self, x: i32, y: i32) -> usize {
        let w = self.w as i32;
        debug_assert!(-w <= x && x < w, "x out of bounds: {x}");
        debug_assert!(-w <= y && y < w, "y out of bounds: {y}");

        let x = if x < 0 { x + w } else { x };
        let y = if y < 0 { y + w } else { y };
        (y * w + x) as _
    }

    pub fn get(&self, x: i32, y: i32) -> Module {
        self.grid[self.coord_to_index(x, y)]
    }

    pub fn is_dark(&self, x: i32, y: i32) -> bool {
        *self.get(x, y) == Color::Dark
    }

    pub fn set(&mut self, x: i32, y: i32, module: Module) {
        let index = self.coord_to_index(x, y);
        self.grid[index] = module;
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    // Full row and column 6; finder patterns overwrite both ends
    fn draw_timing_patterns(&mut self) {
        let w = self.w as i32;
        for i in 0..w {
            let m = Module::Func(Color::from(i & 1 == 0));
            self.set(6, i, m);
            self.set(i, 6, m);
        }
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        let w = self.w as i32;
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(w - 4, 3);
        self.draw_finder_pattern_at(3, w - 4);
    }

    // 7x7 finder with its light separator, clipped at the symbol edge
    fn draw_finder_pattern_at(&mut self, x: i32, y: i32) {
        let w = self.w as i32;
        for dy in -4..=4 {
            for dx in -4..=4 {
                let (xx, yy) = (x + dx, y + dy);
                if !(0..w).contains(&xx) || !(0..w).contains(&yy) {
                    continue;
                }
                let dist = std::cmp::max(i32::abs(dx), i32::abs(dy));
                self.set(xx, yy, Module::Func(Color::from(dist != 2 && dist != 4)));
            }
        }
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        let last = poses.len().saturating_sub(1);
        for (i, &x) in poses.iter().enumerate() {
            for (j, &y) in poses.iter().enumerate() {
                // Corners occupied by finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern_at(x, y);
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                let dist = std::cmp::max(i32::abs(dx), i32::abs(dy));
                self.set(x + dx, y + dy, Module::Func(Color::from(dist != 1)));
            }
        }
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    // Timing, finder and alignment patterns, format info for mask 0 as a
    // placeholder and version info from version 7 onwards
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_timing_patterns();
        self.draw_finder_patterns();
        self.draw_alignment_patterns();
        self.draw_format_info(MaskPattern::ALL[0]);
        self.draw_version_info();
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    // Both copies of the 15 bit format info for the qr's ec level and `mask`
    pub fn draw_format_info(&mut self, mask: MaskPattern) {
        let info = format_info(self.ecl, *mask);
        self.draw_number(info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_SIDE);
        self.set(8, -8, Module::Format(Color::Dark));
    }

    // 6x3 blocks near the top right and bottom left finders, transposed copies
    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }

        let info = self.ver.info();
        let w = self.w as i32;
        for i in 0..VERSION_INFO_BIT_LEN {
            let m = Module::Version(Color::from(get_bit(info, i)));
            let a = w - 11 + (i % 3) as i32;
            let b = (i / 3) as i32;
            self.set(a, b, m);
            self.set(b, a, m);
        }
    }

    // Most significant bit first
    fn draw_number(&mut self, number: u32, bit_len: usize, coords: &[(i32, i32)]) {
        debug_assert!(coords.len() == bit_len, "Coordinate count doesn't match bit length");
        for (i, (x, y)) in coords.iter().enumerate() {
            let bit = get_bit(number, bit_len - 1 - i);
            self.set(*x, *y, Module::Format(Color::from(bit)));
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    // Places codewords msb first along the zigzag path over non-function
    // modules. Remainder modules past the last codeword stay light.
    pub fn draw_codewords(&mut self, codewords: &[u8]) {
        assert_eq!(
            codewords.len(),
            self.ver.total_codewords(),
            "Codeword count doesn't match version {}",
            self.ver
        );
        let total_bits = codewords.len() << 3;
        let mut i = 0;
        for (x, y) in EncRegionIter::new(self.ver) {
            let module = self.get(x, y);
            if module.is_function() {
                continue;
            }
            debug_assert!(module == Module::Empty, "Data module drawn twice at ({x}, {y})");
            let bit = i < total_bits && get_bit(codewords[i >> 3] as u32, 7 - (i & 7));
            self.set(x, y, Module::Data(Color::from(bit)));
            i += 1;
        }
        assert_eq!(i, self.ver.raw_data_modules(), "Encoding region not fully covered");
        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module after drawing codewords");
    }

    // Xor with the mask pattern over data modules; applying twice undoes it
    pub fn apply_mask(&mut self, mask: MaskPattern) {
        let mask_fn = mask.mask_functions();
        let w = self.w as i32;
        for y in 0..w {
            for x in 0..w {
                if let Module::Data(clr) = self.get(x, y) {
                    if mask_fn(x, y) {
                        self.set(x, y, Module::Data(!clr));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use super::{Module, QR};
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, ECLevel, Version};

    fn drawn(ver: u8, codewords: &[u8]) -> QR {
        let mut qr = QR::new(Version::new(ver).unwrap(), ECLevel::L);
        qr.draw_all_function_patterns();
        qr.draw_codewords(codewords);
        qr
    }

    #[test]
    fn test_first_codeword_placement() {
        let ver = Version::MIN;
        let mut codewords = vec![0u8; ver.total_codewords()];
        codewords[0] = 0b1010_0110;
        let qr = drawn(1, &codewords);
        let exp = [(20, 20, true), (19, 20, false), (20, 19, true), (19, 19, false)];
        for (x, y, dark) in exp {
            assert_eq!(qr.get(x, y), Module::Data(Color::from(dark)), "({x}, {y})");
        }
        let exp = [(20, 18, false), (19, 18, true), (20, 17, true), (19, 17, false)];
        for (x, y, dark) in exp {
            assert_eq!(qr.get(x, y), Module::Data(Color::from(dark)), "({x}, {y})");
        }
    }

    #[test]
    fn test_remainder_modules_light() {
        // Version 2 has 7 remainder bits, all placed last along the path
        let ver = Version::new(2).unwrap();
        let qr = drawn(2, &vec![0xFF; ver.total_codewords()]);
        let data_modules = (0..ver.width() as i32)
            .flat_map(|y| (0..ver.width() as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| matches!(qr.get(x, y), Module::Data(_)))
            .count();
        assert_eq!(data_modules, ver.raw_data_modules());
        let light = (0..ver.width() as i32)
            .flat_map(|y| (0..ver.width() as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| qr.get(x, y) == Module::Data(Color::Light))
            .count();
        assert_eq!(light, ver.raw_data_modules() - ver.total_codewords() * 8);
    }

    #[test]
    #[should_panic(expected = "Codeword count doesn't match")]
    fn test_codewords_overflow() {
        let ver = Version::MIN;
        drawn(1, &vec![0u8; ver.total_codewords() + 1]);
    }

    #[test]
    #[should_panic(expected = "Codeword count doesn't match")]
    fn test_codewords_underflow() {
        let ver = Version::new(5).unwrap();
        drawn(5, &vec![0u8; ver.total_codewords() - 1]);
    }

    #[test]
    fn test_mask_skips_function_modules() {
        let ver = Version::new(7).unwrap();
        let mut qr = drawn(7, &vec![0u8; ver.total_codewords()]);
        let before = qr.clone();
        qr.apply_mask(MaskPattern::new(0).unwrap());
        let w = ver.width() as i32;
        for y in 0..w {
            for x in 0..w {
                let (b, a) = (before.get(x, y), qr.get(x, y));
                if b.is_function() {
                    assert_eq!(a, b);
                } else {
                    assert_eq!(*a == Color::Dark, (x + y) & 1 == 0, "({x}, {y})");
                }
            }
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

// Format info coords, most significant bit first. Negative coords count back
// from the far edge.
static FORMAT_INFO_COORDS_MAIN: [(i32, i32); 15] = [
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (7, 8),
    (8, 8),
    (8, 7),
    (8, 5),
    (8, 4),
    (8, 3),
    (8, 2),
    (8, 1),
    (8, 0),
];

static FORMAT_INFO_COORDS_SIDE: [(i32, i32); 15] = [
    (8, -1),
    (8, -2),
    (8, -3),
    (8, -4),
    (8, -5),
    (8, -6),
    (8, -7),
    (-8, 8),
    (-7, 8),
    (-6, 8),
    (-5, 8),
    (-4, 8),
    (-3, 8),
    (-2, 8),
    (-1, 8),
];
