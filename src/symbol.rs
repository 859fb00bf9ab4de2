use std::fmt::{Display, Formatter};

use crate::builder::{QRBuilder, QR};
use crate::common::codec::Segment;
use crate::common::error::QRResult;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{Color, ECLevel, Version};

/// An immutable, fully masked QR Code symbol.
///
/// Modules are addressed by `(x, y)` with the origin at the top left corner.
/// Reads outside the symbol return light, so callers can render a quiet zone
/// without bounds checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    version: Version,
    ec_level: ECLevel,
    mask: MaskPattern,
    width: usize,
    modules: Vec<Color>,
}

impl QrCode {
    /// Encodes text in the cheapest single mode at `ecl` or better.
    pub fn encode_text(text: &str, ecl: ECLevel) -> QRResult<Self> {
        Self::encode_segments(Segment::make_segments(text), ecl)
    }

    /// Encodes arbitrary bytes in byte mode at `ecl` or better.
    pub fn encode_binary(data: &[u8], ecl: ECLevel) -> QRResult<Self> {
        Self::encode_segments(vec![Segment::make_bytes(data)], ecl)
    }

    /// Encodes segments over all versions with automatic mask and ec boosting.
    pub fn encode_segments(segs: Vec<Segment>, ecl: ECLevel) -> QRResult<Self> {
        QRBuilder::new(segs).ec_level(ecl).build()
    }

    /// Encodes segments with explicit version bounds, an optional fixed mask
    /// (`None` picks the lowest penalty) and ec boosting on or off.
    pub fn encode_segments_advanced(
        segs: Vec<Segment>,
        ecl: ECLevel,
        min_version: u8,
        max_version: u8,
        mask: Option<u8>,
        boost_ecl: bool,
    ) -> QRResult<Self> {
        let min = Version::new(min_version)?;
        let max = Version::new(max_version)?;
        let mask = mask.map(MaskPattern::new).transpose()?;

        let mut builder = QRBuilder::new(segs);
        builder.ec_level(ecl).version_range(min, max).boost_ecl(boost_ecl);
        if let Some(m) = mask {
            builder.mask(m);
        }
        builder.build()
    }

    pub(crate) fn from_builder(qr: QR, mask: MaskPattern) -> Self {
        let version = qr.version();
        let ec_level = qr.ec_level();
        let width = qr.width();
        Self { version, ec_level, mask, width, modules: qr.into_colors() }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    /// Modules per side, `4 * version + 17`.
    pub fn size(&self) -> usize {
        self.width
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, x: i32, y: i32) -> Color {
        let w = self.width as i32;
        if !(0..w).contains(&x) || !(0..w).contains(&y) {
            return Color::Light;
        }
        self.modules[(y * w + x) as usize]
    }

    /// Whether the module at `(x, y)` is dark; false outside the symbol.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Color::Dark
    }

    pub fn count_dark_modules(&self) -> usize {
        self.modules.iter().filter(|&&c| c == Color::Dark).count()
    }

    /// Text rendering with `quiet_zone` light modules on each side, two chars
    /// per module so the output keeps a square aspect in a terminal.
    pub fn to_str(&self, quiet_zone: usize) -> String {
        let qz = quiet_zone as i32;
        let w = self.width as i32;
        let mut res = String::with_capacity(((w + 2 * qz) * (2 * (w + 2 * qz) + 1)) as usize);
        for y in -qz..w + qz {
            for x in -qz..w + qz {
                res.push_str(if self.get_module(x, y) { "██" } else { "  " });
            }
            res.push('\n');
        }
        res
    }
}

impl Display for QrCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.width as i32 {
            for x in 0..self.width as i32 {
                write!(f, "{}", if self.get_module(x, y) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
