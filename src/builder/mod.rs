mod qr;

pub(crate) use qr::QR;

#[cfg(test)]
pub(crate) use qr::Module;

use tracing::debug;

use crate::common::{
    codec::{assemble_codewords, boost_ec_level, find_version, Segment},
    ec::add_ecc_and_interleave,
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};
use crate::symbol::QrCode;

// Configures and runs the encoding pipeline: version selection, ec level
// boost, codeword assembly, error correction, placement and masking.
#[derive(Debug, Clone)]
pub struct QRBuilder {
    segments: Vec<Segment>,
    ec_level: ECLevel,
    min_version: Version,
    max_version: Version,
    mask: Option<MaskPattern>,
    boost_ecl: bool,
}

impl QRBuilder {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            ec_level: ECLevel::L,
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: true,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(Segment::make_segments(text))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self::new(vec![Segment::make_bytes(data)])
    }

    pub fn segments(&mut self, segments: Vec<Segment>) -> &mut Self {
        self.segments = segments;
        self
    }

    // Minimum level; boosting may raise it
    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    // Pins the symbol to a single version
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version_range(version, version)
    }

    pub fn version_range(&mut self, min: Version, max: Version) -> &mut Self {
        self.min_version = min;
        self.max_version = max;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn auto_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn boost_ecl(&mut self, boost: bool) -> &mut Self {
        self.boost_ecl = boost;
        self
    }

    pub fn metadata(&self) -> String {
        let mask = self.mask.map_or("Auto".to_string(), |m| m.to_string());
        format!(
            "{{ Versions: {}..={}, Ec level: {:?}, Mask: {mask}, Boost: {} }}",
            self.min_version, self.max_version, self.ec_level, self.boost_ecl
        )
    }
}


impl QRBuilder {
    pub fn build(&self) -> QRResult<QrCode> {
        debug!("Generating QR {}", self.metadata());

        let (min, max) = (self.min_version, self.max_version);
        if min > max {
            return Err(QRError::InvalidVersionRange { min: *min, max: *max });
        }

        // Smallest version that fits, then the strongest level that still fits
        let (version, used_bits) = find_version(&self.segments, self.ec_level, min, max)?;
        let ec_level = if self.boost_ecl {
            boost_ec_level(used_bits, version, self.ec_level)
        } else {
            self.ec_level
        };
        debug!(version = *version, %ec_level, used_bits, "Selected version");

        let data_codewords = assemble_codewords(&self.segments, version, ec_level);
        let codewords = add_ecc_and_interleave(&data_codewords, version, ec_level)?;
        debug!(
            data = data_codewords.len(),
            total = codewords.len(),
            "Constructed payload with ecc & interleaving"
        );

        let mut qr = QR::new(version, ec_level);
        qr.draw_all_function_patterns();
        qr.draw_codewords(&codewords);

        let mask = match self.mask {
            Some(m) => {
                qr.draw_format_info(m);
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };
        debug!(%mask, dark = qr.count_dark_modules(), "QR generated");

        Ok(QrCode::from_builder(qr, mask))
    }
}
