//! # qrweave
//!
//! A Rust library for generating QR Code Model 2 symbols with Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **All Versions**: Versions 1-40, with sizes from 21x21 to 177x177 modules
//! - **Segment Modes**: Numeric, alphanumeric, byte, kanji and ECI segments
//! - **Automatic Sizing**: Picks the smallest version that fits the data
//! - **Error Correction Boosting**: Raises the error correction level when it fits for free
//! - **Automatic Masking**: Scores all 8 mask patterns and applies the one with the lowest penalty
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrweave::{ECLevel, QrCode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QrCode::encode_text("Hello, World!", ECLevel::L)?;
//!
//! // Module grid with a 4 module quiet zone
//! println!("{}", qr.to_str(4));
//! assert!(qr.get_module(0, 0));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrweave::{ECLevel, MaskPattern, QRBuilder, Segment, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let segs = vec![Segment::make_eci(26)?, Segment::make_bytes("Hello, 世界".as_bytes())];
//! let qr = QRBuilder::new(segs)
//!     .version_range(Version::new(2)?, Version::new(10)?) // Version bounds - defaults to 1..=40
//!     .ec_level(ECLevel::M)       // Minimum error correction level - defaults to ECLevel::L
//!     .mask(MaskPattern::new(3)?) // Mask pattern - if not provided, finds best mask based on penalty score
//!     .boost_ecl(false)           // Keep the level as given - defaults to true
//!     .build()?;
//!
//! assert_eq!(*qr.version(), 2);
//! assert_eq!(*qr.mask(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ## Logging
//!
//! The encoding pipeline emits `tracing` events: version selection and payload sizes at `debug`,
//! per block and per mask details at `trace`. Install any `tracing` subscriber to see them.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod symbol;

pub use builder::QRBuilder;
pub use common::bit_utils::BitBuffer;
pub use common::codec::{Mode, Segment};
pub use common::ec::RsGenerator;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
pub use symbol::QrCode;
