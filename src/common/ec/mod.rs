mod block;
mod galois;

pub(crate) use block::*;

use super::error::{QRError, QRResult};
use galois::{mul, GENERATOR};

// Reed-Solomon generator
//------------------------------------------------------------------------------

// Divisor polynomial (x - g^0)(x - g^1)...(x - g^(d-1)) of a given degree. The
// leading coefficient is always 1 and is not stored; the rest are kept from
// highest to lowest power.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsGenerator {
    coeffs: Vec<u8>,
}

impl RsGenerator {
    pub fn new(degree: usize) -> QRResult<Self> {
        if !(1..=255).contains(&degree) {
            return Err(QRError::InvalidEcDegree(degree));
        }

        // Start with the monomial x^0
        let mut coeffs = vec![0u8; degree];
        coeffs[degree - 1] = 1;

        // Multiply the running product by (x - g^i) for each root
        let mut root = 1u8;
        for _ in 0..degree {
            for j in 0..degree {
                coeffs[j] = mul(coeffs[j], root);
                if j + 1 < degree {
                    coeffs[j] ^= coeffs[j + 1];
                }
            }
            root = mul(root, GENERATOR);
        }

        Ok(Self { coeffs })
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len()
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coeffs
    }

    // Polynomial long division of the block by the generator. Returns exactly
    // `degree` ecc codewords.
    pub fn remainder(&self, block: &[u8]) -> Vec<u8> {
        let deg = self.degree();
        let mut res = vec![0u8; deg];
        for &b in block {
            let factor = b ^ res[0];
            res.copy_within(1.., 0);
            res[deg - 1] = 0;
            if factor == 0 {
                continue;
            }
            for (r, &c) in res.iter_mut().zip(self.coeffs.iter()) {
                *r ^= mul(c, factor);
            }
        }
        res
    }
}
