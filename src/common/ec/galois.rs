// GF(256) arithmetic
//------------------------------------------------------------------------------

// Primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
pub const PRIMITIVE_POLY: u16 = 0x11D;

// Generator element of the field
pub const GENERATOR: u8 = 0x02;

// Carry-less (Russian peasant) product of two field elements modulo 0x11D
pub fn mul(x: u8, y: u8) -> u8 {
    let mut z: u16 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * PRIMITIVE_POLY);
        z ^= ((y as u16 >> i) & 1) * x as u16;
    }
    debug_assert!(z >> 8 == 0, "Product overflowed a byte: {z}");
    z as u8
}
