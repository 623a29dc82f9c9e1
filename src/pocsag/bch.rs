//! BCH(31,21) codeword arithmetic for POCSAG.
//!
//! Every transmitted codeword carries 21 data bits, 10 BCH check bits and a
//! trailing even-parity bit. The code corrects up to 2 bit errors on the
//! receiving side; here we only ever generate valid codewords.

/// Generator polynomial for BCH(31,21,2):
/// x^10 + x^9 + x^8 + x^6 + x^5 + x^3 + 1.
const GENERATOR: u32 = 0b111_0110_1001; // 0x769

/// Compute the 10 check bits for a 21-bit data field.
pub fn checkbits(data: u32) -> u32 {
    debug_assert!(data <= 0x1F_FFFF);
    let mut reg = data << 10;
    for i in (10..31).rev() {
        if reg & (1 << i) != 0 {
            reg ^= GENERATOR << (i - 10);
        }
    }
    reg & 0x3FF
}

/// Build the full 32-bit codeword: data, check bits, even parity.
pub fn seal(data: u32) -> u32 {
    let word31 = (data << 10) | checkbits(data);
    (word31 << 1) | (word31.count_ones() & 1)
}

/// Remainder of the polynomial division over a received codeword; zero for
/// every word `seal` produces.
pub fn syndrome(codeword: u32) -> u32 {
    let mut reg = codeword >> 1; // drop the parity bit
    for i in (10..31).rev() {
        if reg & (1 << i) != 0 {
            reg ^= GENERATOR << (i - 10);
        }
    }
    reg & 0x3FF
}
