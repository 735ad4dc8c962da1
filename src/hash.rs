//! FNV-1a 32-bit folding used for catalog digests, module digests and stable reference hashes.
//! Every append is byte-oriented so results never depend on platform endianness.

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Scale applied before rounding numeric values into the hash.
pub const QUANTIZE_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fnv1a {
    state: u32,
}

impl Default for Fnv1a {
    fn default() -> Self {
        Self::new()
    }
}

impl Fnv1a {
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    #[inline]
    pub fn append_byte(&mut self, byte: u8) {
        self.state = (self.state ^ u32::from(byte)).wrapping_mul(FNV_PRIME);
    }

    /// Appends the UTF-8 bytes of `value` followed by a zero terminator, so
    /// `("ab", "c")` and `("a", "bc")` fold differently.
    pub fn append_str(&mut self, value: &str) {
        for byte in value.bytes() {
            self.append_byte(byte);
        }
        self.append_byte(0);
    }

    /// Appends the four little-endian bytes of `value`.
    pub fn append_i32(&mut self, value: i32) {
        for byte in value.to_le_bytes() {
            self.append_byte(byte);
        }
    }

    pub fn append_u32(&mut self, value: u32) {
        self.append_i32(value as i32);
    }

    /// Appends `round(value * 1000)`; jitter below 0.001 never changes the hash.
    pub fn append_quantized(&mut self, value: f64) {
        self.append_i32(quantize(value));
    }

    pub fn finish(&self) -> u32 {
        self.state
    }
}

/// Quantizes a value to thousandths. Non-finite values saturate (NaN maps to 0).
pub fn quantize(value: f64) -> i32 {
    (value * QUANTIZE_SCALE).round() as i32
}

/// Hash of a single string (bytes + terminator) from a fresh state.
pub fn stable_str_hash(value: &str) -> u32 {
    let mut hash = Fnv1a::new();
    hash.append_str(value);
    hash.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_is_offset_basis() {
        assert_eq!(Fnv1a::new().finish(), FNV_OFFSET_BASIS);
    }

    #[test]
    fn terminator_separates_adjacent_strings() {
        let mut a = Fnv1a::new();
        a.append_str("ab");
        a.append_str("c");
        let mut b = Fnv1a::new();
        b.append_str("a");
        b.append_str("bc");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn quantize_ignores_sub_thousandth_jitter() {
        assert_eq!(quantize(57.5), quantize(57.500_000_1));
        assert_ne!(quantize(57.5), quantize(57.501));
        assert_eq!(quantize(-0.0004), 0);
    }

    #[test]
    fn stable_str_hash_matches_manual_fold() {
        let mut manual = Fnv1a::new();
        for byte in b"baseline" {
            manual.append_byte(*byte);
        }
        manual.append_byte(0);
        assert_eq!(stable_str_hash("baseline"), manual.finish());
    }
}
