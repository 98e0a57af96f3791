/// Reads the first little-endian u64 out of a revealed randomness value.
/// Switchboard delivers 32 bytes; one 64-bit word is consumed per draw.
pub fn first_random_word(value: &[u8]) -> u64 {
    u64::from_le_bytes(
        value[0..8]
            .try_into()
            .expect("slice with incorrect length"),
    )
}
