pub const KIB: u64 = 1024;
pub const MIB: u64 = KIB * 1024;

/// Formats a byte count using binary (IEC) prefixes, e.g. `2.00Mi`.
///
/// Values below 1 KiB render as a plain integer with a `B` suffix. The prefix is chosen after
/// rounding to two decimals, so the number shown always stays below 1024.
pub fn format_bytes_iec(b: u64) -> String {
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if b < KIB {
        return format!("{b}B");
    }

    let scaled = u128::from(b) * 100;
    let mut div = u128::from(KIB);
    let mut exp = 0usize;
    let mut hundredths = (scaled + div / 2) / div;
    while hundredths >= 1024 * 100 && exp + 1 < PREFIXES.len() {
        div *= u128::from(KIB);
        exp += 1;
        hundredths = (scaled + div / 2) / div;
    }

    format!(
        "{}.{:02}{}i",
        hundredths / 100,
        hundredths % 100,
        PREFIXES[exp]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_are_plain_bytes() {
        assert_eq!(format_bytes_iec(0), "0B");
        assert_eq!(format_bytes_iec(1), "1B");
        assert_eq!(format_bytes_iec(1023), "1023B");
    }

    #[test]
    fn scales_to_binary_prefixes() {
        assert_eq!(format_bytes_iec(1024), "1.00Ki");
        assert_eq!(format_bytes_iec(1536), "1.50Ki");
        assert_eq!(format_bytes_iec(2_097_152), "2.00Mi");
        assert_eq!(format_bytes_iec(3_221_225_472), "3.00Gi");
        assert_eq!(format_bytes_iec(5 * (1u64 << 40)), "5.00Ti");
        assert_eq!(format_bytes_iec(1u64 << 50), "1.00Pi");
        assert_eq!(format_bytes_iec(u64::MAX), "16.00Ei");
    }

    #[test]
    fn rounding_up_moves_to_the_next_prefix() {
        assert_eq!(format_bytes_iec(MIB - 1), "1.00Mi");
        assert_eq!(format_bytes_iec((1u64 << 30) - 1), "1.00Gi");
        assert_eq!(format_bytes_iec((1u64 << 40) - 1), "1.00Ti");
        assert_eq!(format_bytes_iec(1_048_566), "1023.99Ki");
    }

    #[test]
    fn scaled_magnitude_fits_prefix() {
        for b in [
            KIB,
            1000 * KIB,
            MIB - 1,
            MIB,
            7 * MIB + 3,
            1023 * MIB,
            (1u64 << 30) - 1,
            (1u64 << 40) - 1,
            1u64 << 45,
            u64::MAX,
        ] {
            let s = format_bytes_iec(b);
            let suffix_at = s.len() - 2;
            let (num, suffix) = s.split_at(suffix_at);
            assert!(
                ["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"].contains(&suffix),
                "unexpected suffix in {s}"
            );
            let value: f64 = num
                .parse()
                .unwrap_or_else(|e| panic!("invalid number in {s}: {e}"));
            assert!((1.0..1024.0).contains(&value), "{s} out of range");
        }
    }
}
