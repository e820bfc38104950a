/// Fill used when an entity has no usable generation number.
pub const FALLBACK_FILL: &str = "#fef3c7";

/// Fixed 20-colour palette, one entry per generation. Cycles by
/// `(generation - 1) % 20`.
pub const GENERATION_PALETTE: [&str; 20] = [
    "#fde68a", // 1
    "#fcd34d", // 2
    "#fbbf24", // 3
    "#f59e0b", // 4
    "#d97706", // 5
    "#bef264", // 6
    "#86efac", // 7
    "#5eead4", // 8
    "#93c5fd", // 9
    "#c4b5fd", // 10
    "#f9a8d4", // 11
    "#fca5a5", // 12
    "#f87171", // 13
    "#facc15", // 14
    "#34d399", // 15
    "#60a5fa", // 16
    "#a78bfa", // 17
    "#f472b6", // 18
    "#fb923c", // 19
    "#4ade80", // 20
];

pub fn generation_fill(generation: Option<u32>) -> &'static str {
    match generation {
        Some(g) if g >= 1 => GENERATION_PALETTE[(g as usize - 1) % GENERATION_PALETTE.len()],
        _ => FALLBACK_FILL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_indexed_by_generation() {
        for g in 1..=20u32 {
            assert_eq!(
                generation_fill(Some(g)),
                GENERATION_PALETTE[(g as usize - 1) % 20]
            );
        }
        assert_eq!(generation_fill(Some(21)), generation_fill(Some(1)));
        assert_eq!(generation_fill(Some(40)), GENERATION_PALETTE[19]);
    }

    #[test]
    fn missing_or_zero_generation_falls_back() {
        assert_eq!(generation_fill(None), FALLBACK_FILL);
        assert_eq!(generation_fill(Some(0)), FALLBACK_FILL);
    }
}
