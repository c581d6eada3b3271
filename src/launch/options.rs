//! Options bitmask passed to the game client with `-o`
//!
//! The bit table is part of the client's command line grammar. Renumbering
//! an entry silently toggles a different feature in the client.

use std::collections::HashMap;

use crate::config::Settings;
use crate::config::settings::keys;

/// (setting key, bit index). Bit 15 is reserved by the client.
pub const OPTION_BITS: &[(&str, u32)] = &[
    (keys::DARK_GUI, 0),
    (keys::CONTEXT_MENU, 1),
    (keys::KEYBINDINGS, 2),
    (keys::SMALLER_BOTTOM_WINDOW, 3),
    (keys::SMALLER_TOP_WINDOW, 4),
    (keys::BIG_HEALTH_BAR, 5),
    (keys::SOUND, 6),
    (keys::LARGE_FONT, 7),
    (keys::TRUE_FULLSCREEN, 8),
    (keys::LEGACY_MOUSE_WHEEL, 9),
    (keys::INVENTORY_OPTIMIZATION, 10),
    (keys::ANIMATION_OPTIMIZATION, 11),
    (keys::APPDATA_USAGE, 12),
    (keys::MINIMAP_MANAGEMENT, 13),
    (keys::GAMMA_INCREASE, 14),
    (keys::SLIDING_TOP_BAR_SENSITIVITY, 16),
    (keys::LIGHTING_EFFECTS_REDUCTION, 17),
    (keys::MINIMAP, 18),
];

/// Pack named flags into the options integer. Missing names count as off.
pub fn encode(flags: &HashMap<&str, bool>) -> u32 {
    OPTION_BITS
        .iter()
        .filter(|(name, _)| flags.get(name).copied().unwrap_or(false))
        .fold(0, |acc, (_, bit)| acc | (1u32 << *bit))
}

/// Current value of every flag in the bit table
pub fn option_flags(settings: &Settings) -> HashMap<&'static str, bool> {
    OPTION_BITS
        .iter()
        .map(|(name, _)| (*name, settings.flag(name)))
        .collect()
}

pub fn encode_settings(settings: &Settings) -> u32 {
    encode(&option_flags(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingValue;

    const TABLE_MASK: u32 = 0b111_0111_1111_1111_1111;

    #[test]
    fn test_all_off_is_zero() {
        assert_eq!(encode(&HashMap::new()), 0);
        assert_eq!(encode_settings(&Settings::default()), 0);
    }

    #[test]
    fn test_single_flags() {
        assert_eq!(encode(&HashMap::from([(keys::DARK_GUI, true)])), 1);
        assert_eq!(encode(&HashMap::from([(keys::SOUND, true)])), 64);
        assert_eq!(encode(&HashMap::from([(keys::TRUE_FULLSCREEN, true)])), 256);
        assert_eq!(encode(&HashMap::from([(keys::MINIMAP, true)])), 1 << 18);
    }

    #[test]
    fn test_unknown_and_unmapped_names_ignored() {
        let flags = HashMap::from([
            ("enable_warp_drive", true),
            (keys::GAMMA_INCREASE_MORE, true),
            (keys::WINDOWED_FULLSCREEN, true),
        ]);
        assert_eq!(encode(&flags), 0);
    }

    #[test]
    fn test_bits_recover_every_assignment() {
        // Walk a spread of assignments: each table entry on alone, plus
        // alternating and complementary patterns
        let mut patterns: Vec<Vec<bool>> = (0..OPTION_BITS.len())
            .map(|i| (0..OPTION_BITS.len()).map(|j| i == j).collect())
            .collect();
        patterns.push((0..OPTION_BITS.len()).map(|j| j % 2 == 0).collect());
        patterns.push((0..OPTION_BITS.len()).map(|j| j % 2 == 1).collect());
        patterns.push(vec![true; OPTION_BITS.len()]);

        for pattern in patterns {
            let flags: HashMap<&str, bool> = OPTION_BITS
                .iter()
                .zip(&pattern)
                .map(|((name, _), on)| (*name, *on))
                .collect();
            let value = encode(&flags);

            for ((_, bit), on) in OPTION_BITS.iter().zip(&pattern) {
                assert_eq!(value & (1u32 << *bit) != 0, *on, "bit {bit}");
            }
            assert_eq!(value & !TABLE_MASK, 0, "stray bits in {value:#b}");
        }
    }

    #[test]
    fn test_reserved_bit_never_set() {
        let all: HashMap<&str, bool> = OPTION_BITS.iter().map(|(name, _)| (*name, true)).collect();
        let value = encode(&all);
        assert_eq!(value & (1 << 15), 0);
        assert_eq!(value, TABLE_MASK);
    }

    #[test]
    fn test_encode_from_settings() {
        let mut settings = Settings::default();
        settings.set(keys::SOUND, SettingValue::Flag(true)).unwrap();
        settings.set(keys::DARK_GUI, SettingValue::Flag(true)).unwrap();
        settings.set(keys::WINDOWED_FULLSCREEN, SettingValue::Flag(true)).unwrap();
        assert_eq!(encode_settings(&settings), 64 | 1);
    }
}
