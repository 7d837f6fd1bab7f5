//! Enemy attack patterns and spell/breath resistance.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

const ENEMY_RECORD: usize = 16;
const PATTERN: usize = 3;
const RESIST: usize = 4;

/// Enemies 0..38 are regular; the last two records are the Dragonlord.
const REGULAR_ENEMIES: usize = 38;
/// Axe Knight never gets the Dragonlord's strong breath.
const AXE_KNIGHT: usize = 33;

const DRAGONLORD_1_PATTERN: u8 = 87;
const DRAGONLORD_2_PATTERN: u8 = 14;

/// Rerolls each regular enemy's attack-pattern byte and perturbs its
/// resistance nibble. The low four resistance bits are always forced on;
/// half the time the nibble is then narrowed by enemy tier and a pattern is
/// assigned, otherwise the enemy fights with plain attacks.
pub fn randomize_attack_patterns(enemy_stats: &mut [u8], ultra: bool, rng: &mut StdRng) {
    for i in 0..REGULAR_ENEMIES {
        enemy_stats[i * ENEMY_RECORD + RESIST] |= 0x0f;

        let pattern = if rng.gen_range(0..=1) == 1 {
            let cap = (i as f64 / 5.0).round() as u8;
            let narrowed = rng.gen_range(0..=cap);
            enemy_stats[i * ENEMY_RECORD + RESIST] &= 0xf0 | narrowed;

            if ultra {
                rng.gen_range(0..=255)
            } else if i <= 20 {
                // heal, sleep, stopspell, hurt
                (rng.gen_range(0..=11u8) << 4) | rng.gen_range(0..=3)
            } else if i < 30 {
                // healmore, heal, sleep, stopspell, fire breath, hurtmore
                (rng.gen_range(0..=15u8) << 4) | rng.gen_range(4..=11)
            } else {
                // healmore, sleep, stopspell, both breaths, hurtmore
                let slot2 = if i == AXE_KNIGHT {
                    rng.gen_range(4..=11)
                } else {
                    rng.gen_range(4..=15)
                };
                (*[0u8, 1, 3].as_slice().choose(rng).unwrap() << 6)
                    | (rng.gen_range(0..=3u8) << 4)
                    | slot2
            }
        } else {
            0
        };
        enemy_stats[i * ENEMY_RECORD + PATTERN] = pattern;
    }

    enemy_stats[REGULAR_ENEMIES * ENEMY_RECORD + PATTERN] = DRAGONLORD_1_PATTERN;
    enemy_stats[(REGULAR_ENEMIES + 1) * ENEMY_RECORD + PATTERN] = DRAGONLORD_2_PATTERN;
}
