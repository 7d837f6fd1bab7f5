//! Remake-balance tables and leveling speed.
//!
//! Mostly deterministic overwrites: enemy HP, XP and gold drops and spell
//! MP costs are set to the remake's values. The only random element is a
//! small reduction to the Dragonlord's second-form HP.

use rand::rngs::StdRng;
use rand::Rng;

const ENEMY_RECORD: usize = 16;
const HP: usize = 2;
const XP: usize = 6;
const GOLD: usize = 7;

const REMAKE_XP: [u8; 40] = [
    1, 2, 3, 4, 8, 12, 16, 14, 15, 18, 20, 25, 28, 31, 40, 42, 255, 47, 52, 58, 58, 64, 70,
    72, 255, 6, 78, 83, 90, 95, 135, 105, 120, 130, 180, 155, 172, 255, 0, 0,
];
// These are +1 for proper values in the ROM.
const REMAKE_GOLD: [u8; 40] = [
    2, 4, 6, 8, 16, 20, 25, 21, 19, 30, 25, 42, 50, 48, 60, 62, 6, 75, 80, 95, 110, 105, 110,
    120, 10, 255, 150, 135, 148, 155, 160, 169, 185, 165, 150, 148, 152, 143, 0, 0,
];
// Dragonlord's remake HP would be 204 and 350; these keep him beatable
// around level 18.
const REMAKE_HP: [u8; 40] = [
    2, 3, 5, 7, 12, 13, 13, 22, 26, 35, 16, 24, 28, 18, 33, 39, 3, 48, 37, 35, 44, 37, 40, 40,
    153, 110, 47, 48, 38, 70, 72, 74, 65, 67, 98, 135, 99, 106, 100, 165,
];
/// Remake MP cost per spell.
const REMAKE_MP: [u8; 10] = [3, 2, 2, 2, 2, 6, 8, 2, 8, 5];

/// Overwrites the XP, gold and HP columns of the enemy table and the spell
/// MP costs with the remake values; the final boss's second form loses
/// 0-15 HP.
pub fn apply_remake_balance(enemy_stats: &mut [u8], mp_reqs: &mut [u8], rng: &mut StdRng) {
    for i in 0..REMAKE_XP.len() {
        enemy_stats[i * ENEMY_RECORD + XP] = REMAKE_XP[i];
        enemy_stats[i * ENEMY_RECORD + GOLD] = REMAKE_GOLD[i];
    }

    let mut hp = REMAKE_HP;
    let last = hp.len() - 1;
    hp[last] -= rng.gen_range(0..=15);
    for (i, &v) in hp.iter().enumerate() {
        enemy_stats[i * ENEMY_RECORD + HP] = v;
    }

    mp_reqs.copy_from_slice(&REMAKE_MP);
}

/// Scales the 30 little-endian u16 XP-per-level thresholds.
pub fn scale_xp_requirements(xp_reqs: &mut [u8], factor: f64) {
    for pair in xp_reqs.chunks_exact_mut(2) {
        let xp = u16::from_le_bytes([pair[0], pair[1]]);
        let scaled = (xp as f64 * factor).round().clamp(0.0, u16::MAX as f64) as u16;
        pair.copy_from_slice(&scaled.to_le_bytes());
    }
}
