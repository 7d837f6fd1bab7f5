//! Player stat growth.
//!
//! Monotonicity is restored by sorting each column after the reroll, not by
//! construction.

use rand::rngs::StdRng;
use rand::Rng;

const ROW: usize = 6;
const LEVELS: usize = 30;

/// Column offsets within a player-stats row.
const STR: usize = 0;
const AGI: usize = 1;
const HP: usize = 2;
const MP: usize = 3;

/// Ultra-tier curve parameters per stat, tuned so the Dragonlord stays
/// beatable around level 15: (min, max, power).
const ULTRA_CURVES: [(usize, f64, f64, f64); 4] = [
    (STR, 4.0, 155.0, 1.18),
    (AGI, 4.0, 145.0, 1.32),
    (HP, 10.0, 230.0, 0.98),
    (MP, 0.0, 220.0, 0.95),
];

pub fn randomize_growth(player_stats: &mut [u8], ultra: bool, rng: &mut StdRng) {
    if ultra {
        for (col, min, max, power) in ULTRA_CURVES {
            let points = inverted_power_curve(min, max, power, LEVELS, rng);
            write_column(player_stats, col, &points);
        }
    } else {
        for col in [STR, AGI, HP, MP] {
            let mut points = read_column(player_stats, col);
            for p in points.iter_mut() {
                let jittered = (*p as f64 * rng.gen_range(0.8..1.2)).round();
                *p = jittered.clamp(0.0, 255.0) as u8;
            }
            points.sort_unstable();
            write_column(player_stats, col, &points);
        }
    }
}

fn read_column(stats: &[u8], col: usize) -> Vec<u8> {
    (0..LEVELS).map(|i| stats[i * ROW + col]).collect()
}

fn write_column(stats: &mut [u8], col: usize, points: &[u8]) {
    for (i, &p) in points.iter().enumerate() {
        stats[i * ROW + col] = p;
    }
}

/// Draws `count` points skewed toward `max`:
/// `round(max - (u * (max-min)^(1/power))^power)` with u uniform in [0,1).
/// The result is sorted ascending.
pub fn inverted_power_curve(
    min: f64,
    max: f64,
    power: f64,
    count: usize,
    rng: &mut StdRng,
) -> Vec<u8> {
    let p_range = (max - min).powf(1.0 / power);
    let mut points: Vec<u8> = (0..count)
        .map(|_| {
            let u: f64 = rng.gen();
            (max - (u * p_range).powf(power)).round().clamp(0.0, 255.0) as u8
        })
        .collect();
    points.sort_unstable();
    points
}
