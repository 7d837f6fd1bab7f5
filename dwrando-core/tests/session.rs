//! End-to-end session tests over a synthetic ROM image.
//!
//! The image is not a real cartridge dump; it carries just enough structure
//! for every pass to run: a decodable all-grass overworld, a plausible chest
//! table, player stat rows and a vanilla spell schedule.

use dwrando_core::map::VanillaMap;
use dwrando_core::patch::PatchLedger;
use dwrando_core::regions::RegionId;
use dwrando_core::rom::EXPECTED_LEN;
use dwrando_core::shops::{parse_inventory, SHOP_COUNT};
use dwrando_core::{Leveling, RandomizerSettings, RomImage, Session, Tier};

const XP_THRESHOLDS: [u16; 30] = [
    0, 7, 23, 47, 110, 220, 450, 800, 1300, 2000, 2900, 4000, 5500, 7500, 10000, 13000, 16000,
    19000, 22000, 26000, 30000, 34000, 38000, 42000, 46000, 50000, 54000, 58000, 62000, 65535,
];

const SPELL_LEVELS: [u8; 10] = [3, 4, 7, 9, 10, 12, 13, 15, 17, 19];

const CHEST_CONTENTS: [u8; 31] = [
    6, 3, 4, 2, 18, 13, 3, 7, 21, 19, 0x0d, 15, 16, 2, 6, 20, 1, 5, 3, 2, 7, 1, 6, 0x17, 2,
    18, 5, 7, 1, 2, 6,
];

/// Builds an image VanillaMap can decode and every pass can work on.
fn synthetic_rom() -> Vec<u8> {
    let mut data = vec![0u8; EXPECTED_LEN];

    // All 120 overworld row pointers target the same run-length data: eight
    // full-length grass runs. CPU address 0x9d5d maps to file offset 0x1d6d.
    let pointers = RegionId::OverworldPointers.region();
    for row in 0..120 {
        let p = pointers.offset + row * 2;
        data[p..p + 2].copy_from_slice(&0x9d5du16.to_le_bytes());
    }
    let map_data = RegionId::OverworldData.region().offset;
    data[map_data..map_data + 8].fill(0x0f);

    let chests = RegionId::Chests.region();
    for (i, &c) in CHEST_CONTENTS.iter().enumerate() {
        data[chests.offset + i * 4 + 3] = c;
    }

    let stats = RegionId::PlayerStats.region();
    for i in 0..30 {
        let row = stats.offset + i * 6;
        data[row] = (4 + i * 4) as u8;
        data[row + 1] = (4 + i * 3) as u8;
        data[row + 2] = (15 + i * 6) as u8;
        data[row + 3] = (i * 5) as u8;
    }

    let spells = RegionId::SpellLevels.region();
    for (i, &level) in SPELL_LEVELS.iter().enumerate() {
        data[spells.offset + i * spells.stride] = level;
    }

    let xp = RegionId::XpRequirements.region();
    for (i, &threshold) in XP_THRESHOLDS.iter().enumerate() {
        data[xp.offset + i * 2..xp.offset + i * 2 + 2].copy_from_slice(&threshold.to_le_bytes());
    }

    // Searchable item triples: placed on the map at their stock coordinates.
    for (id, loc) in [
        (RegionId::TokenLocation, [1, 83, 113]),
        (RegionId::FluteLocation, [1, 104, 10]),
        (RegionId::ArmorLocation, [1, 81, 1]),
    ] {
        let r = id.region();
        for (i, &b) in loc.iter().enumerate() {
            data[r.offset + i * r.stride] = b;
        }
    }

    data
}

fn settings(seed: u64) -> RandomizerSettings {
    RandomizerSettings {
        seed,
        chests: true,
        search_items: true,
        zones: Tier::Normal,
        patterns: Tier::Normal,
        growth: Tier::Normal,
        spells: Tier::Normal,
        shops: true,
        leveling: Leveling::Fast,
        generate_map: false,
        speed_hacks: true,
        force: true,
        write_ips: false,
        input_path: "unused.nes".into(),
        output_dir: ".".into(),
    }
}

/// Runs one full session and returns the finished image plus the ledger.
fn run_session(seed: u64) -> (Vec<u8>, PatchLedger) {
    let rom = RomImage::new(synthetic_rom()).unwrap();
    let mut map = VanillaMap::from_rom(&rom).unwrap();
    let mut session = Session::new(rom, settings(seed));
    session.randomize(&mut map).unwrap();
    session.commit(&mut map).unwrap();
    assert_eq!(session.flags(), "HICzpWgfm");
    let ledger = session.ledger().clone();
    (session.into_rom().into_bytes(), ledger)
}

fn extract(image: &[u8], id: RegionId) -> Vec<u8> {
    id.region().extract(image)
}

#[test]
fn identical_seeds_produce_identical_images() {
    let (a, ledger_a) = run_session(12345);
    let (b, ledger_b) = run_session(12345);
    assert_eq!(a, b);
    assert_eq!(ledger_a.encode(), ledger_b.encode());

    let (c, _) = run_session(54321);
    assert_ne!(a, c);
}

#[test]
fn output_image_keeps_its_size() {
    let (image, _) = run_session(7);
    assert_eq!(image.len(), EXPECTED_LEN);
}

#[test]
fn chest_invariants_hold_in_the_finished_image() {
    for seed in [1, 2, 3, 99, 12345] {
        let (image, _) = run_session(seed);
        let chests = extract(&image, RegionId::Chests);
        let contents: Vec<u8> = (0..31).map(|i| chests[i * 4 + 3]).collect();

        for i in [11, 12, 13, 14, 15, 16, 24] {
            assert!(
                ![10, 13, 15, 16].contains(&contents[i]),
                "seed {seed}: quest item in Charlock chest {i}"
            );
        }
        assert!(
            [4, 5, 6].iter().any(|&i| contents[i] == 3),
            "seed {seed}: no key in the throne room"
        );
        assert!(!contents.contains(&0x0d), "seed {seed}: harp survived");
        assert!(!contents.iter().any(|&c| (18..=20).contains(&c)), "seed {seed}");
    }
}

#[test]
fn shop_table_is_well_formed() {
    let (image, _) = run_session(7);
    let inventory = extract(&image, RegionId::ShopInventory);
    let shops = parse_inventory(&inventory);
    assert_eq!(shops.len(), SHOP_COUNT);
    let mut six = 0;
    for shop in &shops {
        match shop.len() {
            5 => {}
            6 => six += 1,
            n => panic!("shop with {n} items"),
        }
        for w in shop.windows(2) {
            assert!(w[0] < w[1], "shop not strictly ascending: {shop:?}");
        }
    }
    assert_eq!(six, 1);
}

#[test]
fn spell_masks_match_the_final_schedule() {
    let (image, _) = run_session(3);
    let levels = extract(&image, RegionId::SpellLevels);
    let stats = extract(&image, RegionId::PlayerStats);

    for l in 1..=30usize {
        let row = (l - 1) * 6;
        let mask = ((stats[row + 4] as u16) << 8) | stats[row + 5] as u16;
        for (j, &learned_at) in levels.iter().enumerate() {
            let expected = learned_at as usize <= l;
            assert_eq!(mask & (1 << j) != 0, expected, "level {l} spell {j}");
        }
        if mask != 0 {
            assert!(stats[row + 3] >= 6, "level {l}: MP below the casting floor");
        }
    }
}

#[test]
fn stat_growth_stays_monotone() {
    let (image, _) = run_session(11);
    let stats = extract(&image, RegionId::PlayerStats);
    for col in 0..4 {
        let column: Vec<u8> = (0..30).map(|i| stats[i * 6 + col]).collect();
        for w in column.windows(2) {
            assert!(w[0] <= w[1], "column {col} not monotone: {column:?}");
        }
    }
}

#[test]
fn fast_leveling_scales_xp_to_three_quarters() {
    let (image, _) = run_session(8);
    let xp = extract(&image, RegionId::XpRequirements);
    for (i, &orig) in XP_THRESHOLDS.iter().enumerate() {
        let scaled = u16::from_le_bytes([xp[i * 2], xp[i * 2 + 1]]);
        let expected = (orig as f64 * 0.75).round() as u16;
        assert_eq!(scaled, expected, "level {i}");
    }
}

#[test]
fn repel_lands_on_level_eight_give_or_take_the_reroll() {
    let (image, _) = run_session(21);
    let levels = extract(&image, RegionId::SpellLevels);
    // Pinned to 8 before the normal-tier reroll perturbs it by at most 2.
    assert!((6..=10).contains(&levels[7]), "repel at level {}", levels[7]);
}

#[test]
fn ips_replay_reproduces_the_finished_image() {
    let baseline = synthetic_rom();
    let (image, ledger) = run_session(12345);

    let decoded = PatchLedger::decode(&ledger.encode()).unwrap();
    let mut replayed = baseline;
    decoded.apply(&mut replayed);
    assert_eq!(replayed, image);
}

#[test]
fn title_screen_region_is_rewritten() {
    let baseline = synthetic_rom();
    let (image, _) = run_session(5);
    let region = RegionId::TitleText.region();
    assert_ne!(
        &image[region.offset..region.end()],
        &baseline[region.offset..region.end()]
    );
}
