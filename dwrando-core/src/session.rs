//! One randomization session: owns the random stream, the ROM buffer, the
//! patch ledger and every extracted working copy.
//!
//! Pass order is part of the public contract. Every pass draws from the one
//! shared stream, so reordering passes changes the output for a given seed;
//! the sequence below must stay exactly as documented.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::map::MapGenerator;
use crate::patch::PatchLedger;
use crate::regions::RegionId;
use crate::rom::RomImage;
use crate::{
    chests, dialogue, economy, growth, patterns, search, shops, spells, text, zones,
    Leveling, RandomizerError, RandomizerSettings, Result, Tier, VERSION,
};

/// How many fresh layouts to ask the map generator for before giving up.
const MAP_RETRY_LIMIT: usize = 50;

/// Charlock's map id and the throne room tile encounter 3 is pinned to on
/// generated maps.
const CHARLOCK_ENCOUNTER_LOC: [u8; 3] = [6, 25, 22];

pub struct Session {
    settings: RandomizerSettings,
    rng: StdRng,
    rom: RomImage,
    ledger: PatchLedger,

    // Working copies, extracted once at session start and written back into
    // the ledger at commit. Exactly one pass owns each, except the spell
    // mask rebuild which explicitly shares the player-stats columns.
    enemy_stats: Vec<u8>,
    mp_reqs: Vec<u8>,
    xp_reqs: Vec<u8>,
    zones: Vec<u8>,
    zone_layout: Vec<u8>,
    shop_inventory: Vec<u8>,
    token_loc: Vec<u8>,
    flute_loc: Vec<u8>,
    armor_loc: Vec<u8>,
    encounter_locs: [Vec<u8>; 3],
    encounter_enemies: Vec<u8>,
    encounter_2_kill: Vec<u8>,
    encounter_3_kill: Vec<u8>,
    player_stats: Vec<u8>,
    spell_levels: Vec<u8>,
    chests: Vec<u8>,
    title_text: Vec<u8>,

    flags: String,
}

impl Session {
    pub fn new(rom: RomImage, settings: RandomizerSettings) -> Self {
        let rng = StdRng::seed_from_u64(settings.seed);
        let mut session = Session {
            rng,
            ledger: PatchLedger::new(),
            enemy_stats: rom.extract(RegionId::EnemyStats),
            mp_reqs: rom.extract(RegionId::MpRequirements),
            xp_reqs: rom.extract(RegionId::XpRequirements),
            zones: rom.extract(RegionId::Zones),
            zone_layout: rom.extract(RegionId::ZoneLayout),
            shop_inventory: rom.extract(RegionId::ShopInventory),
            token_loc: rom.extract(RegionId::TokenLocation),
            flute_loc: rom.extract(RegionId::FluteLocation),
            armor_loc: rom.extract(RegionId::ArmorLocation),
            encounter_locs: [
                rom.extract(RegionId::Encounter1Location),
                rom.extract(RegionId::Encounter2Location),
                rom.extract(RegionId::Encounter3Location),
            ],
            encounter_enemies: rom.extract(RegionId::EncounterEnemies),
            encounter_2_kill: rom.extract(RegionId::Encounter2Kill),
            encounter_3_kill: rom.extract(RegionId::Encounter3Kill),
            player_stats: rom.extract(RegionId::PlayerStats),
            spell_levels: rom.extract(RegionId::SpellLevels),
            chests: rom.extract(RegionId::Chests),
            title_text: rom.extract(RegionId::TitleText),
            rom,
            settings,
            flags: String::new(),
        };
        session.add_baseline_patches();
        session
    }

    /// Fixed quality-of-life patches applied to every seed.
    fn add_baseline_patches(&mut self) {
        // Make the fighter's ring actually grant its attack bonus.
        self.ledger.add(0xf10c, [0x20, 0x54, 0xff, 0xea]);
        self.ledger.add(
            0xff64,
            [
                0x85, 0xcd, 0xa5, 0xcf, 0x29, 0x20, 0xf0, 0x07, 0xa5, 0xcc, 0x18, 0x69, 0x02,
                0x85, 0xcc, 0xa5, 0xcf, 0x60,
            ],
        );
        // New stairs in the throne room and on the first floor, plus an
        // extra first-floor exit.
        self.ledger.add(0x43a, [0x47]);
        self.ledger.add(0x2b9, [0x45]);
        self.ledger.add(0x2d7, [0x66]);
        // Replace the useless grave warps with warps to Tantegel.
        self.ledger.add(0xf45f, [5, 1, 8]);
        self.ledger.add(0xf4f8, [4, 1, 7]);
        self.ledger.add(0x1298, [0x22]);
        // Buff the heal spell.
        self.ledger.add(0xdbce, [15]);
        // Open a path around the northern shrine guardian.
        self.ledger.add(0xd77, [0x66]);
        self.ledger.add(0xd81, [0x66]);
        // Bring zone 0's encounter rate in line with the other zones.
        self.ledger.add(0xea51, [0xad, 0x07, 0x01, 0xea, 0xea]);
        self.ledger.add_fill(0xced1, 13, 0xea);
    }

    /// Text/encounter/music speed-up patch set.
    fn add_speed_hacks(&mut self) {
        self.ledger.add(0x7a43, [0xea, 0xea, 0xea]);
        self.ledger.add(0xe41a, [0xea, 0xea, 0xea]);
        self.ledger.add(0xe44d, [0xea, 0xea, 0xea]);
        self.ledger.add(0xc53f, [0xea, 0xea, 0xea]);
        self.ledger.add(0xef49, [2]);
        self.ledger.add(0xed45, [3]);
        for (addr, v) in [
            (0x4d38, 0x1),
            (0x4d3c, 0x6),
            (0x4d4b, 0x7),
            (0x4d4d, 0x8),
            (0x4d4f, 0x8),
            (0x4d51, 0x8),
            (0x4d53, 0x2),
            (0x4d55, 0x2),
            (0x4d57, 0x10),
            (0x463b, 0xff),
            (0x4724, 1),
            (0x472a, 1),
            (0x472c, 1),
            (0x472e, 1),
        ] {
            self.ledger.add(addr, [v]);
        }
    }

    /// Runs every enabled pass in the documented order.
    pub fn randomize(&mut self, map: &mut dyn MapGenerator) -> Result<()> {
        if self.settings.generate_map {
            info!("generating a fresh overworld");
            self.flags.push('A');
            let mut ok = false;
            for attempt in 1..=MAP_RETRY_LIMIT {
                if map.generate(&mut self.rng) {
                    ok = true;
                    break;
                }
                debug!("map generation attempt {attempt} produced an unusable layout");
            }
            if !ok {
                return Err(RandomizerError::Constraint(format!(
                    "map generation failed {MAP_RETRY_LIMIT} times"
                )));
            }
            if map.generated() {
                // Encounter 3 moves into Charlock; the kill-memory location
                // byte stays cleared so the fight always happens.
                self.encounter_locs[2].copy_from_slice(&CHARLOCK_ENCOUNTER_LOC);
                self.encounter_3_kill[1] = 0;
            }
        }

        if self.settings.speed_hacks {
            info!("applying game speed hacks");
            self.flags.push('H');
            self.add_speed_hacks();
        }

        if self.settings.search_items {
            info!("shuffling searchable item locations");
            self.flags.push('I');
            search::shuffle_searchables(
                &mut self.token_loc,
                &mut self.flute_loc,
                &mut self.armor_loc,
                map,
                &mut self.rng,
            )?;
        }

        if self.settings.chests {
            info!("shuffling chest contents");
            self.flags.push('C');
            chests::shuffle_chests(&mut self.chests, &mut self.token_loc, &mut self.rng)?;
        }

        match self.settings.zones {
            Tier::Off => {}
            Tier::Normal => {
                info!("randomizing enemy zones");
                self.flags.push('z');
                zones::randomize_zones(&mut self.zones, &mut self.rng)?;
            }
            Tier::Ultra => {
                info!("ultra randomizing enemy zones");
                self.flags.push('Z');
                zones::randomize_zones_ultra(
                    &mut self.zones,
                    &mut self.zone_layout,
                    &mut self.encounter_enemies,
                    &mut self.encounter_2_kill,
                    &mut self.encounter_3_kill,
                    map.generated(),
                    map.start(),
                    &mut self.rng,
                );
            }
        }

        match self.settings.patterns {
            Tier::Off => {}
            tier => {
                let ultra = tier == Tier::Ultra;
                info!("randomizing enemy attack patterns (ultra: {ultra})");
                self.flags.push(if ultra { 'P' } else { 'p' });
                patterns::randomize_attack_patterns(&mut self.enemy_stats, ultra, &mut self.rng);
            }
        }

        if self.settings.shops {
            info!("randomizing weapon shops");
            self.flags.push('W');
            self.shop_inventory = shops::randomize_shops(&mut self.rng)?;
        }

        match self.settings.growth {
            Tier::Off => {}
            tier => {
                let ultra = tier == Tier::Ultra;
                info!("randomizing player stat growth (ultra: {ultra})");
                self.flags.push(if ultra { 'G' } else { 'g' });
                growth::randomize_growth(&mut self.player_stats, ultra, &mut self.rng);
            }
        }

        info!("applying remake balance to drops, enemy HP and MP costs");
        economy::apply_remake_balance(&mut self.enemy_stats, &mut self.mp_reqs, &mut self.rng);

        match self.settings.leveling {
            Leveling::Normal => {}
            Leveling::Fast => {
                info!("scaling XP requirements to 75%");
                self.flags.push('f');
                economy::scale_xp_requirements(&mut self.xp_reqs, 0.75);
            }
            Leveling::VeryFast => {
                info!("scaling XP requirements to 50%");
                self.flags.push('F');
                economy::scale_xp_requirements(&mut self.xp_reqs, 0.5);
            }
        }

        info!("moving repel to level 8");
        spells::move_repel(&mut self.spell_levels, &mut self.player_stats);

        match self.settings.spells {
            Tier::Off => {}
            tier => {
                let ultra = tier == Tier::Ultra;
                info!("randomizing spell learn levels (ultra: {ultra})");
                self.flags.push(if ultra { 'M' } else { 'm' });
                spells::randomize_spell_learning(
                    &mut self.spell_levels,
                    &mut self.player_stats,
                    ultra,
                    &mut self.rng,
                );
            }
        }

        self.title_text = text::build_title_screen(
            RegionId::TitleText.region().count,
            self.settings.seed,
            &self.flags,
            VERSION,
        );

        Ok(())
    }

    /// Pushes every working copy into the ledger, merges the map
    /// generator's edits and applies everything to the buffer.
    pub fn commit(&mut self, map: &mut dyn MapGenerator) -> Result<()> {
        let ledger = &mut self.ledger;
        ledger.add_region(
            RegionId::WillNotWorkText.region(),
            &text::encode("The spell had no effect."),
        );
        // The hint NPC runs last: it needs the final searchable placements.
        ledger.add(
            RegionId::TokenDialogue.region().offset,
            dialogue::token_dialogue(
                &self.token_loc,
                &self.flute_loc,
                &self.armor_loc,
                map.start(),
            ),
        );
        ledger.add_region(RegionId::EnemyStats.region(), &self.enemy_stats);
        ledger.add_region(RegionId::MpRequirements.region(), &self.mp_reqs);
        ledger.add_region(RegionId::XpRequirements.region(), &self.xp_reqs);
        ledger.add_region(RegionId::Zones.region(), &self.zones);
        ledger.add_region(RegionId::ZoneLayout.region(), &self.zone_layout);
        ledger.add_region(RegionId::ShopInventory.region(), &self.shop_inventory);
        ledger.add_region(RegionId::TokenLocation.region(), &self.token_loc);
        ledger.add_region(RegionId::FluteLocation.region(), &self.flute_loc);
        ledger.add_region(RegionId::ArmorLocation.region(), &self.armor_loc);

        let location_regions = [
            (RegionId::Encounter1Location, RegionId::Encounter1Run),
            (RegionId::Encounter2Location, RegionId::Encounter2Run),
            (RegionId::Encounter3Location, RegionId::Encounter3Run),
        ];
        for (i, (loc, run)) in location_regions.into_iter().enumerate() {
            ledger.add_region(loc.region(), &self.encounter_locs[i]);
            // The run handler keeps its own copy of each location.
            ledger.add_region(run.region(), &self.encounter_locs[i]);
        }
        ledger.add_region(RegionId::EncounterEnemies.region(), &self.encounter_enemies);
        ledger.add_region(RegionId::Encounter2Kill.region(), &self.encounter_2_kill);
        ledger.add_region(RegionId::Encounter3Kill.region(), &self.encounter_3_kill);

        ledger.add_region(RegionId::PlayerStats.region(), &self.player_stats);
        ledger.add_region(RegionId::SpellLevels.region(), &self.spell_levels);
        ledger.add_region(RegionId::Chests.region(), &self.chests);
        ledger.add_region(RegionId::TitleText.region(), &self.title_text);

        self.ledger.merge(map.take_ledger());
        self.ledger.apply(self.rom.bytes_mut());
        Ok(())
    }

    /// Per-pass flag letters in run order, e.g. `ICzpWg`.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn ledger(&self) -> &PatchLedger {
        &self.ledger
    }

    pub fn rom(&self) -> &RomImage {
        &self.rom
    }

    pub fn into_rom(self) -> RomImage {
        self.rom
    }
}
