//! Seed-reproducible randomizer engine for the original Dragon Warrior NES
//! ROM. Loads an image, runs a fixed sequence of randomization passes over
//! extracted data regions, and produces a patched image plus an IPS diff of
//! every edit.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod chests;
pub mod dialogue;
pub mod economy;
pub mod growth;
pub mod map;
pub mod patch;
pub mod patterns;
pub mod regions;
pub mod rom;
pub mod search;
pub mod session;
pub mod shops;
pub mod spells;
pub mod text;
pub mod zones;

pub use rom::{RomImage, RomVariant};
pub use session::Session;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum RandomizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RandomizerError>;

/// Randomization strength for the categories that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Off,
    Normal,
    Ultra,
}

impl Tier {
    pub fn enabled(self) -> bool {
        self != Tier::Off
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leveling {
    Normal,
    /// XP requirements at 75%.
    Fast,
    /// XP requirements at 50%.
    VeryFast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomizerSettings {
    pub seed: u64,
    pub chests: bool,
    pub search_items: bool,
    pub zones: Tier,
    pub patterns: Tier,
    pub growth: Tier,
    pub spells: Tier,
    pub shops: bool,
    pub leveling: Leveling,
    pub generate_map: bool,
    pub speed_hacks: bool,
    /// Proceed even when the input does not match a known original dump.
    pub force: bool,
    /// Also emit the ledger as a standalone IPS patch.
    pub write_ips: bool,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
}

/// Runs one full randomization: load, verify, randomize, commit, write.
pub fn run(settings: RandomizerSettings) -> Result<()> {
    let data = fs::read(&settings.input_path)?;
    let rom_image = RomImage::new(data)?;

    let variant = rom_image.identify();
    match variant {
        RomVariant::Unknown => {
            if settings.force {
                warn!("checksum does not match any known ROM; continuing anyway");
            } else {
                return Err(RandomizerError::Config(
                    "checksum does not match any known ROM (use force to override)".to_string(),
                ));
            }
        }
        v => info!("input identified as Dragon Warrior {v:?}"),
    }

    info!(
        "randomizing {} with seed {}",
        settings.input_path.display(),
        settings.seed
    );

    let mut map = map::VanillaMap::from_rom(&rom_image)?;
    let mut session = Session::new(rom_image, settings.clone());
    session.randomize(&mut map)?;
    session.commit(&mut map)?;

    fs::create_dir_all(&settings.output_dir)?;
    let flags = session.flags().to_string();
    let stem = format!("DWRando.{}.{}.{}", flags, settings.seed, variant.file_tag());

    let rom_path = settings.output_dir.join(format!("{stem}nes"));
    fs::write(&rom_path, session.rom().bytes())?;
    info!(
        "wrote {} (sha1 {})",
        rom_path.display(),
        session.rom().sha1_hex()
    );

    if settings.write_ips {
        let ips_path = settings.output_dir.join(format!("{stem}ips"));
        fs::write(&ips_path, session.ledger().encode())?;
        info!("wrote {}", ips_path.display());
    }

    let settings_path = settings.output_dir.join(format!("{stem}json"));
    fs::write(&settings_path, serde_json::to_vec_pretty(&settings)?)?;

    Ok(())
}
