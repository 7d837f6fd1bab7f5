use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use dwrando_core::{run, Leveling, RandomizerSettings, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TierArg {
    Off,
    Normal,
    Ultra,
}

impl From<TierArg> for Tier {
    fn from(t: TierArg) -> Tier {
        match t {
            TierArg::Off => Tier::Off,
            TierArg::Normal => Tier::Normal,
            TierArg::Ultra => Tier::Ultra,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LevelingArg {
    Normal,
    Fast,
    VeryFast,
}

impl From<LevelingArg> for Leveling {
    fn from(l: LevelingArg) -> Leveling {
        match l {
            LevelingArg::Normal => Leveling::Normal,
            LevelingArg::Fast => Leveling::Fast,
            LevelingArg::VeryFast => Leveling::VeryFast,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "dwrando", version, about = "A randomizer for Dragon Warrior for NES")]
struct Args {
    /// The ROM file to use for input.
    input: PathBuf,

    /// Directory the randomized ROM (and optional IPS patch) is written to.
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// Seed for randomization; random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Shuffle chest contents.
    #[arg(long, default_value_t = true)]
    chests: bool,

    /// Shuffle the three searchable item locations.
    #[arg(long, default_value_t = true)]
    search_items: bool,

    #[arg(long, value_enum, default_value_t = TierArg::Normal)]
    zones: TierArg,

    #[arg(long, value_enum, default_value_t = TierArg::Normal)]
    patterns: TierArg,

    #[arg(long, value_enum, default_value_t = TierArg::Normal)]
    growth: TierArg,

    #[arg(long, value_enum, default_value_t = TierArg::Normal)]
    spells: TierArg,

    /// Randomize weapon shop inventories.
    #[arg(long, default_value_t = true)]
    shops: bool,

    /// XP-per-level speed.
    #[arg(long, value_enum, default_value_t = LevelingArg::Normal)]
    leveling: LevelingArg,

    /// Ask the map collaborator for a fresh overworld layout.
    #[arg(long, default_value_t = false)]
    generate_map: bool,

    /// Apply game speed hacks (experimental).
    #[arg(long, default_value_t = false)]
    speed_hacks: bool,

    /// Raise every randomized category to the ultra tier.
    #[arg(short, long, default_value_t = false)]
    ultra: bool,

    /// Skip the checksum check and randomize anyway.
    #[arg(long, default_value_t = false)]
    force: bool,

    /// Also write the edits as a standalone IPS patch.
    #[arg(long, default_value_t = false)]
    ips: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand_seed);

    let lift = |t: TierArg| -> Tier {
        if args.ultra && t != TierArg::Off {
            Tier::Ultra
        } else {
            t.into()
        }
    };

    let settings = RandomizerSettings {
        seed,
        chests: args.chests,
        search_items: args.search_items,
        zones: lift(args.zones),
        patterns: lift(args.patterns),
        growth: lift(args.growth),
        spells: lift(args.spells),
        shops: args.shops,
        leveling: args.leveling.into(),
        generate_map: args.generate_map,
        speed_hacks: args.speed_hacks,
        force: args.force,
        write_ips: args.ips,
        input_path: args.input,
        output_dir: args.output,
    };

    if let Err(err) = run(settings) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Seeds from the system clock when the user does not supply one.
fn rand_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
