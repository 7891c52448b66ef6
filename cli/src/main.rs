use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use manasheet_engine::api::{self, AccuracyConfig, AttackConfig, CharacterSource};
use manasheet_engine::{TargetModifier, Tuning};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum Target {
    Normal,
    Resistant,
    Weak,
    Vulnerable,
}

#[derive(Copy, Clone, ValueEnum)]
enum Preset {
    Tier1,
    Legacy,
}

/// One character: a built-in id or a sheet file.
#[derive(Args)]
struct Who {
    /// Built-in character id (brakka, seren, training_dummy)
    #[arg(long, conflicts_with = "file")]
    character: Option<String>,
    /// Path to a character sheet JSON
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Resolve one attack or cast and apply it to the defender
    Attack {
        /// Attacking built-in character id
        #[arg(long, default_value = "brakka")]
        attacker: String,
        /// Attacker sheet JSON (overrides --attacker)
        #[arg(long)]
        attacker_file: Option<PathBuf>,
        /// Defending built-in character id
        #[arg(long, default_value = "training_dummy")]
        defender: String,
        /// Defender sheet JSON (overrides --defender)
        #[arg(long)]
        defender_file: Option<PathBuf>,
        /// Action name as it appears on the attacker's sheet
        #[arg(long)]
        action: String,
        /// Dice sum rolled at the table (defaults to the average)
        #[arg(long)]
        roll: Option<i32>,
        /// d20 for the accuracy check; omit to skip it
        #[arg(long)]
        d20: Option<i32>,
        /// Mana to allocate, in base units (abilities only)
        #[arg(long)]
        mana: Option<i32>,
        /// Raise an under-allocated spend to the base cost
        #[arg(long, default_value_t = false)]
        normalize: bool,
        #[arg(long, value_enum, default_value_t = Target::Normal)]
        target: Target,
        /// Double the total before glancing and DR
        #[arg(long, default_value_t = false)]
        crit: bool,
        /// Print the staged breakdown after the log
        #[arg(long, default_value_t = false)]
        breakdown: bool,
        /// Emit the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run only the accuracy check for an action
    Accuracy {
        #[arg(long, default_value = "brakka")]
        attacker: String,
        #[arg(long)]
        attacker_file: Option<PathBuf>,
        #[arg(long, default_value = "training_dummy")]
        defender: String,
        #[arg(long)]
        defender_file: Option<PathBuf>,
        #[arg(long)]
        action: String,
        #[arg(long)]
        d20: i32,
    },
    /// Spend unspent growth points into a resource or stat
    Spend {
        #[command(flatten)]
        who: Who,
        /// hp | mana | pbd | mana_density | stat:<key>
        #[arg(long)]
        target: String,
        #[arg(long)]
        amount: i32,
        /// Point-cost schedule
        #[arg(long, value_enum, default_value_t = Preset::Tier1)]
        preset: Preset,
        /// Tuning YAML (overrides --preset)
        #[arg(long)]
        tuning: Option<PathBuf>,
    },
    /// Long rest: restore HP and mana to max
    Rest {
        #[command(flatten)]
        who: Who,
    },
    /// Print a character's typed view (stats, resources, actions) as JSON
    Dump {
        #[command(flatten)]
        who: Who,
        /// Single-line JSON
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
}

#[derive(Parser)]
#[command(name = "manasheet")]
#[command(about = "Mana sheet combat calculator")]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn to_target(t: Target) -> TargetModifier {
    match t {
        Target::Normal => TargetModifier::Normal,
        Target::Resistant => TargetModifier::Resistant,
        Target::Weak => TargetModifier::Weak,
        Target::Vulnerable => TargetModifier::Vulnerable,
    }
}

fn source(id: String, file: Option<PathBuf>) -> CharacterSource {
    match file {
        Some(path) => CharacterSource::file(path.to_string_lossy()),
        None => CharacterSource::builtin(id),
    }
}

impl Who {
    fn source(&self) -> CharacterSource {
        match (&self.file, &self.character) {
            (Some(path), _) => CharacterSource::file(path.to_string_lossy()),
            (None, Some(id)) => CharacterSource::builtin(id.clone()),
            (None, None) => CharacterSource::builtin("brakka"),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Attack {
            attacker,
            attacker_file,
            defender,
            defender_file,
            action,
            roll,
            d20,
            mana,
            normalize,
            target,
            crit,
            breakdown,
            json,
        } => {
            let report = api::simulate_attack(AttackConfig {
                attacker: source(attacker, attacker_file),
                defender: source(defender, defender_file),
                action,
                damage_roll: roll,
                d20,
                mana_spend: mana,
                normalize_spend: normalize,
                target: to_target(target),
                critical: crit,
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            for line in &report.log {
                println!("{}", line);
            }
            if breakdown {
                print!("{}", report.result.breakdown);
            }
            println!(
                "{} HP {}/{}",
                report.defender,
                report.defender_resources.hp_current(),
                report.defender_resources.hp_max()
            );
        }
        Cmd::Accuracy {
            attacker,
            attacker_file,
            defender,
            defender_file,
            action,
            d20,
        } => {
            let report = api::check_hit(AccuracyConfig {
                attacker: source(attacker, attacker_file),
                defender: source(defender, defender_file),
                action,
                d20,
            })?;
            for line in &report.log {
                println!("{}", line);
            }
        }
        Cmd::Spend {
            who,
            target,
            amount,
            preset,
            tuning,
        } => {
            let tuning = match tuning {
                Some(path) => api::load_tuning(&path.to_string_lossy())?,
                None => match preset {
                    Preset::Tier1 => Tuning::TIER1,
                    Preset::Legacy => Tuning::LEGACY,
                },
            };
            tracing::debug!(?tuning, "point schedule");
            let report = api::spend_points(&who.source(), &tuning, &target, amount)?;
            for line in &report.log {
                println!("{}", line);
            }
            let res = &report.resources;
            println!(
                "HP {}/{}  Mana {}/{}  PBD {}  Mana Density {}  Unspent {}",
                res.hp_current(),
                res.hp_max(),
                res.mana_current(),
                res.mana_max(),
                res.pbd(),
                res.mana_density(),
                res.unspent_points()
            );
        }
        Cmd::Rest { who } => {
            let report = api::rest(&who.source())?;
            for line in &report.log {
                println!("{}", line);
            }
        }
        Cmd::Dump { who, compact } => {
            let character = who.source().load()?;
            if compact {
                println!("{}", serde_json::to_string(&character)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&character)?);
            }
        }
    }
    Ok(())
}
