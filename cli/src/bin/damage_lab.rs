use clap::{Parser, ValueEnum};
use encoding_rs::Encoding;
use manasheet_engine::api::{builtin_character, parse_character};
use manasheet_engine::coerce::str_int_or;
use manasheet_engine::lab::{self, RollProfile, SweepPoint};
use manasheet_engine::{
    Character, CombatAction, CombatantSnapshot, DiceExpression, ManaSpend, ResolveOptions,
    TargetModifier,
};
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "damage-lab")]
#[command(about = "Deterministic damage sweeps for one action on a sheet")]
struct Args {
    /// Built-in character id
    #[arg(long, default_value = "brakka")]
    character: String,

    /// Character sheet JSON (overrides --character)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Action name on the sheet
    #[arg(long)]
    action: String,

    /// roll: damage for every dice sum | mana: damage for every spend |
    /// additive: the older sheet's item roller (flat bonus, no multiplier)
    #[arg(long, value_enum, default_value_t = Mode::Roll)]
    mode: Mode,

    /// Mana to allocate (base units) for roll sweeps; defaults to the cost
    #[arg(long)]
    mana: Option<i32>,

    /// Mana sweep runs from cost to cost * this
    #[arg(long, default_value_t = 4)]
    max_multiple: i32,

    /// Dice sum held fixed in a mana sweep
    #[arg(long, value_enum, default_value_t = Profile::Average)]
    profile: Profile,

    /// Dice sum for --profile custom (blank or bad falls back to average)
    #[arg(long)]
    roll: Option<String>,

    /// Override PBD / precision for item bonuses
    #[arg(long)]
    bonus: Option<String>,

    /// Optional defender id whose physical defense applies DR
    #[arg(long)]
    defender: Option<String>,

    #[arg(long, value_enum, default_value_t = Target::Normal)]
    target: Target,

    #[arg(long, default_value_t = false)]
    crit: bool,

    /// Debug logging on stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum Mode {
    Roll,
    Mana,
    Additive,
}

#[derive(Copy, Clone, ValueEnum)]
enum Profile {
    Average,
    Max,
    Custom,
}

#[derive(Copy, Clone, ValueEnum)]
enum Target {
    Normal,
    Resistant,
    Weak,
    Vulnerable,
}

fn to_target(t: Target) -> TargetModifier {
    match t {
        Target::Normal => TargetModifier::Normal,
        Target::Resistant => TargetModifier::Resistant,
        Target::Weak => TargetModifier::Weak,
        Target::Vulnerable => TargetModifier::Vulnerable,
    }
}

fn to_profile(p: Profile, custom: Option<&str>, dice: &DiceExpression) -> RollProfile {
    match p {
        Profile::Average => RollProfile::Average,
        Profile::Max => RollProfile::Max,
        Profile::Custom => {
            RollProfile::Custom(str_int_or(custom.unwrap_or_default(), dice.average_roll()))
        }
    }
}

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn load_sheet(args: &Args) -> anyhow::Result<Character> {
    match args.file.as_ref() {
        Some(path) => parse_character(&read_text_auto(path)?),
        None => builtin_character(&args.character),
    }
}

fn attacker_snapshot(character: &Character, bonus: Option<&str>) -> CombatantSnapshot {
    let mut snap = character.snapshot();
    if let Some(text) = bonus {
        snap.pbd = str_int_or(text, snap.pbd);
        snap.precision = str_int_or(text, snap.precision);
    }
    snap
}

fn print_sweep(title: &str, xlabel: &str, points: &[SweepPoint]) {
    println!("{}", title);
    println!("{}", "-".repeat(title.chars().count()));
    println!("{:>8}  {:>8}", xlabel, "damage");
    for p in points {
        println!("{:>8}  {:>8}", p.x, p.damage);
    }
    if let (Some(lo), Some(hi)) = (
        points.iter().map(|p| p.damage).min(),
        points.iter().map(|p| p.damage).max(),
    ) {
        println!();
        println!("min damage:         {}", lo);
        println!("max damage:         {}", hi);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let character = load_sheet(&args)?;
    let action = character
        .find_action(&args.action)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("{} has no action named '{}'", character.name, args.action))?;

    let attacker = attacker_snapshot(&character, args.bonus.as_deref());
    let defender = match args.defender.as_deref() {
        Some(id) => builtin_character(id)?.snapshot(),
        None => CombatantSnapshot::default(),
    };
    tracing::debug!(
        action = action.name(),
        pbd = attacker.pbd,
        precision = attacker.precision,
        mana_density = attacker.mana_density,
        dr_from = defender.phys_def,
        "lab inputs"
    );
    let opts = ResolveOptions {
        d20: None,
        mana_spend_base: args.mana,
        target: to_target(args.target),
        critical: args.crit,
    };

    match args.mode {
        Mode::Roll => {
            let points = lab::damage_vs_roll(&action, &attacker, &defender, opts)?;
            print_sweep(
                &format!("{} [{}] vs roll", action.name(), action.damage()),
                "roll",
                &points,
            );
        }
        Mode::Mana => {
            let CombatAction::Ability(ability) = &action else {
                anyhow::bail!(
                    "damage vs mana only applies to abilities; '{}' is an item",
                    action.name()
                );
            };
            let profile = to_profile(args.profile, args.roll.as_deref(), &ability.damage);
            let points = lab::damage_vs_mana(
                ability,
                &attacker,
                &defender,
                profile,
                args.max_multiple,
                opts,
            )?;
            print_sweep(
                &format!(
                    "{} [{}] vs mana (roll={})",
                    action.name(),
                    action.damage(),
                    profile.roll(&ability.damage)
                ),
                "mana",
                &points,
            );
        }
        Mode::Additive => {
            let CombatAction::Item(item) = &action else {
                anyhow::bail!(
                    "the additive roller only applies to items; '{}' is an ability",
                    action.name()
                );
            };
            let points = lab::additive_vs_roll(item, &attacker);
            print_sweep(
                &format!("{} [{}] additive vs roll", action.name(), action.damage()),
                "roll",
                &points,
            );
            return Ok(());
        }
    }

    if let Some(mean) = lab::expected_damage(&action, &attacker, &defender, opts)? {
        let spend = match &action {
            CombatAction::Ability(ab) => {
                format!(
                    " at mana {}",
                    ManaSpend::normalize(args.mana.unwrap_or(ab.mana_cost), ab.mana_cost)
                )
            }
            CombatAction::Item(_) => String::new(),
        };
        println!("expected damage:    {:.2}{}", mean, spend);
    }

    Ok(())
}
