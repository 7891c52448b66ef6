use std::fs;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::action::{CombatAction, ManaSpend};
use crate::combatant::{Character, Stats};
use crate::content::builtin_characters;
use crate::ledger::{self, ResourceState};
use crate::points::{SpendOutcome, SpendTarget};
use crate::record::CharacterRecord;
use crate::resolve::{
    check_accuracy, resolve, AccuracyCheck, DamageResult, ResolveOptions, TargetModifier,
};
use crate::tuning::Tuning;

/// Where a character sheet comes from: a built-in id or a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CharacterSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl CharacterSource {
    pub fn builtin(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            path: None,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            id: None,
            path: Some(path.into()),
        }
    }

    pub fn load(&self) -> Result<Character> {
        match (&self.id, &self.path) {
            (Some(id), _) => builtin_character(id),
            (None, Some(path)) => load_character(path),
            (None, None) => bail!("character needs an id or a path"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AttackConfig {
    pub attacker: CharacterSource,
    pub defender: CharacterSource,
    pub action: String,
    /// Dice sum as rolled at the table; the expression's average when absent.
    #[serde(default)]
    pub damage_roll: Option<i32>,
    #[serde(default)]
    pub d20: Option<i32>,
    #[serde(default)]
    pub mana_spend: Option<i32>,
    /// Raise a spend below base cost instead of refusing the cast.
    #[serde(default)]
    pub normalize_spend: bool,
    #[serde(default)]
    pub target: TargetModifier,
    #[serde(default)]
    pub critical: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AttackReport {
    pub attacker: String,
    pub defender: String,
    pub action: String,
    pub damage_roll: i32,
    pub result: DamageResult,
    pub attacker_resources: ResourceState,
    pub defender_resources: ResourceState,
    pub log: Vec<String>,
}

/// Resolve one attack and apply it: the attacker pays mana (if any), then
/// the defender takes the final damage.
pub fn simulate_attack(cfg: AttackConfig) -> Result<AttackReport> {
    let mut logs = Vec::new();
    let mut attacker = cfg.attacker.load().context("loading attacker")?;
    let mut defender = cfg.defender.load().context("loading defender")?;
    let action = find_action(&attacker, &cfg.action)?.clone();

    let damage_roll = cfg
        .damage_roll
        .unwrap_or_else(|| action.damage().average_roll());
    let mana_spend_base = match (&action, cfg.mana_spend) {
        (CombatAction::Ability(ab), spend) if cfg.normalize_spend => Some(ManaSpend::normalize(
            spend.unwrap_or(ab.mana_cost),
            ab.mana_cost,
        )),
        (_, spend) => spend,
    };
    let opts = ResolveOptions {
        d20: cfg.d20,
        mana_spend_base,
        target: cfg.target,
        critical: cfg.critical,
    };

    logs.push(format!(
        "[START] {} (HP {}/{}, Mana {}/{}) uses {} on {} (HP {}/{})",
        attacker.name,
        attacker.resources.hp_current(),
        attacker.resources.hp_max(),
        attacker.resources.mana_current(),
        attacker.resources.mana_max(),
        action.name(),
        defender.name,
        defender.resources.hp_current(),
        defender.resources.hp_max()
    ));

    let result = resolve(&action, &attacker.snapshot(), &defender.snapshot(), damage_roll, opts)
        .map_err(|err| {
            tracing::warn!(action = action.name(), %err, "attack refused");
            anyhow!(err)
        })?;

    if let Some(eff) = result.spent_effective {
        let name = attacker.name.clone();
        ledger::spend_mana(&name, &mut attacker.resources, eff, |l| logs.push(l)).map_err(
            |err| {
                tracing::warn!(action = action.name(), %err, "cast refused");
                anyhow!(err)
            },
        )?;
    }

    log_attack(&mut logs, &attacker.name, &action, &result);
    if !result.is_miss() {
        let name = defender.name.clone();
        ledger::apply_damage(&name, &mut defender.resources, result.final_damage, |l| {
            logs.push(l)
        });
        if defender.resources.is_down() {
            logs.push(format!("[DOWN][{}] HP 0", defender.name));
        }
    }

    Ok(AttackReport {
        attacker: attacker.name,
        defender: defender.name,
        action: action.name().to_string(),
        damage_roll,
        result,
        attacker_resources: attacker.resources,
        defender_resources: defender.resources,
        log: logs,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccuracyConfig {
    pub attacker: CharacterSource,
    pub defender: CharacterSource,
    pub action: String,
    pub d20: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AccuracyReport {
    pub action: String,
    pub stat: String,
    pub check: AccuracyCheck,
    pub outcome: String,
    pub log: Vec<String>,
}

pub fn check_hit(cfg: AccuracyConfig) -> Result<AccuracyReport> {
    let attacker = cfg.attacker.load().context("loading attacker")?;
    let defender = cfg.defender.load().context("loading defender")?;
    let action = find_action(&attacker, &cfg.action)?;

    let check = check_accuracy(action, &attacker.snapshot(), &defender.snapshot(), cfg.d20);
    let outcome = check.outcome().to_string();
    let log = vec![format!(
        "[ACC][{}] {} {} x d20={} ({:.2}x) = {:.1} vs Eva {} → {}% {}",
        attacker.name,
        check.stat.label(),
        check.accuracy,
        check.d20,
        check.roll_multiplier,
        check.effective_accuracy,
        check.evasion,
        (check.glance_multiplier * 100.0) as i32,
        outcome
    )];

    Ok(AccuracyReport {
        action: action.name().to_string(),
        stat: check.stat.label().to_string(),
        check,
        outcome,
        log,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SpendReport {
    pub character: String,
    pub target: String,
    pub outcome: SpendOutcome,
    pub resources: ResourceState,
    pub stats: Stats,
    pub log: Vec<String>,
}

/// Spend from the character's unspent pool into `target`.
pub fn spend_points(
    source: &CharacterSource,
    tuning: &Tuning,
    target: &str,
    amount: i32,
) -> Result<SpendReport> {
    let mut character = source.load()?;
    let target = target.parse::<SpendTarget>().map_err(|err| {
        tracing::warn!(%err, "spend refused");
        anyhow!(err)
    })?;
    if amount <= 0 {
        bail!("spend amount must be positive, got {amount}");
    }
    if character.resources.unspent_points() == 0 {
        bail!("{} has no unspent points", character.name);
    }

    let before = character.resources.unspent_points();
    let outcome = character.spend_unspent(tuning, target, amount);
    let log = vec![format!(
        "[SPEND][{}] {} pts → {} +{} (unspent {} → {})",
        character.name,
        outcome.spent,
        target,
        outcome.gained,
        before,
        character.resources.unspent_points()
    )];

    Ok(SpendReport {
        character: character.name,
        target: target.to_string(),
        outcome,
        resources: character.resources,
        stats: character.stats,
        log,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RestReport {
    pub character: String,
    pub resources: ResourceState,
    pub log: Vec<String>,
}

pub fn rest(source: &CharacterSource) -> Result<RestReport> {
    let mut character = source.load()?;
    let mut logs = Vec::new();
    ledger::long_rest(&character.name, &mut character.resources, |l| logs.push(l));
    Ok(RestReport {
        character: character.name,
        resources: character.resources,
        log: logs,
    })
}

pub fn load_character(path: &str) -> Result<Character> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read character JSON: {}", path))?;
    parse_character(&text).with_context(|| format!("failed to parse character JSON: {}", path))
}

pub fn builtin_character(id: &str) -> Result<Character> {
    let builtins = builtin_characters();
    let text = builtins.get(id).ok_or_else(|| {
        let mut known: Vec<_> = builtins.keys().copied().collect();
        known.sort_unstable();
        anyhow!("unknown character id '{}' (known: {})", id, known.join(", "))
    })?;
    parse_character(text).with_context(|| format!("failed to parse built-in character: {}", id))
}

pub fn parse_character(text: &str) -> Result<Character> {
    let record: CharacterRecord = serde_json::from_str(text)?;
    Ok(record.into_character())
}

pub fn load_tuning(path: &str) -> Result<Tuning> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning YAML: {}", path))?;
    let tuning = Tuning::from_yaml_str(&text)
        .with_context(|| format!("failed to parse tuning YAML: {}", path))?;
    Ok(tuning)
}

fn find_action<'a>(character: &'a Character, name: &str) -> Result<&'a CombatAction> {
    character.find_action(name).ok_or_else(|| {
        tracing::warn!(character = %character.name, action = name, "unknown action");
        let known: Vec<_> = character.actions.iter().map(|a| a.display()).collect();
        anyhow!(
            "{} has no action named '{}' (actions: {})",
            character.name,
            name,
            known.join(", ")
        )
    })
}

fn log_attack(logs: &mut Vec<String>, name: &str, action: &CombatAction, res: &DamageResult) {
    let mark = if res.is_miss() { "✖" } else { "✔" };
    logs.push(format!(
        "[ATTACK][{}] {} → {} {}",
        name,
        action.name(),
        res.outcome,
        mark
    ));
    logs.push(format!("[CALC][{}] {}", name, res.summary()));
}
