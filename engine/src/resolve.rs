//! Damage resolution for one attack or cast.
//!
//! The stage order below is part of the game's balance and must not change:
//!
//! ```text
//! 1. accuracy      (only with a d20) eff_acc = acc_stat * hit_roll(d20)
//!                  glance = evasion_curve(eff_acc / evasion); 0 => MISS
//! 2. base          rolled dice sum + flat bonus
//! 3. pipeline      item:    floor(base * md_mult(pbd | precision))
//!                  ability: floor((base + overcast) * slot_dmg * md_mult(mana_density))
//!    modifiers     floor(total * target), x2 on crit
//! 4. glancing      floor(total * glance)
//! 5. defense       max(0, after_glance - floor(phys_def / 5))
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::{AbilityAction, AccuracyStat, CombatAction, ItemAction};
use crate::combatant::CombatantSnapshot;
use crate::curve::{evasion_multiplier, hit_roll_multiplier};
use crate::error::ResolveError;
use crate::scaling::{mana_density_multiplier, overcast_bonus, physical_dr};

/// Defender's affinity against the incoming damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetModifier {
    #[default]
    Normal,
    Resistant,
    Weak,
    Vulnerable,
}

impl TargetModifier {
    pub fn multiplier(self) -> f64 {
        match self {
            TargetModifier::Normal => 1.0,
            TargetModifier::Resistant => 0.5,
            TargetModifier::Weak => 1.5,
            TargetModifier::Vulnerable => 2.0,
        }
    }
}

impl std::str::FromStr for TargetModifier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(TargetModifier::Normal),
            "resistant" | "resist" => Ok(TargetModifier::Resistant),
            "weak" => Ok(TargetModifier::Weak),
            "vulnerable" | "vuln" => Ok(TargetModifier::Vulnerable),
            _ => Err(()),
        }
    }
}

/// Everything about a resolution besides the action and the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    /// Player-entered d20; `None` skips the accuracy stage entirely.
    pub d20: Option<i32>,
    /// Mana allocated in base units; defaults to the ability's cost.
    pub mana_spend_base: Option<i32>,
    pub target: TargetModifier,
    pub critical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Hit,
    Glancing,
    Miss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Hit => "HIT",
            Outcome::Glancing => "GLANCING",
            Outcome::Miss => "MISS",
        })
    }
}

/// One labelled intermediate value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stage {
    pub label: &'static str,
    pub value: f64,
}

/// Ordered audit trail of a resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Breakdown(Vec<Stage>);

impl Breakdown {
    fn push(&mut self, label: &'static str, value: impl Into<f64>) {
        self.0.push(Stage {
            label,
            value: value.into(),
        });
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|s| s.label == label).map(|s| s.value)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.0.iter().map(|s| s.label).collect()
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stage in &self.0 {
            writeln!(f, "{}: {}", stage.label, stage.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageResult {
    pub final_damage: i32,
    pub outcome: Outcome,
    /// Slot-adjusted mana the caller must deduct. `None` for items and misses.
    pub spent_effective: Option<i32>,
    pub breakdown: Breakdown,
}

impl DamageResult {
    pub fn is_miss(&self) -> bool {
        self.outcome == Outcome::Miss
    }

    /// One-line combat-log rendering, e.g.
    /// `Base 8 (roll 6+2) * Bonus 1.50x = 12 - DR 2 = 10 damage`.
    pub fn summary(&self) -> String {
        let b = &self.breakdown;
        let num = |label: &str| b.get(label).unwrap_or(0.0);
        let mut out = String::new();

        if let Some(eff) = b.get("effective_accuracy") {
            out.push_str(&format!(
                "Acc {:.1} vs Eva {} → {}% | ",
                eff,
                num("evasion"),
                (num("glance_multiplier") * 100.0) as i32
            ));
        }
        if self.is_miss() {
            out.push_str("MISS");
            return out;
        }

        out.push_str(&format!(
            "Base {} (roll {}{:+})",
            num("base_damage"),
            num("dice_roll"),
            num("flat_bonus") as i32
        ));
        if let Some(bonus) = b.get("overcast_bonus").filter(|v| *v > 0.0) {
            out.push_str(&format!(" + Overcast {}", bonus));
        }
        if let Some(mult) = b.get("bonus_multiplier") {
            out.push_str(&format!(" * Bonus {:.2}x", mult));
        }
        if let Some(mult) = b.get("slot_damage_multiplier") {
            out.push_str(&format!(
                " * Slot {:.2}x * MD {:.2}x",
                mult,
                num("mana_density_multiplier")
            ));
        }
        if let Some(mult) = b.get("target_multiplier") {
            out.push_str(&format!(" * Target {:.2}x", mult));
        }
        if b.get("critical").is_some() {
            out.push_str(" * Crit 2x");
        }
        out.push_str(&format!(" = {}", num("total")));
        let glance = num("glance_multiplier");
        if b.get("glance_multiplier").is_some() && glance < 1.0 {
            out.push_str(&format!(
                " * Glancing {}% = {}",
                (glance * 100.0) as i32,
                num("after_glance")
            ));
        }
        let dr = num("damage_reduction");
        if dr > 0.0 {
            out.push_str(&format!(" - DR {}", dr));
        }
        out.push_str(&format!(" = {} damage", self.final_damage));
        out
    }
}

/// Result of the accuracy stage on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyCheck {
    #[serde(skip)]
    pub stat: AccuracyStat,
    pub accuracy: i32,
    pub d20: i32,
    pub roll_multiplier: f64,
    pub effective_accuracy: f64,
    pub evasion: i32,
    pub glance_multiplier: f64,
}

impl AccuracyCheck {
    pub fn is_miss(&self) -> bool {
        self.glance_multiplier == 0.0
    }

    pub fn outcome(&self) -> Outcome {
        if self.is_miss() {
            Outcome::Miss
        } else if self.glance_multiplier < 1.0 {
            Outcome::Glancing
        } else {
            Outcome::Hit
        }
    }
}

/// Run only the accuracy/glance stage.
pub fn check_accuracy(
    action: &CombatAction,
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    d20: i32,
) -> AccuracyCheck {
    let stat = action.accuracy_stat();
    let accuracy = match stat {
        AccuracyStat::MeleeAcc => attacker.melee_acc,
        AccuracyStat::RangedAcc => attacker.ranged_acc,
        AccuracyStat::Spellcraft => attacker.spellcraft,
    };
    let roll_multiplier = hit_roll_multiplier(d20);
    let effective_accuracy = f64::from(accuracy) * roll_multiplier;
    let glance_multiplier = evasion_multiplier(effective_accuracy, f64::from(defender.evasion));
    AccuracyCheck {
        stat,
        accuracy,
        d20,
        roll_multiplier,
        effective_accuracy,
        evasion: defender.evasion,
        glance_multiplier,
    }
}

/// Resolve one attack or cast into final damage plus its breakdown.
///
/// Pure: mana is not deducted here. For abilities the slot-adjusted amount
/// to deduct is returned in [`DamageResult::spent_effective`].
pub fn resolve(
    action: &CombatAction,
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    rolled_dice_sum: i32,
    opts: ResolveOptions,
) -> Result<DamageResult, ResolveError> {
    // Misconfiguration is rejected before anything else, even a miss.
    if let CombatAction::Ability(ability) = action {
        if ability.mana_cost <= 0 {
            return Err(ResolveError::MisconfiguredAbility {
                mana_cost: ability.mana_cost,
            });
        }
        let spend = opts.mana_spend_base.unwrap_or(ability.mana_cost);
        if spend < ability.mana_cost {
            return Err(ResolveError::SpendBelowBaseCost {
                spend,
                base: ability.mana_cost,
            });
        }
    }

    let mut breakdown = Breakdown::default();

    let mut glance = 1.0;
    if let Some(d20) = opts.d20 {
        let acc = check_accuracy(action, attacker, defender, d20);
        breakdown.push("accuracy_stat", acc.accuracy);
        breakdown.push("d20", acc.d20);
        breakdown.push("roll_multiplier", acc.roll_multiplier);
        breakdown.push("effective_accuracy", acc.effective_accuracy);
        breakdown.push("evasion", acc.evasion);
        breakdown.push("glance_multiplier", acc.glance_multiplier);
        if acc.is_miss() {
            breakdown.push("final_damage", 0);
            tracing::debug!(action = action.name(), d20, "attack missed");
            // A miss ends the action before any mana is committed.
            return Ok(DamageResult {
                final_damage: 0,
                outcome: Outcome::Miss,
                spent_effective: None,
                breakdown,
            });
        }
        glance = acc.glance_multiplier;
    }

    let flat_bonus = action.damage().flat_bonus;
    let base = rolled_dice_sum.saturating_add(flat_bonus);
    breakdown.push("dice_roll", rolled_dice_sum);
    breakdown.push("flat_bonus", flat_bonus);
    breakdown.push("base_damage", base);

    let (mut total, spent) = match action {
        CombatAction::Item(item) => (item_total(item, attacker, base, &mut breakdown), None),
        CombatAction::Ability(ability) => {
            let spend = opts.mana_spend_base.unwrap_or(ability.mana_cost);
            let (total, spent) = ability_total(ability, attacker, base, spend, &mut breakdown);
            (total, Some(spent))
        }
    };

    if opts.target != TargetModifier::Normal {
        let mult = opts.target.multiplier();
        total = floor_i32(f64::from(total) * mult);
        breakdown.push("target_multiplier", mult);
    }
    if opts.critical {
        total = total.saturating_mul(2);
        breakdown.push("critical", 2);
    }
    breakdown.push("total", total);

    let after_glance = floor_i32(f64::from(total) * glance);
    breakdown.push("after_glance", after_glance);

    let dr = physical_dr(defender.phys_def);
    let final_damage = after_glance.saturating_sub(dr).max(0);
    breakdown.push("damage_reduction", dr);
    breakdown.push("final_damage", final_damage);

    tracing::debug!(
        action = action.name(),
        base,
        total,
        after_glance,
        dr,
        final_damage,
        "resolved"
    );

    Ok(DamageResult {
        final_damage,
        outcome: if glance < 1.0 {
            Outcome::Glancing
        } else {
            Outcome::Hit
        },
        spent_effective: spent,
        breakdown,
    })
}

fn item_total(
    item: &ItemAction,
    attacker: &CombatantSnapshot,
    base: i32,
    breakdown: &mut Breakdown,
) -> i32 {
    if !item.apply_bonus {
        return base;
    }
    let points = if item.is_ranged {
        attacker.precision
    } else {
        attacker.pbd
    };
    let mult = mana_density_multiplier(points);
    breakdown.push("bonus_points", points);
    breakdown.push("bonus_multiplier", mult);
    floor_i32(f64::from(base) * mult)
}

fn ability_total(
    ability: &AbilityAction,
    attacker: &CombatantSnapshot,
    base: i32,
    spend: i32,
    breakdown: &mut Breakdown,
) -> (i32, i32) {
    let mods = ability.slot.modifiers();
    let base_effective = ability.slot.effective_mana(ability.mana_cost);
    let spent_effective = ability.slot.effective_mana(spend);
    let overcast = overcast_bonus(base_effective, spent_effective, &ability.overcast);
    let md_mult = mana_density_multiplier(attacker.mana_density);

    breakdown.push("slot_damage_multiplier", mods.damage);
    breakdown.push("slot_mana_multiplier", mods.mana);
    breakdown.push("base_effective_mana", base_effective);
    breakdown.push("spent_effective_mana", spent_effective);
    breakdown.push("overcast_bonus", overcast);
    breakdown.push("mana_density_multiplier", md_mult);

    let raw = f64::from(base.saturating_add(overcast)) * mods.damage * md_mult;
    (floor_i32(raw), spent_effective)
}

fn floor_i32(x: f64) -> i32 {
    x.floor() as i32
}
