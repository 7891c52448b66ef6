use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::combatant::{Character, StatKey, Stats};
use crate::error::SpendError;
use crate::ledger::ResourceState;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendTarget {
    Hp,
    Mana,
    Pbd,
    ManaDensity,
    Stat(StatKey),
}

impl FromStr for SpendTarget {
    type Err = SpendError;

    /// `hp`, `mana`, `pbd`, `mana_density` or `stat:<key>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        match id.as_str() {
            "hp" => Ok(SpendTarget::Hp),
            "mana" => Ok(SpendTarget::Mana),
            "pbd" => Ok(SpendTarget::Pbd),
            "mana_density" => Ok(SpendTarget::ManaDensity),
            _ => id
                .strip_prefix("stat:")
                .and_then(|k| k.parse::<StatKey>().ok())
                .map(SpendTarget::Stat)
                .ok_or_else(|| SpendError::UnknownTarget(s.to_string())),
        }
    }
}

impl fmt::Display for SpendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpendTarget::Hp => f.write_str("HP"),
            SpendTarget::Mana => f.write_str("Mana"),
            SpendTarget::Pbd => f.write_str("PBD"),
            SpendTarget::ManaDensity => f.write_str("Mana Density"),
            SpendTarget::Stat(key) => f.write_str(key.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpendOutcome {
    /// Points consumed from the budget, never more than the budget.
    pub spent: i32,
    /// Units added to the target.
    pub gained: i32,
}

/// Convert up to `budget` growth points into `target`.
///
/// Tiered targets buy whole steps greedily and stop as soon as the next step
/// would overrun the budget, so `spent` can be less than `budget`. The
/// character's `unspent_points` is not read or written here.
pub fn spend(
    tuning: &Tuning,
    resources: &mut ResourceState,
    stats: &mut Stats,
    target: SpendTarget,
    budget: i32,
) -> SpendOutcome {
    if budget <= 0 {
        return SpendOutcome::default();
    }

    let outcome = match target {
        SpendTarget::Hp => {
            let hp = tuning.hp;
            let out = tiered(
                &mut resources.hp_max,
                budget,
                hp.soft_cap,
                (1, hp.gain_before_cap),
                (1, hp.gain_after_cap),
            );
            resources.hp_current = resources
                .hp_current
                .saturating_add(out.gained)
                .clamp(0, resources.hp_max);
            out
        }
        SpendTarget::Mana => {
            let mana = tuning.mana;
            let out = tiered(
                &mut resources.mana_max,
                budget,
                mana.soft_cap,
                (mana.cost_before_cap, mana.gain_before_cap),
                (mana.cost_after_cap, mana.gain_after_cap),
            );
            resources.mana_current = resources
                .mana_current
                .saturating_add(out.gained)
                .clamp(0, resources.mana_max);
            out
        }
        SpendTarget::Pbd => {
            let pbd = tuning.pbd;
            tiered(
                &mut resources.pbd,
                budget,
                pbd.soft_cap,
                (pbd.cost_before_cap, pbd.gain_before_cap),
                (pbd.cost_after_cap, pbd.gain_after_cap),
            )
        }
        SpendTarget::ManaDensity => flat(&mut resources.mana_density, budget),
        SpendTarget::Stat(key) => flat(stats.get_mut(key), budget),
    };

    tracing::debug!(
        %target,
        budget,
        spent = outcome.spent,
        gained = outcome.gained,
        "points spent"
    );
    outcome
}

/// Greedy two-tier purchase: `(cost, gain)` steps at the `before` rate
/// while `value` is under `cap`, then at the `after` rate. Stops at the first
/// step that costs more than the points left. Steps are counted in one jump
/// per tier.
fn tiered(
    value: &mut i32,
    budget: i32,
    cap: i32,
    before: (i32, i32),
    after: (i32, i32),
) -> SpendOutcome {
    let mut out = SpendOutcome::default();

    if *value < cap {
        let (cost, gain) = before;
        if cost <= 0 {
            return out;
        }
        let to_cap = if gain > 0 {
            let gap = i64::from(cap) - i64::from(*value);
            (gap + i64::from(gain) - 1) / i64::from(gain)
        } else {
            i64::MAX
        };
        let affordable = i64::from(budget / cost);
        buy(value, &mut out, to_cap.min(affordable) as i32, cost, gain);
        if *value < cap {
            return out;
        }
    }

    let (cost, gain) = after;
    if cost > 0 {
        let steps = (budget - out.spent) / cost;
        buy(value, &mut out, steps, cost, gain);
    }
    out
}

fn buy(value: &mut i32, out: &mut SpendOutcome, steps: i32, cost: i32, gain: i32) {
    if steps <= 0 {
        return;
    }
    let old = *value;
    *value = old.saturating_add(steps.saturating_mul(gain)).max(0);
    out.spent += steps * cost;
    out.gained = out.gained.saturating_add(value.saturating_sub(old));
}

/// One point per unit, whole budget in one step.
fn flat(value: &mut i32, budget: i32) -> SpendOutcome {
    let old = *value;
    *value = old.saturating_add(budget);
    SpendOutcome {
        spent: budget,
        gained: value.saturating_sub(old),
    }
}

impl Character {
    /// Spend from the character's own unspent pool.
    ///
    /// `amount` is capped at `unspent_points`; whatever the engine actually
    /// consumed is deducted afterwards.
    pub fn spend_unspent(
        &mut self,
        tuning: &Tuning,
        target: SpendTarget,
        amount: i32,
    ) -> SpendOutcome {
        let budget = amount.min(self.resources.unspent_points);
        let outcome = spend(tuning, &mut self.resources, &mut self.stats, target, budget);
        self.resources.unspent_points -= outcome.spent;
        outcome
    }
}
