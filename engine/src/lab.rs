//! Deterministic damage sweeps for tuning actions.
//!
//! Every sweep runs the real resolver with the accuracy stage switched off,
//! so the numbers match what a hit would do at the table.

use serde::Serialize;

use crate::action::{AbilityAction, CombatAction, ItemAction, ManaSpend};
use crate::combatant::CombatantSnapshot;
use crate::dice::DiceExpression;
use crate::error::ResolveError;
use crate::resolve::{resolve, ResolveOptions};
use crate::scaling::additive_item_bonus;

/// Largest dice sum the exact distribution is computed for.
pub const MAX_DISTRIBUTION_SUM: i32 = 4000;

/// Which dice sum a mana sweep holds fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollProfile {
    #[default]
    Average,
    Max,
    Custom(i32),
}

impl RollProfile {
    pub fn roll(self, dice: &DiceExpression) -> i32 {
        match self {
            RollProfile::Average => dice.average_roll(),
            RollProfile::Max => dice.max_roll(),
            RollProfile::Custom(sum) => sum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepPoint {
    pub x: i32,
    pub damage: i32,
}

/// Damage for every dice sum from 0 to the expression's maximum.
///
/// Abilities spend `opts.mana_spend_base` raised to at least their base cost.
pub fn damage_vs_roll(
    action: &CombatAction,
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    opts: ResolveOptions,
) -> Result<Vec<SweepPoint>, ResolveError> {
    let opts = sweep_options(action, opts);
    let max_roll = action.damage().max_roll().max(1);
    (0..=max_roll)
        .map(|sum| {
            let res = resolve(action, attacker, defender, sum, opts)?;
            Ok(SweepPoint {
                x: sum,
                damage: res.final_damage,
            })
        })
        .collect()
}

/// Damage for every base-unit spend from the ability's cost up to
/// `cost * max_multiple` (at least 1x), with the dice sum fixed by `roll`.
pub fn damage_vs_mana(
    ability: &AbilityAction,
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    roll: RollProfile,
    max_multiple: i32,
    opts: ResolveOptions,
) -> Result<Vec<SweepPoint>, ResolveError> {
    let base = ability.mana_cost;
    if base <= 0 {
        return Err(ResolveError::MisconfiguredAbility { mana_cost: base });
    }
    let action = CombatAction::Ability(ability.clone());
    let rolled = roll.roll(&ability.damage);
    let top = base.saturating_mul(max_multiple.max(1));
    (base..=top)
        .map(|spend| {
            let opts = ResolveOptions {
                d20: None,
                mana_spend_base: Some(spend),
                ..opts
            };
            let res = resolve(&action, attacker, defender, rolled, opts)?;
            Ok(SweepPoint {
                x: spend,
                damage: res.final_damage,
            })
        })
        .collect()
}

/// The older sheet's item roller for every dice sum: `base` plus the
/// additive PBD/precision bonus. No multiplier, glance or DR applies.
pub fn additive_vs_roll(item: &ItemAction, attacker: &CombatantSnapshot) -> Vec<SweepPoint> {
    let points = if item.is_ranged {
        attacker.precision
    } else {
        attacker.pbd
    };
    let dice = &item.damage;
    (0..=dice.max_roll().max(1))
        .map(|sum| {
            let base = sum.saturating_add(dice.flat_bonus);
            let add = if item.apply_bonus {
                additive_item_bonus(points, sum, dice)
            } else {
                0
            };
            SweepPoint {
                x: sum,
                damage: base.saturating_add(add),
            }
        })
        .collect()
}

/// Exact probability of each dice sum, ascending from `count` to
/// `count * size`.
///
/// `None` for non-positive dice or when the maximum sum exceeds
/// [`MAX_DISTRIBUTION_SUM`].
pub fn sum_distribution(dice: &DiceExpression) -> Option<Vec<(i32, f64)>> {
    if dice.count <= 0 || dice.size <= 0 {
        return None;
    }
    let max_sum = dice.count.checked_mul(dice.size)?;
    if max_sum > MAX_DISTRIBUTION_SUM {
        return None;
    }

    let face = 1.0 / f64::from(dice.size);
    let size = dice.size as usize;
    // ways[s] holds P(sum == s) after each die is added.
    let mut ways = vec![0.0_f64; max_sum as usize + 1];
    ways[0] = 1.0;
    for rolled in 0..dice.count as usize {
        let mut next = vec![0.0_f64; ways.len()];
        let reach = rolled * size;
        for (s, p) in ways.iter().enumerate().take(reach + 1) {
            if *p == 0.0 {
                continue;
            }
            for f in 1..=size {
                next[s + f] += p * face;
            }
        }
        ways = next;
    }

    Some(
        ways.into_iter()
            .enumerate()
            .skip(dice.count as usize)
            .map(|(s, p)| (s as i32, p))
            .collect(),
    )
}

/// Probability-weighted mean of the final damage over all dice sums.
///
/// `Ok(None)` when the distribution is too large to enumerate.
pub fn expected_damage(
    action: &CombatAction,
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    opts: ResolveOptions,
) -> Result<Option<f64>, ResolveError> {
    let Some(dist) = sum_distribution(action.damage()) else {
        tracing::debug!(action = action.name(), "dice too large for exact expectation");
        return Ok(None);
    };
    let opts = sweep_options(action, opts);
    let mut mean = 0.0;
    for (sum, p) in dist {
        let res = resolve(action, attacker, defender, sum, opts)?;
        mean += p * f64::from(res.final_damage);
    }
    Ok(Some(mean))
}

fn sweep_options(action: &CombatAction, opts: ResolveOptions) -> ResolveOptions {
    let mana_spend_base = match action {
        CombatAction::Ability(ab) => Some(ManaSpend::normalize(
            opts.mana_spend_base.unwrap_or(ab.mana_cost),
            ab.mana_cost,
        )),
        CombatAction::Item(_) => None,
    };
    ResolveOptions {
        d20: None,
        mana_spend_base,
        ..opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_of_2d6_peaks_at_seven() {
        let dist = sum_distribution(&DiceExpression::new(2, 6, 0).unwrap()).unwrap();
        assert_eq!(dist.len(), 11);
        assert_eq!(dist.first().map(|d| d.0), Some(2));
        let (peak, p) = dist
            .iter()
            .copied()
            .fold((0, 0.0), |best, d| if d.1 > best.1 { d } else { best });
        assert_eq!(peak, 7);
        assert!((p - 6.0 / 36.0).abs() < 1e-12);
        let total: f64 = dist.iter().map(|d| d.1).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_dice_are_refused() {
        assert!(sum_distribution(&DiceExpression::new(500, 100, 0).unwrap()).is_none());
    }
}
