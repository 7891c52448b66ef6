use serde::{Deserialize, Serialize};

use crate::dice::DiceExpression;
use crate::scaling::OvercastConfig;

/// Ability category; trades damage output against mana efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Core,
    #[default]
    Inner,
    Outer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotModifiers {
    pub damage: f64,
    pub mana: f64,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Core, Slot::Inner, Slot::Outer];

    pub fn modifiers(self) -> SlotModifiers {
        match self {
            Slot::Core => SlotModifiers {
                damage: 1.50,
                mana: 0.75,
            },
            Slot::Inner => SlotModifiers {
                damage: 1.00,
                mana: 1.00,
            },
            Slot::Outer => SlotModifiers {
                damage: 0.75,
                mana: 2.00,
            },
        }
    }

    /// Slot-adjusted mana: `ceil(base * slot mana multiplier)`.
    pub fn effective_mana(self, base: i32) -> i32 {
        (f64::from(base) * self.modifiers().mana).ceil() as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Core => "core",
            Slot::Inner => "inner",
            Slot::Outer => "outer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAction {
    pub name: String,
    pub damage: DiceExpression,
    pub is_ranged: bool,
    pub apply_bonus: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityAction {
    pub name: String,
    pub damage: DiceExpression,
    pub mana_cost: i32,
    pub slot: Slot,
    pub overcast: OvercastConfig,
}

/// Weapon attack or ability cast. Only abilities carry overcast, and only
/// items carry the PBD/precision switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatAction {
    Item(ItemAction),
    Ability(AbilityAction),
}

/// Which attacker stat the accuracy check reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyStat {
    MeleeAcc,
    RangedAcc,
    Spellcraft,
}

impl AccuracyStat {
    pub fn label(self) -> &'static str {
        match self {
            AccuracyStat::MeleeAcc => "Melee Acc",
            AccuracyStat::RangedAcc => "Ranged Acc",
            AccuracyStat::Spellcraft => "Spellcraft",
        }
    }
}

impl CombatAction {
    pub fn name(&self) -> &str {
        match self {
            CombatAction::Item(item) => &item.name,
            CombatAction::Ability(ability) => &ability.name,
        }
    }

    pub fn damage(&self) -> &DiceExpression {
        match self {
            CombatAction::Item(item) => &item.damage,
            CombatAction::Ability(ability) => &ability.damage,
        }
    }

    pub fn accuracy_stat(&self) -> AccuracyStat {
        match self {
            CombatAction::Ability(_) => AccuracyStat::Spellcraft,
            CombatAction::Item(item) if item.is_ranged => AccuracyStat::RangedAcc,
            CombatAction::Item(_) => AccuracyStat::MeleeAcc,
        }
    }

    /// Label shown in action pickers, e.g. `Longbow  (Item:Ranged)`.
    pub fn display(&self) -> String {
        match self {
            CombatAction::Item(item) => format!(
                "{}  (Item:{})",
                item.name,
                if item.is_ranged { "Ranged" } else { "Melee" }
            ),
            CombatAction::Ability(ability) => {
                format!("{}  (Ability:{})", ability.name, ability.slot.as_str())
            }
        }
    }
}

/// Mana allocated to a cast, in base (pre-slot) units.
pub struct ManaSpend;

impl ManaSpend {
    /// Raise an under-allocated spend to the ability's base cost.
    ///
    /// [`crate::resolve::resolve`] rejects spends below base; callers that
    /// want the forgiving behaviour (sweeps, quick rolls) normalize first.
    pub fn normalize(spend: i32, base_cost: i32) -> i32 {
        spend.max(base_cost)
    }
}
