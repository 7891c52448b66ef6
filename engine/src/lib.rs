//! Combat math for a mana-driven character sheet: dice parsing, the damage
//! resolution pipeline, resource bookkeeping and point spending.
//!
//! Everything outside [`api`] is pure and synchronous.

pub mod action;
pub mod api;
pub mod coerce;
pub mod combatant;
pub mod content;
pub mod curve;
pub mod dice;
pub mod error;
pub mod lab;
pub mod ledger;
pub mod points;
pub mod record;
pub mod resolve;
pub mod scaling;
pub mod tuning;

pub use action::{AbilityAction, AccuracyStat, CombatAction, ItemAction, ManaSpend, Slot};
pub use combatant::{Character, CombatantSnapshot, StatKey, Stats};
pub use dice::DiceExpression;
pub use error::{LedgerError, ResolveError, SpendError, TuningError};
pub use ledger::ResourceState;
pub use points::{spend, SpendOutcome, SpendTarget};
pub use resolve::{
    check_accuracy, resolve, AccuracyCheck, Breakdown, DamageResult, Outcome, ResolveOptions,
    TargetModifier,
};
pub use scaling::OvercastConfig;
pub use tuning::Tuning;
