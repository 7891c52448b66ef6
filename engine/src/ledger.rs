//! HP and mana bookkeeping for one character.
//!
//! Every mutation of [`ResourceState`] outside of point spending goes through
//! the functions here, which keep `0 <= current <= max` and write a tagged
//! line to the caller's combat log.

use serde::Serialize;

use crate::error::LedgerError;
use crate::scaling::physical_dr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceState {
    pub(crate) hp_current: i32,
    pub(crate) hp_max: i32,
    pub(crate) mana_current: i32,
    pub(crate) mana_max: i32,
    pub(crate) pbd: i32,
    pub(crate) mana_density: i32,
    pub(crate) unspent_points: i32,
}

impl ResourceState {
    /// Fresh sheet: full HP and mana, no growth.
    pub fn new(hp_max: i32, mana_max: i32) -> Self {
        let hp_max = hp_max.max(0);
        let mana_max = mana_max.max(0);
        Self {
            hp_current: hp_max,
            hp_max,
            mana_current: mana_max,
            mana_max,
            pbd: 0,
            mana_density: 0,
            unspent_points: 0,
        }
    }

    /// Build from stored values, clamping currents into `[0, max]`.
    pub fn from_parts(
        hp: (i32, i32),
        mana: (i32, i32),
        pbd: i32,
        mana_density: i32,
        unspent_points: i32,
    ) -> Self {
        let hp_max = hp.1.max(0);
        let mana_max = mana.1.max(0);
        Self {
            hp_current: hp.0.clamp(0, hp_max),
            hp_max,
            mana_current: mana.0.clamp(0, mana_max),
            mana_max,
            pbd: pbd.max(0),
            mana_density: mana_density.max(0),
            unspent_points: unspent_points.max(0),
        }
    }

    pub fn with_pbd(mut self, pbd: i32) -> Self {
        self.pbd = pbd.max(0);
        self
    }

    pub fn with_mana_density(mut self, mana_density: i32) -> Self {
        self.mana_density = mana_density.max(0);
        self
    }

    pub fn with_unspent_points(mut self, points: i32) -> Self {
        self.unspent_points = points.max(0);
        self
    }

    pub fn hp_current(&self) -> i32 {
        self.hp_current
    }

    pub fn hp_max(&self) -> i32 {
        self.hp_max
    }

    pub fn mana_current(&self) -> i32 {
        self.mana_current
    }

    pub fn mana_max(&self) -> i32 {
        self.mana_max
    }

    pub fn pbd(&self) -> i32 {
        self.pbd
    }

    pub fn mana_density(&self) -> i32 {
        self.mana_density
    }

    pub fn unspent_points(&self) -> i32 {
        self.unspent_points
    }

    pub fn is_down(&self) -> bool {
        self.hp_current == 0
    }
}

/// Subtract `amount` from current HP. Returns the HP actually lost.
pub fn apply_damage(
    name: &str,
    state: &mut ResourceState,
    amount: i32,
    mut log: impl FnMut(String),
) -> i32 {
    let before = state.hp_current;
    state.hp_current = before.saturating_sub(amount).clamp(0, state.hp_max);
    log(format!(
        "[DMG][{}] {} → {} (−{})",
        name, before, state.hp_current, amount
    ));
    before - state.hp_current
}

/// Add `amount` to current HP, never past max. Returns the HP actually gained.
pub fn apply_heal(
    name: &str,
    state: &mut ResourceState,
    amount: i32,
    mut log: impl FnMut(String),
) -> i32 {
    let before = state.hp_current;
    state.hp_current = before.saturating_add(amount).clamp(0, state.hp_max);
    log(format!(
        "[HEAL][{}] +{} HP ({} → {})",
        name, amount, before, state.hp_current
    ));
    state.hp_current - before
}

/// Deduct slot-adjusted mana. Leaves `state` untouched on failure.
pub fn spend_mana(
    name: &str,
    state: &mut ResourceState,
    effective_amount: i32,
    mut log: impl FnMut(String),
) -> Result<(), LedgerError> {
    if effective_amount > state.mana_current {
        tracing::debug!(
            name,
            have = state.mana_current,
            need = effective_amount,
            "mana spend refused"
        );
        return Err(LedgerError::InsufficientMana {
            have: state.mana_current,
            need: effective_amount,
        });
    }
    let before = state.mana_current;
    state.mana_current = (before - effective_amount).clamp(0, state.mana_max);
    log(format!(
        "[MANA][{}] −{} ({} → {})",
        name, effective_amount, before, state.mana_current
    ));
    Ok(())
}

/// Restore HP and mana to their maximums.
pub fn long_rest(name: &str, state: &mut ResourceState, mut log: impl FnMut(String)) {
    state.hp_current = state.hp_max;
    state.mana_current = state.mana_max;
    log(format!(
        "[REST][{}] HP {}/{} Mana {}/{}",
        name, state.hp_current, state.hp_max, state.mana_current, state.mana_max
    ));
}

/// Apply a raw incoming hit after the defender's own physical-defense DR.
/// Returns the damage that got through.
pub fn apply_incoming_hit(
    name: &str,
    state: &mut ResourceState,
    incoming: i32,
    phys_def: i32,
    mut log: impl FnMut(String),
) -> i32 {
    let dr = physical_dr(phys_def);
    let through = (incoming - dr).max(0);
    log(format!(
        "[HIT][{}] {} - DR {} = {}",
        name, incoming, dr, through
    ));
    apply_damage(name, state, through, &mut log);
    through
}
