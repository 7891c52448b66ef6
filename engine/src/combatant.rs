use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::CombatAction;
use crate::ledger::ResourceState;

/// Raw character stats, in sheet display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    MeleeAcc,
    RangedAcc,
    Spellcraft,
    Precision,
    PhysDef,
    Evasion,
    WisDef,
    Utility,
    Agility,
    Strength,
}

impl StatKey {
    pub const ALL: [StatKey; 10] = [
        StatKey::MeleeAcc,
        StatKey::RangedAcc,
        StatKey::Spellcraft,
        StatKey::Precision,
        StatKey::PhysDef,
        StatKey::Evasion,
        StatKey::WisDef,
        StatKey::Utility,
        StatKey::Agility,
        StatKey::Strength,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StatKey::MeleeAcc => "melee_acc",
            StatKey::RangedAcc => "ranged_acc",
            StatKey::Spellcraft => "spellcraft",
            StatKey::Precision => "precision",
            StatKey::PhysDef => "phys_def",
            StatKey::Evasion => "evasion",
            StatKey::WisDef => "wis_def",
            StatKey::Utility => "utility",
            StatKey::Agility => "agility",
            StatKey::Strength => "strength",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatKey::MeleeAcc => "Melee Accuracy",
            StatKey::RangedAcc => "Ranged Weapon Accuracy",
            StatKey::Spellcraft => "Spellcraft",
            StatKey::Precision => "Precision",
            StatKey::PhysDef => "Defense",
            StatKey::Evasion => "Evasion",
            StatKey::WisDef => "Wisdom",
            StatKey::Utility => "Utility",
            StatKey::Agility => "Agility",
            StatKey::Strength => "Strength",
        }
    }
}

impl FromStr for StatKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StatKey::ALL
            .into_iter()
            .find(|k| k.key() == wanted)
            .ok_or(())
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub melee_acc: i32,
    pub ranged_acc: i32,
    pub spellcraft: i32,
    pub precision: i32,
    pub phys_def: i32,
    pub evasion: i32,
    pub wis_def: i32,
    pub utility: i32,
    pub agility: i32,
    pub strength: i32,
}

impl Stats {
    pub fn get(&self, key: StatKey) -> i32 {
        match key {
            StatKey::MeleeAcc => self.melee_acc,
            StatKey::RangedAcc => self.ranged_acc,
            StatKey::Spellcraft => self.spellcraft,
            StatKey::Precision => self.precision,
            StatKey::PhysDef => self.phys_def,
            StatKey::Evasion => self.evasion,
            StatKey::WisDef => self.wis_def,
            StatKey::Utility => self.utility,
            StatKey::Agility => self.agility,
            StatKey::Strength => self.strength,
        }
    }

    pub fn get_mut(&mut self, key: StatKey) -> &mut i32 {
        match key {
            StatKey::MeleeAcc => &mut self.melee_acc,
            StatKey::RangedAcc => &mut self.ranged_acc,
            StatKey::Spellcraft => &mut self.spellcraft,
            StatKey::Precision => &mut self.precision,
            StatKey::PhysDef => &mut self.phys_def,
            StatKey::Evasion => &mut self.evasion,
            StatKey::WisDef => &mut self.wis_def,
            StatKey::Utility => &mut self.utility,
            StatKey::Agility => &mut self.agility,
            StatKey::Strength => &mut self.strength,
        }
    }
}

/// The stats one resolution reads from each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantSnapshot {
    pub melee_acc: i32,
    pub ranged_acc: i32,
    pub spellcraft: i32,
    pub precision: i32,
    pub pbd: i32,
    pub phys_def: i32,
    pub evasion: i32,
    pub mana_density: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    pub name: String,
    pub stats: Stats,
    pub resources: ResourceState,
    pub actions: Vec<CombatAction>,
}

impl Character {
    pub fn new(name: impl Into<String>, stats: Stats, resources: ResourceState) -> Self {
        Self {
            name: name.into(),
            stats,
            resources,
            actions: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            melee_acc: self.stats.melee_acc,
            ranged_acc: self.stats.ranged_acc,
            spellcraft: self.stats.spellcraft,
            precision: self.stats.precision,
            pbd: self.resources.pbd(),
            phys_def: self.stats.phys_def,
            evasion: self.stats.evasion,
            mana_density: self.resources.mana_density(),
        }
    }

    /// Case-insensitive lookup by action name.
    pub fn find_action(&self, name: &str) -> Option<&CombatAction> {
        self.actions
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(name.trim()))
    }
}
