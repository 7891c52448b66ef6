//! Character sheet documents as they are stored on disk.
//!
//! Records are deliberately loose: every field is optional and coerced, and
//! an item or ability may be stored as a bare name. The `to_action` and
//! `into_character` factories are the only way records reach the resolver,
//! and they always produce a usable typed value.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::action::{AbilityAction, CombatAction, ItemAction, Slot};
use crate::coerce::{int_or, lenient};
use crate::combatant::{Character, StatKey, Stats};
use crate::dice;
use crate::ledger::ResourceState;
use crate::scaling::{OvercastConfig, DEFAULT_OVERCAST_CAP, DEFAULT_OVERCAST_POWER};

const FRESH_HP: i32 = 20;
const FRESH_MANA: i32 = 10;

fn roll_type_none() -> String {
    "None".to_string()
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub favorite: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub roll_type: String,
    #[serde(deserialize_with = "lenient::text")]
    pub damage: String,
    #[serde(deserialize_with = "lenient::text")]
    pub notes: String,
    /// Add PBD (melee) or precision (ranged) on top of the dice.
    #[serde(alias = "apply_pbd", deserialize_with = "lenient::flag_true")]
    pub apply_bonus: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_ranged: bool,
}

impl Default for ItemRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            favorite: false,
            roll_type: roll_type_none(),
            damage: String::new(),
            notes: String::new(),
            apply_bonus: yes(),
            is_ranged: false,
        }
    }
}

impl ItemRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn to_action(&self) -> CombatAction {
        CombatAction::Item(ItemAction {
            name: self.name.trim().to_string(),
            damage: dice::parse_or_default(&self.damage),
            is_ranged: self.is_ranged,
            apply_bonus: self.apply_bonus,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvercastRecord {
    #[serde(deserialize_with = "lenient::flag")]
    pub enabled: bool,
    #[serde(deserialize_with = "lenient::int")]
    pub scale: i32,
    #[serde(deserialize_with = "lenient::float")]
    pub power: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub cap: Option<i32>,
}

impl Default for OvercastRecord {
    fn default() -> Self {
        Self {
            enabled: false,
            scale: 0,
            power: Some(DEFAULT_OVERCAST_POWER),
            cap: Some(DEFAULT_OVERCAST_CAP),
        }
    }
}

impl OvercastConfig {
    /// A missing or non-positive power falls back to 0.85. A missing,
    /// non-numeric or zero cap falls back to 999; a stored 0 means unset.
    /// Scale below zero reads as zero.
    pub fn from_record(rec: &OvercastRecord) -> Self {
        let power = rec
            .power
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(DEFAULT_OVERCAST_POWER);
        Self {
            enabled: rec.enabled,
            scale: rec.scale.max(0),
            power,
            cap: rec
                .cap
                .filter(|cap| *cap != 0)
                .unwrap_or(DEFAULT_OVERCAST_CAP),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub favorite: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub roll_type: String,
    #[serde(deserialize_with = "lenient::text")]
    pub damage: String,
    #[serde(deserialize_with = "lenient::int")]
    pub mana_cost: i32,
    #[serde(deserialize_with = "lenient::text")]
    pub notes: String,
    #[serde(deserialize_with = "block")]
    pub overcast: OvercastRecord,
}

impl Default for AbilityRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            favorite: false,
            roll_type: roll_type_none(),
            damage: String::new(),
            mana_cost: 0,
            notes: String::new(),
            overcast: OvercastRecord::default(),
        }
    }
}

impl AbilityRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The mana cost is carried as stored; the resolver refuses abilities
    /// whose cost is not positive.
    pub fn to_action(&self, slot: Slot) -> CombatAction {
        CombatAction::Ability(AbilityAction {
            name: self.name.trim().to_string(),
            damage: dice::parse_or_default(&self.damage),
            mana_cost: self.mana_cost,
            slot,
            overcast: OvercastConfig::from_record(&self.overcast),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolRecord {
    #[serde(deserialize_with = "lenient::int")]
    pub current: i32,
    #[serde(deserialize_with = "lenient::int")]
    pub max: i32,
}

impl PoolRecord {
    fn full(max: i32) -> Self {
        Self { current: max, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesRecord {
    #[serde(deserialize_with = "block")]
    pub hp: PoolRecord,
    #[serde(deserialize_with = "block")]
    pub mana: PoolRecord,
    #[serde(deserialize_with = "lenient::int")]
    pub pbd: i32,
    #[serde(deserialize_with = "lenient::int")]
    pub mana_density: i32,
    #[serde(deserialize_with = "lenient::int")]
    pub unspent_points: i32,
}

impl Default for ResourcesRecord {
    fn default() -> Self {
        Self {
            hp: PoolRecord::full(FRESH_HP),
            mana: PoolRecord::full(FRESH_MANA),
            pbd: 0,
            mana_density: 0,
            unspent_points: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryRecord {
    #[serde(deserialize_with = "item_list")]
    pub equipment: Vec<ItemRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitiesRecord {
    #[serde(deserialize_with = "ability_list")]
    pub core: Vec<AbilityRecord>,
    #[serde(deserialize_with = "ability_list")]
    pub inner: Vec<AbilityRecord>,
    #[serde(deserialize_with = "ability_list")]
    pub outer: Vec<AbilityRecord>,
}

impl AbilitiesRecord {
    pub fn slot(&self, slot: Slot) -> &[AbilityRecord] {
        match slot {
            Slot::Core => &self.core,
            Slot::Inner => &self.inner,
            Slot::Outer => &self.outer,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    /// Kept in file order so a rewritten sheet diffs cleanly.
    #[serde(deserialize_with = "block")]
    pub stats: IndexMap<String, Value>,
    #[serde(deserialize_with = "block")]
    pub resources: ResourcesRecord,
    #[serde(deserialize_with = "block")]
    pub inventory: InventoryRecord,
    #[serde(deserialize_with = "block")]
    pub abilities: AbilitiesRecord,
}

impl CharacterRecord {
    /// Equipment first, then abilities in core, inner, outer order. Entries
    /// without a name are not actions.
    pub fn actions(&self) -> Vec<CombatAction> {
        let items = self
            .inventory
            .equipment
            .iter()
            .filter(|it| !it.name.trim().is_empty())
            .map(ItemRecord::to_action);
        let abilities = Slot::ALL.into_iter().flat_map(|slot| {
            self.abilities
                .slot(slot)
                .iter()
                .filter(|ab| !ab.name.trim().is_empty())
                .map(move |ab| ab.to_action(slot))
        });
        items.chain(abilities).collect()
    }

    pub fn stat(&self, key: StatKey) -> i32 {
        self.stats.get(key.key()).map_or(0, |v| int_or(v, 0))
    }

    pub fn into_character(self) -> Character {
        let mut stats = Stats::default();
        for key in StatKey::ALL {
            *stats.get_mut(key) = self.stat(key);
        }

        let res = &self.resources;
        let pbd = if res.pbd != 0 {
            res.pbd
        } else {
            self.stats.get("pbd").map_or(0, |v| int_or(v, 0))
        };
        let resources = ResourceState::from_parts(
            (res.hp.current, res.hp.max),
            (res.mana.current, res.mana.max),
            pbd,
            res.mana_density,
            res.unspent_points,
        );

        let actions = self.actions();
        let name = match self.name.trim() {
            "" => "Unnamed".to_string(),
            n => n.to_string(),
        };
        Character {
            name,
            stats,
            resources,
            actions,
        }
    }
}

/// Nested object; a value of any other shape reads as the default block.
fn block<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(d)? {
        v @ Value::Object(_) => serde_json::from_value(v).unwrap_or_default(),
        _ => T::default(),
    })
}

fn item_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ItemRecord>, D::Error> {
    Ok(entries(Value::deserialize(d)?, ItemRecord::named))
}

fn ability_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<AbilityRecord>, D::Error> {
    Ok(entries(Value::deserialize(d)?, AbilityRecord::named))
}

/// A bare string entry is a name-only record; anything else that is not an
/// object becomes an unnamed record and is skipped by `actions()`.
fn entries<T>(list: Value, named: impl Fn(String) -> T) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    let Value::Array(list) = list else {
        return Vec::new();
    };
    list.into_iter()
        .map(|entry| match entry {
            Value::String(name) => named(name),
            v @ Value::Object(_) => serde_json::from_value(v).unwrap_or_default(),
            _ => T::default(),
        })
        .collect()
}
