//! Growth-point cost schedules.
//!
//! Two PBD tunings exist for the same sheet: the tier-1 rules (soft cap 100,
//! 1 point per PBD before the cap) and the older legacy rules (soft cap 15,
//! 3 points per PBD before the cap). Both are named here and neither is the
//! implicit default of the spend engine; callers pick one.

use serde::Deserialize;

use crate::error::TuningError;

/// HP: one point per step; gain drops once max HP reaches the soft cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HpSchedule {
    pub soft_cap: i32,
    pub gain_before_cap: i32,
    pub gain_after_cap: i32,
}

/// Mana: `(cost, gain)` pair switches once max mana reaches the soft cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ManaSchedule {
    pub soft_cap: i32,
    pub cost_before_cap: i32,
    pub gain_before_cap: i32,
    pub cost_after_cap: i32,
    pub gain_after_cap: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PbdSchedule {
    pub soft_cap: i32,
    pub cost_before_cap: i32,
    pub gain_before_cap: i32,
    pub cost_after_cap: i32,
    pub gain_after_cap: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
    pub hp: HpSchedule,
    pub mana: ManaSchedule,
    pub pbd: PbdSchedule,
}

impl HpSchedule {
    pub const TIER1: HpSchedule = HpSchedule {
        soft_cap: 100,
        gain_before_cap: 2,
        gain_after_cap: 1,
    };
}

impl ManaSchedule {
    pub const TIER1: ManaSchedule = ManaSchedule {
        soft_cap: 50,
        cost_before_cap: 1,
        gain_before_cap: 1,
        cost_after_cap: 3,
        gain_after_cap: 2,
    };
}

impl PbdSchedule {
    pub const TIER1: PbdSchedule = PbdSchedule {
        soft_cap: 100,
        cost_before_cap: 1,
        gain_before_cap: 1,
        cost_after_cap: 5,
        gain_after_cap: 1,
    };

    pub const LEGACY: PbdSchedule = PbdSchedule {
        soft_cap: 15,
        cost_before_cap: 3,
        gain_before_cap: 1,
        cost_after_cap: 5,
        gain_after_cap: 1,
    };
}

impl Tuning {
    pub const TIER1: Tuning = Tuning {
        hp: HpSchedule::TIER1,
        mana: ManaSchedule::TIER1,
        pbd: PbdSchedule::TIER1,
    };

    pub const LEGACY: Tuning = Tuning {
        hp: HpSchedule::TIER1,
        mana: ManaSchedule::TIER1,
        pbd: PbdSchedule::LEGACY,
    };

    pub fn preset(name: &str) -> Result<Tuning, TuningError> {
        match name.trim().to_lowercase().as_str() {
            "tier1" | "t1" => Ok(Tuning::TIER1),
            "legacy" => Ok(Tuning::LEGACY),
            other => Err(TuningError::UnknownPreset(other.to_string())),
        }
    }

    /// Parse a tuning document:
    ///
    /// ```yaml
    /// preset: legacy        # required base
    /// pbd:                  # optional, replaces the preset's schedule
    ///   soft_cap: 20
    ///   cost_before_cap: 2
    ///   gain_before_cap: 1
    ///   cost_after_cap: 4
    ///   gain_after_cap: 1
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<Tuning, TuningError> {
        let doc: TuningDoc = serde_yaml::from_str(text)?;
        let mut tuning = Tuning::preset(&doc.preset)?;
        if let Some(hp) = doc.hp {
            tuning.hp = hp;
        }
        if let Some(mana) = doc.mana {
            tuning.mana = mana;
        }
        if let Some(pbd) = doc.pbd {
            tuning.pbd = pbd;
        }
        Ok(tuning)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TuningDoc {
    preset: String,
    #[serde(default)]
    hp: Option<HpSchedule>,
    #[serde(default)]
    mana: Option<ManaSchedule>,
    #[serde(default)]
    pbd: Option<PbdSchedule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_replaces_only_named_schedule() {
        let t = Tuning::from_yaml_str(
            "preset: tier1\nmana:\n  soft_cap: 10\n  cost_before_cap: 1\n  gain_before_cap: 1\n  cost_after_cap: 2\n  gain_after_cap: 1\n",
        )
        .unwrap();
        assert_eq!(t.pbd, PbdSchedule::TIER1);
        assert_eq!(t.mana.soft_cap, 10);
    }

    #[test]
    fn unknown_preset_is_reported() {
        let err = Tuning::from_yaml_str("preset: tier9").unwrap_err();
        assert!(matches!(err, TuningError::UnknownPreset(ref p) if p == "tier9"));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        assert!(matches!(
            Tuning::from_yaml_str("preset: [oops"),
            Err(TuningError::Yaml(_))
        ));
    }
}
