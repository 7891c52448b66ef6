use serde::{Deserialize, Serialize};

use crate::curve::MAX_BONUS_FACTOR;
use crate::dice::DiceExpression;

pub const DEFAULT_OVERCAST_POWER: f64 = 0.85;
pub const DEFAULT_OVERCAST_CAP: i32 = 999;

/// Bonus damage for spending mana above an ability's base cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvercastConfig {
    pub enabled: bool,
    pub scale: i32,
    pub power: f64,
    /// Upper bound on the bonus; a negative cap means uncapped.
    pub cap: i32,
}

impl Default for OvercastConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scale: 0,
            power: DEFAULT_OVERCAST_POWER,
            cap: DEFAULT_OVERCAST_CAP,
        }
    }
}

/// Damage multiplier for mana density, PBD and precision points.
///
/// Linear up to 100 points (1.0x → 2.0x), then `2 + log100(points / 100)`:
/// 10 000 points is 3.0x, 1 000 000 is 4.0x. Negative points count as zero.
pub fn mana_density_multiplier(points: i32) -> f64 {
    let p = f64::from(points.max(0));
    if p <= 100.0 {
        1.0 + p / 100.0
    } else {
        2.0 + (p / 100.0).ln() / 100f64.ln()
    }
}

/// `floor(scale * log2(spent / base)^power)`, clamped to `[0, cap]`.
pub fn overcast_bonus(base_effective: i32, spent_effective: i32, cfg: &OvercastConfig) -> i32 {
    if base_effective <= 0 || spent_effective <= base_effective {
        return 0;
    }
    if !cfg.enabled || cfg.scale <= 0 {
        return 0;
    }
    let ratio = f64::from(spent_effective) / f64::from(base_effective);
    let x = ratio.log2();
    let mut bonus = (f64::from(cfg.scale) * x.powf(cfg.power)).floor() as i32;
    if cfg.cap >= 0 {
        bonus = bonus.min(cfg.cap);
    }
    bonus.max(0)
}

/// Flat damage reduction: one point per five physical-defense points.
pub fn physical_dr(points: i32) -> i32 {
    points.div_euclid(5).max(0)
}

pub fn max_bonus_factor_for_die(die_size: i32) -> f64 {
    MAX_BONUS_FACTOR.at(f64::from(die_size))
}

/// Additive PBD/precision bonus used by the older sheet's item roller.
///
/// The bonus grows with how close the roll came to the die's maximum and with
/// the die size: `floor(points * clamp(rolled / max_roll, 0, 1) * factor)`.
pub fn additive_item_bonus(points: i32, rolled: i32, dice: &DiceExpression) -> i32 {
    let max_roll = dice.max_roll().max(1);
    let pct = (f64::from(rolled) / f64::from(max_roll)).clamp(0.0, 1.0);
    let add = f64::from(points) * pct * max_bonus_factor_for_die(dice.size);
    add.trunc() as i32
}
