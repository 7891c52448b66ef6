use manasheet_engine::scaling::{
    additive_item_bonus, mana_density_multiplier, overcast_bonus, physical_dr, OvercastConfig,
};
use manasheet_engine::DiceExpression;
use proptest::prelude::*;

fn overcast(scale: i32, cap: i32) -> OvercastConfig {
    OvercastConfig {
        enabled: true,
        scale,
        power: 0.85,
        cap,
    }
}

#[test]
fn mana_density_fixed_points() {
    assert_eq!(mana_density_multiplier(0), 1.0);
    assert_eq!(mana_density_multiplier(50), 1.5);
    assert_eq!(mana_density_multiplier(100), 2.0);
    assert_eq!(mana_density_multiplier(-30), 1.0);
}

#[test]
fn mana_density_is_continuous_at_100() {
    let below = mana_density_multiplier(100);
    let above = mana_density_multiplier(101);
    assert!(above > below);
    assert!(above - below < 0.01);
}

#[test]
fn physical_dr_steps_every_five() {
    assert_eq!(physical_dr(5), 1);
    assert_eq!(physical_dr(4), 0);
    assert_eq!(physical_dr(0), 0);
    assert_eq!(physical_dr(24), 4);
}

#[test]
fn overcast_doubling_gives_scale() {
    assert_eq!(overcast_bonus(10, 20, &overcast(3, 999)), 3);
}

#[test]
fn overcast_respects_cap() {
    assert_eq!(overcast_bonus(10, 80, &overcast(50, 25)), 25);
    assert_eq!(overcast_bonus(10, 80, &overcast(50, 0)), 0);
}

#[test]
fn negative_cap_is_uncapped() {
    // log2(8) = 3, 3^0.85 ~ 2.54
    assert_eq!(overcast_bonus(10, 80, &overcast(50, -1)), 127);
}

#[test]
fn disabled_overcast_is_zero() {
    let cfg = OvercastConfig {
        enabled: false,
        ..overcast(10, 999)
    };
    assert_eq!(overcast_bonus(10, 40, &cfg), 0);
}

#[test]
fn additive_bonus_scales_with_roll() {
    let d6 = DiceExpression::new(1, 6, 0).unwrap();
    assert_eq!(additive_item_bonus(30, 0, &d6), 0);
    // 30 * 1.0 * 0.6667
    assert_eq!(additive_item_bonus(30, 6, &d6), 20);
    assert_eq!(additive_item_bonus(30, 12, &d6), 20);
}

proptest! {
    #[test]
    fn mana_density_is_monotonic(a in 0i32..2_000_000, b in 0i32..2_000_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(mana_density_multiplier(lo) <= mana_density_multiplier(hi));
    }

    #[test]
    fn overcast_zero_when_not_overspent(
        base in 1i32..500,
        under in 0i32..500,
        scale in 0i32..100,
        cap in -1i32..1000,
    ) {
        let spent = base - under;
        prop_assert_eq!(overcast_bonus(base, spent, &overcast(scale, cap)), 0);
    }

    #[test]
    fn overcast_stays_within_cap(
        base in 1i32..200,
        extra in 1i32..2000,
        scale in 0i32..100,
        cap in 0i32..1000,
    ) {
        let bonus = overcast_bonus(base, base + extra, &overcast(scale, cap));
        prop_assert!((0..=cap).contains(&bonus));
    }
}
