use manasheet_engine::scaling::OvercastConfig;
use manasheet_engine::{
    check_accuracy, resolve, AbilityAction, CombatAction, CombatantSnapshot, DiceExpression,
    ItemAction, Outcome, ResolveError, ResolveOptions, Slot, TargetModifier,
};

fn greataxe() -> CombatAction {
    CombatAction::Item(ItemAction {
        name: "Greataxe".into(),
        damage: DiceExpression::new(1, 8, 2).unwrap(),
        is_ranged: false,
        apply_bonus: true,
    })
}

fn bolt(slot: Slot, cost: i32, scale: i32) -> CombatAction {
    CombatAction::Ability(AbilityAction {
        name: "Bolt".into(),
        damage: DiceExpression::new(2, 6, 0).unwrap(),
        mana_cost: cost,
        slot,
        overcast: OvercastConfig {
            enabled: true,
            scale,
            power: 0.85,
            cap: 999,
        },
    })
}

fn fighter() -> CombatantSnapshot {
    CombatantSnapshot {
        melee_acc: 12,
        pbd: 50,
        precision: 100,
        ..Default::default()
    }
}

fn armoured() -> CombatantSnapshot {
    CombatantSnapshot {
        phys_def: 10,
        evasion: 10,
        ..Default::default()
    }
}

#[test]
fn melee_item_with_pbd_and_dr() {
    let res = resolve(&greataxe(), &fighter(), &armoured(), 6, ResolveOptions::default()).unwrap();
    assert_eq!(res.final_damage, 10);
    assert_eq!(res.outcome, Outcome::Hit);
    assert_eq!(res.spent_effective, None);
    assert_eq!(res.breakdown.get("base_damage"), Some(8.0));
    assert_eq!(res.breakdown.get("total"), Some(12.0));

    insta::assert_snapshot!(res.breakdown.to_string(), @r"
    dice_roll: 6
    flat_bonus: 2
    base_damage: 8
    bonus_points: 50
    bonus_multiplier: 1.5
    total: 12
    after_glance: 12
    damage_reduction: 2
    final_damage: 10
    ");
    insta::assert_snapshot!(
        res.summary(),
        @"Base 8 (roll 6+2) * Bonus 1.50x = 12 - DR 2 = 10 damage"
    );
}

#[test]
fn inner_ability_overcast_doubles_spend() {
    let opts = ResolveOptions {
        mana_spend_base: Some(20),
        ..Default::default()
    };
    let res = resolve(
        &bolt(Slot::Inner, 10, 3),
        &CombatantSnapshot::default(),
        &CombatantSnapshot::default(),
        6,
        opts,
    )
    .unwrap();
    assert_eq!(res.breakdown.get("overcast_bonus"), Some(3.0));
    assert_eq!(res.final_damage, 9);
    assert_eq!(res.spent_effective, Some(20));
}

#[test]
fn core_slot_discounts_mana_and_boosts_damage() {
    let opts = ResolveOptions {
        mana_spend_base: Some(20),
        ..Default::default()
    };
    let res = resolve(
        &bolt(Slot::Core, 10, 3),
        &CombatantSnapshot::default(),
        &CombatantSnapshot::default(),
        6,
        opts,
    )
    .unwrap();
    assert_eq!(res.breakdown.get("base_effective_mana"), Some(8.0));
    assert_eq!(res.spent_effective, Some(15));
    // log2(15/8)^0.85 * 3 = 2.76
    assert_eq!(res.breakdown.get("overcast_bonus"), Some(2.0));
    assert_eq!(res.final_damage, 12);
}

#[test]
fn ability_ignores_pbd_and_uses_mana_density() {
    let attacker = CombatantSnapshot {
        pbd: 1000,
        mana_density: 100,
        ..Default::default()
    };
    let res = resolve(
        &bolt(Slot::Outer, 4, 0),
        &attacker,
        &CombatantSnapshot::default(),
        8,
        ResolveOptions::default(),
    )
    .unwrap();
    // 8 * 0.75 * 2.0
    assert_eq!(res.final_damage, 12);
    assert_eq!(res.spent_effective, Some(8));
    assert!(res.breakdown.get("bonus_multiplier").is_none());
}

#[test]
fn natural_one_misses_regardless_of_damage() {
    let opts = ResolveOptions {
        d20: Some(1),
        ..Default::default()
    };
    let res = resolve(&greataxe(), &fighter(), &armoured(), 8, opts).unwrap();
    assert!(res.is_miss());
    assert_eq!(res.final_damage, 0);
    assert_eq!(res.spent_effective, None);
    assert_eq!(res.breakdown.labels().last(), Some(&"final_damage"));
    assert!(res.breakdown.get("base_damage").is_none());
    assert!(res.summary().ends_with("MISS"));
}

#[test]
fn missed_cast_spends_no_mana() {
    let opts = ResolveOptions {
        d20: Some(1),
        mana_spend_base: Some(40),
        ..Default::default()
    };
    let res = resolve(&bolt(Slot::Inner, 10, 3), &fighter(), &armoured(), 6, opts).unwrap();
    assert_eq!(res.outcome, Outcome::Miss);
    assert_eq!(res.spent_effective, None);
}

#[test]
fn even_accuracy_glances_for_half() {
    let attacker = CombatantSnapshot {
        melee_acc: 10,
        ..fighter()
    };
    let opts = ResolveOptions {
        d20: Some(10),
        ..Default::default()
    };
    let res = resolve(&greataxe(), &attacker, &armoured(), 6, opts).unwrap();
    assert_eq!(res.outcome, Outcome::Glancing);
    assert_eq!(res.breakdown.get("glance_multiplier"), Some(0.5));
    // floor(12 * 0.5) - 2
    assert_eq!(res.final_damage, 4);
}

#[test]
fn zero_evasion_always_lands_fully() {
    let opts = ResolveOptions {
        d20: Some(1),
        ..Default::default()
    };
    let res = resolve(
        &greataxe(),
        &fighter(),
        &CombatantSnapshot::default(),
        6,
        opts,
    )
    .unwrap();
    assert_eq!(res.outcome, Outcome::Hit);
    assert_eq!(res.final_damage, 12);
}

#[test]
fn ranged_item_reads_precision() {
    let bow = CombatAction::Item(ItemAction {
        name: "Longbow".into(),
        damage: DiceExpression::new(1, 8, 0).unwrap(),
        is_ranged: true,
        apply_bonus: true,
    });
    let res = resolve(
        &bow,
        &fighter(),
        &CombatantSnapshot::default(),
        5,
        ResolveOptions::default(),
    )
    .unwrap();
    assert_eq!(res.breakdown.get("bonus_points"), Some(100.0));
    assert_eq!(res.final_damage, 10);
}

#[test]
fn bonus_switch_off_keeps_base() {
    let club = CombatAction::Item(ItemAction {
        name: "Club".into(),
        damage: DiceExpression::new(1, 4, 1).unwrap(),
        is_ranged: false,
        apply_bonus: false,
    });
    let res = resolve(
        &club,
        &fighter(),
        &CombatantSnapshot::default(),
        3,
        ResolveOptions::default(),
    )
    .unwrap();
    assert_eq!(res.final_damage, 4);
}

#[test]
fn target_and_crit_apply_before_glance_and_dr() {
    let opts = ResolveOptions {
        target: TargetModifier::Resistant,
        critical: true,
        ..Default::default()
    };
    let res = resolve(&greataxe(), &fighter(), &armoured(), 7, opts).unwrap();
    // base 9 * 1.5 = 13, resisted 6, crit 12, DR 2
    assert_eq!(res.breakdown.get("total"), Some(12.0));
    assert_eq!(res.final_damage, 10);
    let labels = res.breakdown.labels();
    let pos = |l: &str| labels.iter().position(|x| *x == l).unwrap();
    assert!(pos("target_multiplier") < pos("critical"));
    assert!(pos("critical") < pos("after_glance"));
}

#[test]
fn default_options_add_no_modifier_stages() {
    let res = resolve(&greataxe(), &fighter(), &armoured(), 6, ResolveOptions::default()).unwrap();
    assert!(res.breakdown.get("target_multiplier").is_none());
    assert!(res.breakdown.get("critical").is_none());
}

#[test]
fn dr_never_goes_negative() {
    let wall = CombatantSnapshot {
        phys_def: 500,
        ..Default::default()
    };
    let res = resolve(&greataxe(), &fighter(), &wall, 1, ResolveOptions::default()).unwrap();
    assert_eq!(res.final_damage, 0);
}

#[test]
fn spend_below_base_is_rejected() {
    let opts = ResolveOptions {
        mana_spend_base: Some(5),
        ..Default::default()
    };
    let err = resolve(
        &bolt(Slot::Inner, 10, 3),
        &CombatantSnapshot::default(),
        &CombatantSnapshot::default(),
        6,
        opts,
    )
    .unwrap_err();
    assert_eq!(err, ResolveError::SpendBelowBaseCost { spend: 5, base: 10 });
}

#[test]
fn zero_cost_ability_is_misconfigured() {
    let err = resolve(
        &bolt(Slot::Inner, 0, 3),
        &CombatantSnapshot::default(),
        &CombatantSnapshot::default(),
        6,
        ResolveOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, ResolveError::MisconfiguredAbility { mana_cost: 0 });
}

#[test]
fn accuracy_stat_follows_action_kind() {
    let attacker = CombatantSnapshot {
        melee_acc: 3,
        ranged_acc: 7,
        spellcraft: 11,
        ..Default::default()
    };
    let def = CombatantSnapshot::default();
    let check = check_accuracy(&bolt(Slot::Inner, 1, 0), &attacker, &def, 10);
    assert_eq!(check.accuracy, 11);
    let check = check_accuracy(&greataxe(), &attacker, &def, 10);
    assert_eq!(check.accuracy, 3);
    assert_eq!(check.outcome(), Outcome::Hit);
}
