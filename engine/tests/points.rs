use manasheet_engine::tuning::PbdSchedule;
use manasheet_engine::{
    spend, Character, ResourceState, SpendError, SpendOutcome, SpendTarget, StatKey, Stats,
    Tuning,
};

#[test]
fn legacy_pbd_below_cap_costs_three() {
    let mut res = ResourceState::new(20, 10).with_pbd(14);
    let mut stats = Stats::default();
    let out = spend(&Tuning::LEGACY, &mut res, &mut stats, SpendTarget::Pbd, 3);
    assert_eq!(out, SpendOutcome { spent: 3, gained: 1 });
    assert_eq!(res.pbd(), 15);
}

#[test]
fn legacy_pbd_stops_when_next_step_overruns() {
    let mut res = ResourceState::new(20, 10).with_pbd(14);
    let mut stats = Stats::default();
    // 3 for 14 -> 15, then 5 per point above the cap; 4 left is not enough
    let out = spend(&Tuning::LEGACY, &mut res, &mut stats, SpendTarget::Pbd, 7);
    assert_eq!(out, SpendOutcome { spent: 3, gained: 1 });
}

#[test]
fn tier1_pbd_crosses_soft_cap() {
    let mut res = ResourceState::new(20, 10).with_pbd(98);
    let mut stats = Stats::default();
    let out = spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::Pbd, 7);
    assert_eq!(out, SpendOutcome { spent: 7, gained: 3 });
    assert_eq!(res.pbd(), 101);
    assert_eq!(PbdSchedule::TIER1.soft_cap, 100);
}

#[test]
fn hp_gain_halves_at_soft_cap() {
    let mut res = ResourceState::new(98, 10);
    let mut stats = Stats::default();
    let out = spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::Hp, 3);
    assert_eq!(out, SpendOutcome { spent: 3, gained: 4 });
    assert_eq!((res.hp_current(), res.hp_max()), (102, 102));
}

#[test]
fn mana_switches_to_three_for_two() {
    let mut res = ResourceState::new(20, 49);
    let mut stats = Stats::default();
    let out = spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::Mana, 5);
    assert_eq!(out, SpendOutcome { spent: 4, gained: 3 });
    assert_eq!((res.mana_current(), res.mana_max()), (52, 52));
}

#[test]
fn density_and_stats_take_whole_budget() {
    let mut res = ResourceState::new(20, 10);
    let mut stats = Stats::default();
    let out = spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::ManaDensity, 9);
    assert_eq!(out.spent, 9);
    assert_eq!(res.mana_density(), 9);

    let key = StatKey::Precision;
    spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::Stat(key), 4);
    assert_eq!(stats.get(key), 4);
}

#[test]
fn empty_budget_changes_nothing() {
    let mut res = ResourceState::new(20, 10);
    let before = res;
    let mut stats = Stats::default();
    let out = spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::Hp, 0);
    assert_eq!(out, SpendOutcome::default());
    assert_eq!(res, before);
}

#[test]
fn unspent_pool_caps_the_budget() {
    let res = ResourceState::new(20, 10).with_unspent_points(2);
    let mut hero = Character::new("Hero", Stats::default(), res);
    let out = hero.spend_unspent(&Tuning::TIER1, SpendTarget::Hp, 10);
    assert_eq!(out.spent, 2);
    assert_eq!(hero.resources.unspent_points(), 0);
    assert_eq!(hero.resources.hp_max(), 24);
}

#[test]
fn unspent_pool_keeps_leftover_from_partial_step() {
    let res = ResourceState::new(20, 10)
        .with_pbd(14)
        .with_unspent_points(5);
    let mut hero = Character::new("Hero", Stats::default(), res);
    let out = hero.spend_unspent(&Tuning::LEGACY, SpendTarget::Pbd, 5);
    assert_eq!(out.spent, 3);
    assert_eq!(hero.resources.unspent_points(), 2);
}

#[test]
fn spend_targets_parse() {
    assert_eq!("hp".parse::<SpendTarget>(), Ok(SpendTarget::Hp));
    assert_eq!(
        " Mana_Density ".parse::<SpendTarget>(),
        Ok(SpendTarget::ManaDensity)
    );
    assert_eq!(
        "stat:evasion".parse::<SpendTarget>(),
        Ok(SpendTarget::Stat(StatKey::Evasion))
    );
    assert_eq!(
        "stat:luck".parse::<SpendTarget>(),
        Err(SpendError::UnknownTarget("stat:luck".into()))
    );
}

#[test]
fn density_near_the_integer_limit_saturates() {
    let mut res = ResourceState::new(20, 10).with_mana_density(i32::MAX - 1);
    let mut stats = Stats::default();
    let out = spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::ManaDensity, 5);
    assert_eq!(out, SpendOutcome { spent: 5, gained: 1 });
    assert_eq!(res.mana_density(), i32::MAX);

    let key = StatKey::Evasion;
    *stats.get_mut(key) = i32::MAX;
    spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::Stat(key), 3);
    assert_eq!(stats.get(key), i32::MAX);
}

#[test]
fn huge_hp_budget_settles_in_one_call() {
    let mut res = ResourceState::new(20, 10);
    let mut stats = Stats::default();
    let out = spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::Hp, i32::MAX);
    assert_eq!(out.spent, i32::MAX);
    assert_eq!((res.hp_current(), res.hp_max()), (i32::MAX, i32::MAX));
}

#[test]
fn huge_pbd_budget_uses_whole_steps_after_cap() {
    let mut res = ResourceState::new(20, 10).with_pbd(99);
    let mut stats = Stats::default();
    let out = spend(&Tuning::TIER1, &mut res, &mut stats, SpendTarget::Pbd, 2_000_000_001);
    // 1 point to reach 100, then 2_000_000_000 / 5 whole steps
    assert_eq!(out, SpendOutcome { spent: 2_000_000_001, gained: 400_000_001 });
    assert_eq!(res.pbd(), 400_000_100);
}
