use assert_cmd::Command;
use predicates::prelude::*;

fn manasheet() -> Command {
    Command::cargo_bin("manasheet").unwrap()
}

#[test]
fn attack_prints_log_and_defender_hp() {
    manasheet()
        .args(["attack", "--action", "Greataxe", "--roll", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ATTACK][Brakka] Greataxe → HIT"))
        .stdout(predicate::str::contains(
            "Base 8 (roll 6+2) * Bonus 1.50x = 12 - DR 2 = 10 damage",
        ))
        .stdout(predicate::str::contains("Training Dummy HP 190/200"));
}

#[test]
fn attack_breakdown_lists_stages() {
    manasheet()
        .args([
            "attack",
            "--attacker",
            "seren",
            "--action",
            "frost bolt",
            "--roll",
            "5",
            "--breakdown",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("slot_mana_multiplier: 1"))
        .stdout(predicate::str::contains("final_damage:"));
}

#[test]
fn attack_json_report() {
    manasheet()
        .args(["attack", "--action", "Greataxe", "--d20", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"miss\""));
}

#[test]
fn unknown_action_fails() {
    manasheet()
        .args(["attack", "--action", "Fireball"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no action named 'Fireball'"));
}

#[test]
fn accuracy_check() {
    manasheet()
        .args(["accuracy", "--action", "Greataxe", "--d20", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MISS"));
}

#[test]
fn spend_uses_selected_preset() {
    manasheet()
        .args([
            "spend",
            "--character",
            "seren",
            "--target",
            "pbd",
            "--amount",
            "3",
            "--preset",
            "legacy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[SPEND][Seren] 3 pts → PBD +1 (unspent 12 → 9)",
        ));
}

#[test]
fn rest_restores_pools() {
    manasheet()
        .args(["rest", "--character", "training_dummy"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[REST][Training Dummy] HP 200/200 Mana 10/10",
        ));
}

#[test]
fn dump_lists_typed_actions() {
    manasheet()
        .args(["dump", "--character", "seren"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"ability\""))
        .stdout(predicate::str::contains("Ember Lance"));
}

#[test]
fn dump_compact_is_single_line() {
    manasheet()
        .args(["dump", "--character", "seren", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\":\"ability\""))
        .stdout(predicate::str::is_match(r"^\{.*\}\n$").unwrap());
}
