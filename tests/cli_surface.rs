mod common;

use predicates::prelude::*;

#[test]
fn gen_man_prints_troff() {
  common::bin()
    .arg("--gen-man")
    .assert()
    .success()
    .stdout(predicate::str::contains(".TH"))
    .stdout(predicate::str::contains("delivery-metrics"));
}

#[test]
fn help_names_both_subcommands() {
  common::bin()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("extract"))
    .stdout(predicate::str::contains("metrics"));
}

#[test]
fn bare_invocation_demands_a_subcommand() {
  common::bin()
    .assert()
    .failure()
    .stderr(predicate::str::contains("subcommand"));
}

#[test]
fn extract_requires_repos() {
  common::bin()
    .arg("extract")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--repos"));
}
