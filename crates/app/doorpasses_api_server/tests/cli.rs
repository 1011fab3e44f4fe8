use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn help_lists_server_flags() {
    Command::cargo_bin("doorpasses_api_server")
        .expect("binary builds")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--bind-addr"))
        .stdout(contains("--database-url"))
        .stdout(contains("--issuer-url"));
}

#[test]
fn rejects_unknown_flags() {
    Command::cargo_bin("doorpasses_api_server")
        .expect("binary builds")
        .arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(contains("unexpected argument"));
}
