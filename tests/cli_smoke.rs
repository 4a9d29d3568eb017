use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn kanban_help_works() {
    Command::cargo_bin("kanban")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("board view for tickets"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = ["view", "show", "prefs"];

    for cmd in subcommands {
        Command::cargo_bin("kanban")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn prefs_subcommand_help_works() {
    for sub in ["show", "group", "sort", "reset"] {
        Command::cargo_bin("kanban")
            .expect("binary")
            .args(["prefs", sub, "--help"])
            .assert()
            .success();
    }
}

#[test]
fn data_and_endpoint_conflict() {
    Command::cargo_bin("kanban")
        .expect("binary")
        .args([
            "--data",
            "board.json",
            "--endpoint",
            "http://127.0.0.1:1/board",
            "show",
        ])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
}
