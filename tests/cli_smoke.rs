use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn tl_help_works() {
    Command::cargo_bin("tl")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("task list"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = ["add", "toggle", "rm", "clear", "list", "count", "ui"];

    for cmd in subcommands {
        Command::cargo_bin("tl")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}
