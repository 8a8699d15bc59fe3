use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

const DICT: &str = "\
the 1000000
my 1060444
friend 135261
receive 131928
mail 360396
arrived 45000
";

struct Fixture {
    _dir: tempfile::TempDir,
    dict: std::path::PathBuf,
    personal: std::path::PathBuf,
    cwd: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let dict = dir.path().join("en.txt");
    let mut f = std::fs::File::create(&dict).unwrap();
    f.write_all(DICT.as_bytes()).unwrap();

    let personal = dir.path().join("personal.txt");
    std::fs::write(&personal, "").unwrap();

    Fixture {
        cwd: dir.path().to_path_buf(),
        _dir: dir,
        dict,
        personal,
    }
}

fn correx(fx: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin("correx").unwrap();
    cmd.current_dir(&fx.cwd)
        .arg("--dictionary")
        .arg(&fx.dict)
        .arg("--personal-dict")
        .arg(&fx.personal)
        .arg("--no-color");
    cmd
}

#[test]
fn help_mentions_correction() {
    Command::cargo_bin("correx")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("correction"));
}

#[test]
fn stdin_check_reports_misspelling_and_fails() {
    let fx = fixture();
    correx(&fx)
        .write_stdin("my freind arrived\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("freind"))
        .stdout(predicate::str::contains("friend"));
}

#[test]
fn no_fail_keeps_exit_code_zero() {
    let fx = fixture();
    correx(&fx)
        .arg("--no-fail")
        .write_stdin("my freind arrived\n")
        .assert()
        .success();
}

#[test]
fn clean_text_passes() {
    let fx = fixture();
    correx(&fx)
        .write_stdin("my friend arrived\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No corrections suggested"));
}

#[test]
fn json_output_has_correction_records() {
    let fx = fixture();
    correx(&fx)
        .arg("--format")
        .arg("json")
        .arg("--no-fail")
        .write_stdin("my freind arrived\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"suggested\": \"friend\""))
        .stdout(predicate::str::contains("\"source\": \"rule\""));
}

#[test]
fn fix_rewrites_file_in_place() {
    let fx = fixture();
    let target = fx.cwd.join("draft.txt");
    std::fs::write(&target, "my freind arrived").unwrap();

    correx(&fx).arg("--fix").arg(&target).assert().success();

    let fixed = std::fs::read_to_string(&target).unwrap();
    assert_eq!(fixed, "my friend arrived");
}

#[test]
fn add_word_suppresses_correction() {
    let fx = fixture();
    correx(&fx)
        .arg("--add-word")
        .arg("freind")
        .assert()
        .success();

    correx(&fx)
        .write_stdin("my freind arrived\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No corrections suggested"));
}

#[test]
fn missing_file_is_reported() {
    let fx = fixture();
    correx(&fx)
        .arg("definitely-not-here.txt")
        .assert()
        .stderr(predicate::str::contains("File not found"));
}
