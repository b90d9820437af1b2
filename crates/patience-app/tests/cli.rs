use assert_cmd::Command;
use predicates::prelude::*;

fn patience() -> Command {
    Command::cargo_bin("patience").expect("binary builds")
}

#[test]
fn losing_seed_prints_trace_and_writes_lose_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    patience()
        .args(["42", "--out-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Playing a game of patience with seed 42\n5 12 \n",
        ))
        .stdout(predicate::str::contains(
            "Player loses with 39 cards left in the deck",
        ));

    let saved = std::fs::read_to_string(dir.path().join("lose.txt")).expect("lose.txt written");
    assert!(saved.ends_with("\nPlayer loses with 39 cards left in the deck\n"));
    assert!(!dir.path().join("win.txt").exists());
}

#[test]
fn winning_seed_writes_win_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    patience()
        .args(["2024", "--out-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Player wins\n"));
    assert!(dir.path().join("win.txt").exists());
}

#[test]
fn faces_flag_prints_labels() {
    let dir = tempfile::tempdir().expect("temp dir");
    patience()
        .args(["42", "--faces", "--out-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\n5 Q \n"));
}

#[test]
fn zero_seed_is_rejected() {
    patience().arg("0").assert().failure();
}

#[test]
fn missing_output_directory_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    patience()
        .args(["42", "--out-dir"])
        .arg(dir.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("lose.txt"));
}

#[test]
fn record_flag_writes_replayable_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let record = dir.path().join("game.json");
    patience()
        .args(["42", "--out-dir"])
        .arg(dir.path())
        .arg("--record")
        .arg(&record)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&record).expect("record written"))
            .expect("record decodes");
    assert_eq!(json["seed"], 42);
    assert_eq!(json["outcome"]["result"], "loss");
    assert_eq!(json["outcome"]["remaining"], 39);
    assert_eq!(json["trace"].as_array().map(Vec::len), Some(10));
}
