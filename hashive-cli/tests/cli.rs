use predicates::prelude::*;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct SampleDb {
    _dir: TempDir,
    db_path: PathBuf,
}

fn build_sample_db() -> Result<SampleDb, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input_path = dir.path().join("input.json");
    let db_path = dir.path().join("sample.hashive");

    fs::write(
        &input_path,
        br#"{"name":"mkch","age":18,"hobbies":["programming","ping-pong"]}"#,
    )?;

    assert_cmd::Command::cargo_bin("hashive")?
        .args([
            "pack",
            input_path.to_str().unwrap(),
            "-o",
            db_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    Ok(SampleDb {
        _dir: dir,
        db_path,
    })
}

#[test]
fn query_resolves_scalar_paths() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_db()?;
    assert_cmd::Command::cargo_bin("hashive")?
        .args(["query", sample.db_path.to_str().unwrap(), "name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mkch"));
    Ok(())
}

#[test]
fn query_indexes_arrays_with_hex_literals() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_db()?;
    assert_cmd::Command::cargo_bin("hashive")?
        .args(["query", sample.db_path.to_str().unwrap(), "hobbies", "0x1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ping-pong"));
    Ok(())
}

#[test]
fn query_misses_report_not_found() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_db()?;
    assert_cmd::Command::cargo_bin("hashive")?
        .args(["query", sample.db_path.to_str().unwrap(), "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NotFound"));
    Ok(())
}

#[test]
fn dump_prints_the_whole_document() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_db()?;
    let output = assert_cmd::Command::cargo_bin("hashive")?
        .args(["dump", sample.db_path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(value["name"], "mkch");
    // JSON numbers land as floats in the value universe.
    assert_eq!(value["age"], 18.0);
    assert_eq!(value["hobbies"][1], "ping-pong");
    Ok(())
}

#[test]
fn pack_rejects_invalid_json() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input_path = dir.path().join("bad.json");
    fs::write(&input_path, b"{not json")?;

    assert_cmd::Command::cargo_bin("hashive")?
        .args([
            "pack",
            input_path.to_str().unwrap(),
            "-o",
            dir.path().join("out.hashive").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
    Ok(())
}
