use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const HEADER_LINE: &str = "Date,Company,Position,Status,Category,Followed Up,Company Website\n";

/// A `jobtrack` invocation isolated from the caller's config and env.
fn jobtrack(home: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("jobtrack")?;
    cmd.current_dir(home)
        .env("JOBTRACK_HOME", home)
        .env_remove("JOBTRACK_FILE")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

fn add_acme(home: &Path, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    jobtrack(home)?
        .args(["add", "--date", "2024-01-05", "--company", "Acme"])
        .args(["--position", "Engineer", "--status", "Applied"])
        .args(["--website", "acme.example", "--file"])
        .arg(file)
        .assert()
        .success()
        .stdout(contains("Added application at position 0"));
    Ok(())
}

#[test]
fn add_edit_remove_flow() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("apps.csv");
    add_acme(dir.path(), &file)?;
    assert_eq!(
        fs::read_to_string(&file)?,
        format!("{HEADER_LINE}2024-01-05,Acme,Engineer,Applied,Tech,N/A,acme.example\n")
    );

    jobtrack(dir.path())?
        .args(["edit", "0", "--status", "Interview", "--followed-up", "2024-01-19"])
        .arg("--file")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Updated application at position 0"))
        .stdout(contains("Interview"));
    assert_eq!(
        fs::read_to_string(&file)?,
        format!("{HEADER_LINE}2024-01-05,Acme,Engineer,Interview,Tech,2024-01-19,acme.example\n")
    );

    jobtrack(dir.path())?
        .args(["rm", "0", "--yes", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Deleted application at position 0"))
        .stdout(contains("No applications recorded."));
    assert_eq!(fs::read_to_string(&file)?, HEADER_LINE);
    Ok(())
}

#[test]
fn rm_asks_before_deleting() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("apps.csv");
    add_acme(dir.path(), &file)?;
    let before = fs::read(&file)?;

    jobtrack(dir.path())?
        .args(["rm", "0", "--file"])
        .arg(&file)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Delete this application? [y/N]"))
        .stdout(contains("Aborted, nothing deleted."));
    assert_eq!(fs::read(&file)?, before);

    jobtrack(dir.path())?
        .args(["rm", "0", "--file"])
        .arg(&file)
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Deleted application at position 0"));
    assert_eq!(fs::read_to_string(&file)?, HEADER_LINE);
    Ok(())
}

#[test]
fn missing_fields_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("apps.csv");

    jobtrack(dir.path())?
        .args(["add", "--date", "2024-01-05", "--file"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(contains(
            "error: missing required fields: Company, Position, Status, Company Website",
        ));
    assert_eq!(fs::read_to_string(&file)?, HEADER_LINE);
    Ok(())
}

#[test]
fn stale_positions_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("apps.csv");
    add_acme(dir.path(), &file)?;

    jobtrack(dir.path())?
        .args(["edit", "5", "--status", "Offer", "--file"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(contains("no application at position 5"));
    jobtrack(dir.path())?
        .args(["rm", "1", "--yes", "--file"])
        .arg(&file)
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn corrupted_table_is_not_a_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("apps.csv");
    fs::write(&file, "something,else\n")?;

    jobtrack(dir.path())?
        .args(["list", "--file"])
        .arg(&file)
        .assert()
        .code(1)
        .stderr(contains("malformed table"));
    Ok(())
}

#[test]
fn config_and_env_choose_the_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("config.toml"), "file = \"from-config.csv\"\n")?;

    jobtrack(dir.path())?.arg("init").assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("from-config.csv"))?,
        HEADER_LINE
    );

    let env_file = dir.path().join("from-env.csv");
    jobtrack(dir.path())?
        .env("JOBTRACK_FILE", &env_file)
        .arg("init")
        .assert()
        .success();
    assert!(env_file.exists());
    Ok(())
}

#[test]
fn list_json_and_stats() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("apps.csv");
    add_acme(dir.path(), &file)?;

    let output = jobtrack(dir.path())?
        .args(["list", "--json", "--file"])
        .arg(&file)
        .output()?;
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(listed[0]["company"], "Acme");
    assert_eq!(listed[0]["category"], "Tech");

    let output = jobtrack(dir.path())?
        .args(["stats", "--file"])
        .arg(&file)
        .output()?;
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["by_category"]["Tech"], 1);
    assert_eq!(stats["by_status"]["Applied"], 1);
    Ok(())
}

#[test]
fn export_import_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("apps.csv");
    add_acme(dir.path(), &file)?;

    let exported = jobtrack(dir.path())?
        .args(["export", "--file"])
        .arg(&file)
        .output()?;
    assert!(exported.status.success());

    let copy = dir.path().join("copy.csv");
    jobtrack(dir.path())?
        .args(["import", "--file"])
        .arg(&copy)
        .write_stdin(exported.stdout)
        .assert()
        .success()
        .stdout(contains("Imported 1 applications"));
    assert_eq!(fs::read(&copy)?, fs::read(&file)?);
    Ok(())
}

#[test]
fn completion_does_not_create_a_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    jobtrack(dir.path())?
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(contains("jobtrack"));
    assert!(!dir.path().join("job_applications.csv").exists());
    Ok(())
}
