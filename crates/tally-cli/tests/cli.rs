use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GROCERY_RECEIPT: &str =
    "BIG BAZAAR\nRice 50\nDal 40\nTOTAL: Rs. 1250.00\nThank you visit again";

/// A temporary config whose ledger lives in the same directory.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        let ledger = dir.path().join("ledger.json");

        let contents = serde_json::json!({
            "user": { "id": "tester" },
            "ocr": { "providers": [] },
            "storage": { "path": ledger },
            "display": { "currency": "INR" }
        });
        fs::write(&config, contents.to_string()).unwrap();

        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn tally(&self) -> Command {
        let mut cmd = Command::cargo_bin("tally").unwrap();
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    fn receipt(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn list_json(&self) -> Vec<serde_json::Value> {
        let output = self
            .tally()
            .args(["list", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn test_help() {
    Command::cargo_bin("tally")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("insights"));
}

#[test]
fn test_scan_text_receipt_json() {
    let ws = Workspace::new();
    let receipt = ws.receipt("receipt.txt", GROCERY_RECEIPT);

    let output = ws
        .tally()
        .args(["scan", "--format", "json"])
        .arg(&receipt)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["store_name"], "BIG BAZAAR");
    assert_eq!(parsed["amount"], "1250.00");
    assert_eq!(parsed["items"], serde_json::json!(["Rice", "Dal"]));
    assert_eq!(parsed["raw_text"], GROCERY_RECEIPT);
}

#[test]
fn test_scan_text_summary_flags_missing_store() {
    let ws = Workspace::new();
    let receipt = ws.receipt("receipt.txt", "x1\nchai 20\nTOTAL 99");

    ws.tally()
        .arg("scan")
        .arg(&receipt)
        .assert()
        .success()
        .stdout(predicate::str::contains("Amount: ₹99.00"))
        .stdout(predicate::str::contains("Could not detect store name"));
}

#[test]
fn test_scan_missing_file() {
    let ws = Workspace::new();

    ws.tally()
        .args(["scan", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_scan_image_without_providers_fails() {
    let ws = Workspace::new();
    let image = ws.receipt("receipt.png", "not really a png");

    ws.tally()
        .arg("scan")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No OCR provider is available"));
}

#[test]
fn test_scan_and_save() {
    let ws = Workspace::new();
    let receipt = ws.receipt(
        "swiggy.txt",
        "Swiggy Order\nBiryani x1 300\nRaita x1 50\n$450",
    );

    ws.tally()
        .args([
            "scan",
            "--save",
            "--date",
            "2024-01-14",
            "--category",
            "food",
            "--split",
            "2",
        ])
        .arg(&receipt)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved expense"));

    let expenses = ws.list_json();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["store_name"], "Swiggy");
    assert_eq!(expenses[0]["amount"], "450");
    assert_eq!(expenses[0]["user_portion"], "225");
    assert_eq!(expenses[0]["category"], "Food & Dining");
    assert_eq!(expenses[0]["currency"], "INR");
    assert_eq!(expenses[0]["user_id"], "tester");
}

#[test]
fn test_scan_save_needs_store() {
    let ws = Workspace::new();
    let receipt = ws.receipt("receipt.txt", "x1\nTOTAL 99");

    ws.tally()
        .args(["scan", "--save"])
        .arg(&receipt)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot save receipt"));

    assert!(ws.list_json().is_empty());
}

#[test]
fn test_expense_lifecycle() {
    let ws = Workspace::new();

    ws.tally()
        .args([
            "add", "--store", "Metro", "--amount", "50", "--date", "2024-01-14",
        ])
        .assert()
        .success();
    ws.tally()
        .args([
            "add",
            "--store",
            "Big Bazaar",
            "--amount",
            "1250",
            "--date",
            "2024-01-15",
            "--items",
            "Rice, Dal",
        ])
        .assert()
        .success();

    let expenses = ws.list_json();
    let names: Vec<_> = expenses.iter().map(|e| e["store_name"].clone()).collect();
    assert_eq!(names, vec!["Big Bazaar", "Metro"]);

    let metro_id = expenses[1]["id"].as_str().unwrap().to_string();
    ws.tally()
        .args(["edit", &metro_id, "--amount", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₹75.00"));

    ws.tally()
        .args(["list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Metro,75,INR"))
        .stdout(predicate::str::contains("Rice; Dal"));

    ws.tally().args(["delete", &metro_id]).assert().success();
    assert_eq!(ws.list_json().len(), 1);

    ws.tally()
        .args(["delete", &metro_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expense not found"));
}

#[test]
fn test_add_rejects_non_positive_amount() {
    let ws = Workspace::new();

    ws.tally()
        .args(["add", "--store", "Metro", "--amount", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn test_edit_without_fields() {
    let ws = Workspace::new();

    ws.tally()
        .args(["edit", "some-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_list_limit() {
    let ws = Workspace::new();
    for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        ws.tally()
            .args(["add", "--store", "Cafe", "--amount", "12", "--date", day])
            .assert()
            .success();
    }

    let output = ws
        .tally()
        .args(["list", "--format", "json", "--limit", "2"])
        .output()
        .unwrap();
    let expenses: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["date"], "2024-01-03");
}

#[test]
fn test_insights() {
    let ws = Workspace::new();

    ws.tally()
        .args(["insights", "--today", "2024-01-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses yet"));

    ws.tally()
        .args([
            "add",
            "--store",
            "Big Bazaar",
            "--amount",
            "2000",
            "--date",
            "2024-01-19",
            "--category",
            "groceries",
        ])
        .assert()
        .success();

    ws.tally()
        .args(["insights", "--today", "2024-01-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total spent:   ₹2000.00"))
        .stdout(predicate::str::contains("Daily average: ₹2000.00"))
        .stdout(predicate::str::contains("Consider reducing spending in Groceries"))
        .stdout(predicate::str::contains("setting a daily budget might help"));
}

#[test]
fn test_insights_with_huge_amounts() {
    let ws = Workspace::new();
    for day in ["2024-01-18", "2024-01-19"] {
        ws.tally()
            .args([
                "add",
                "--store",
                "Vault",
                "--amount",
                "50000000000000000000000000000",
                "--date",
                day,
            ])
            .assert()
            .success();
    }

    ws.tally()
        .args(["insights", "--today", "2024-01-20", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("79228162514264337593543950335"));
}

#[test]
fn test_config_set_and_get() {
    let ws = Workspace::new();

    ws.tally()
        .args(["config", "set", "extraction.max_items", "5"])
        .assert()
        .success();

    ws.tally()
        .args(["config", "get", "extraction.max_items"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));

    ws.tally()
        .args(["config", "get", "user.id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tester"));

    ws.tally()
        .args(["config", "get", "no.such.key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_hides_api_key() {
    let ws = Workspace::new();

    ws.tally()
        .args(["config", "set", "ocr.vision_api_key", "AIzaSyExampleKey1234"])
        .assert()
        .success();

    ws.tally()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****1234"))
        .stdout(predicate::str::contains("AIzaSyExampleKey1234").not());

    ws.tally()
        .args(["config", "get", "ocr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AIzaSyExampleKey1234").not());

    let saved = fs::read_to_string(&ws.config).unwrap();
    assert!(saved.contains("AIzaSyExampleKey1234"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let ws = Workspace::new();
    let target = ws.path().join("fresh.json");

    ws.tally()
        .args(["config", "init", "--output"])
        .arg(&target)
        .assert()
        .success();
    assert!(target.exists());

    ws.tally()
        .args(["config", "init", "--output"])
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
