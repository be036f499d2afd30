use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const OWNED_HEADER: &str =
    "Category,Qty,Avg Replacement Value,Avg Useful Life,Avg End Value,Annual Recovery,COGS,Overhead";

fn fleetcost(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fleetcost").unwrap();
    cmd.env("FLEETCOST_CONFIG_DIR", config_dir)
        .env_remove("FLEETCOST_LOG")
        .env_remove("FLEETCOST_AS_OF");
    cmd
}

fn write_fleet(dir: &Path) -> PathBuf {
    let path = dir.join("fleet.json");
    fs::write(
        &path,
        r#"[
            {
                "name": "Crew Truck",
                "category": "Truck",
                "purchase_date": "2024-03-01",
                "purchase_price": 40000
            },
            {
                "name": "Skid A",
                "category": "Skid Steer",
                "purchase_price": 50000,
                "financing_type": "leased",
                "lmn_recovery_method": "leased",
                "monthly_payment": 1100,
                "term_months": 36,
                "financing_start_date": "2024-01-15"
            },
            {
                "name": "Old Trailer",
                "category": "Trailer",
                "status": "retired",
                "purchase_price": 8000
            }
        ]"#,
    )
    .unwrap();
    path
}

#[test]
fn rollup_prints_csv_to_stdout() {
    let temp = TempDir::new().unwrap();
    let input = write_fleet(temp.path());

    let expected = format!(
        "Field Equipment - Owned\n{owned}\n\
         Truck,1,40000,7.0,10000,4286,40000,0\n\
         Total,1,,,,4286,40000,0\n\
         \n\
         Field Equipment - Leased\n\
         Category,Qty,Monthly Payment,Annual Recovery,COGS,Overhead\n\
         Skid Steer,1,1100,4375,50000,0\n\
         Total,1,1100,4375,50000,0\n\
         \n\
         Overhead Equipment - Owned\n{owned}\n\
         Total,0,,,,0,0,0\n",
        owned = OWNED_HEADER
    );

    fleetcost(temp.path())
        .args(["rollup", "--input"])
        .arg(&input)
        .args(["--as-of", "2025-06-01"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn rollup_writes_file() {
    let temp = TempDir::new().unwrap();
    let input = write_fleet(temp.path());
    let output = temp.path().join("rollup.csv");

    fleetcost(temp.path())
        .args(["rollup", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--as-of", "2025-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rollup exported to:"));

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("Field Equipment - Owned\n"));
    assert!(!csv.contains("Overhead Equipment - Leased"));
}

#[test]
fn value_export_json_snapshot() {
    let temp = TempDir::new().unwrap();
    let input = write_fleet(temp.path());

    fleetcost(temp.path())
        .args(["value", "export", "--format", "json", "--input"])
        .arg(&input)
        .args(["--as-of", "2025-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"as_of\":\"2025-06-01\""))
        .stdout(predicate::str::contains("\"equipment_count\":3"));
}

#[test]
fn value_show_prints_schedule() {
    let temp = TempDir::new().unwrap();
    let input = write_fleet(temp.path());

    fleetcost(temp.path())
        .args(["value", "show", "crew truck", "--input"])
        .arg(&input)
        .args(["--as-of", "2025-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Depreciation schedule"))
        .stdout(predicate::str::contains("2030"));
}

#[test]
fn cashflow_portfolio_skips_inactive() {
    let temp = TempDir::new().unwrap();
    let input = write_fleet(temp.path());

    fleetcost(temp.path())
        .args(["cashflow", "portfolio", "--input"])
        .arg(&input)
        .args(["--as-of", "2025-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skid A"))
        .stdout(predicate::str::contains("Old Trailer").not());
}

#[test]
fn buy_vs_rent_recommends_buy() {
    let temp = TempDir::new().unwrap();

    fleetcost(temp.path())
        .args([
            "buy-vs-rent",
            "--price",
            "40000",
            "--life",
            "5",
            "--resale",
            "8000",
            "--daily",
            "300",
            "--days",
            "60",
            "--maintenance",
            "2000",
            "--insurance",
            "800",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Annual ownership cost: $9200.00"))
        .stdout(predicate::str::contains("Annual rental cost:    $18000.00 (daily)"))
        .stdout(predicate::str::contains("Recommendation:        BUY"));
}

#[test]
fn buy_vs_rent_without_rates_fails() {
    let temp = TempDir::new().unwrap();

    fleetcost(temp.path())
        .args(["buy-vs-rent", "--price", "40000", "--category", "Truck"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Break-even is undefined"));
}

#[test]
fn config_init_then_show() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("config");

    fleetcost(&config_dir)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config_dir.join("config.json").exists());

    fleetcost(&config_dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage days/year:    60"))
        .stdout(predicate::str::contains("(not created)").not());
}

#[test]
fn settings_overrides_change_rollup() {
    let temp = TempDir::new().unwrap();
    let input = write_fleet(temp.path());
    fs::write(
        temp.path().join("config.json"),
        r#"{ "category_overrides": { "Truck": { "default_useful_life": 5, "default_resale_percent": 0 } } }"#,
    )
    .unwrap();

    fleetcost(temp.path())
        .args(["rollup", "--input"])
        .arg(&input)
        .args(["--as-of", "2025-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Truck,1,40000,5.0,0,8000,40000,0\n"));
}
