use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tuition(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tuition").unwrap();
    cmd.env("TUITION_LEDGER_DATA_DIR", dir).env_remove("RUST_LOG");
    cmd
}

/// One student enrolled in one course; no payments yet
fn seeded() -> TempDir {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();

    fs::write(
        data.join("students.json"),
        r#"{"students": [
            {"id": "s-1", "fullName": "Ada Lovelace", "grade": "Grade 7", "createdAt": "2024-01-15T09:00:00Z"},
            {"id": "s-2", "fullName": "Broken Date", "grade": "7", "createdAt": "not a date"}
        ]}"#,
    )
    .unwrap();
    fs::write(
        data.join("courses.json"),
        r#"{"courses": [
            {"id": "c-1", "courseName": "Algebra", "subject": "Math", "grade": "7",
             "teacherId": "t-1", "courseFee": 100, "teacherPaymentPercentage": 70,
             "createdAt": "2024-01-01", "enrolledStudents": ["s-1", "s-2"]}
        ]}"#,
    )
    .unwrap();
    fs::write(
        data.join("teachers.json"),
        r#"{"teachers": [{"id": "t-1", "fullName": "Amy Noether", "subject": "Math"}]}"#,
    )
    .unwrap();
    fs::write(
        data.join("payouts.json"),
        r#"{"payouts": [{"id": "o-1", "teacherId": "t-1", "amount": 20, "paymentDate": "2024-01-25"}]}"#,
    )
    .unwrap();

    dir
}

#[test]
fn init_creates_collections() {
    let dir = TempDir::new().unwrap();

    tuition(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created collections"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("payments.json").exists());

    tuition(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing was overwritten"));
}

#[test]
fn config_reports_collection_health() {
    let dir = seeded();

    tuition(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("students   ok"))
        .stdout(predicate::str::contains("payments   missing"));
}

#[test]
fn obligations_show_pending_month() {
    let dir = seeded();

    tuition(dir.path())
        .args(["obligations", "s-1", "--month", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace"))
        .stdout(predicate::str::contains("Algebra"))
        .stdout(predicate::str::contains("$100.00"))
        .stdout(predicate::str::contains("[Pending]"));
}

#[test]
fn obligations_for_unknown_student_fail() {
    let dir = seeded();

    tuition(dir.path())
        .args(["obligations", "s-9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Student not found: s-9"));
}

#[test]
fn obligations_with_bad_date_fail() {
    let dir = seeded();

    tuition(dir.path())
        .args(["obligations", "s-2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a date"));
}

#[test]
fn pay_settles_month_and_rejects_duplicate() {
    let dir = seeded();

    tuition(dir.path())
        .args(["pay", "s-1", "2024-01", "100", "--course", "c-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded payment"))
        .stdout(predicate::str::contains("[Paid]"));

    tuition(dir.path())
        .args(["obligations", "s-1", "--month", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Paid]"));

    tuition(dir.path())
        .args(["pay", "s-1", "2024-01", "100", "--course", "c-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Payment rejected"));

    tuition(dir.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE"))
        .stdout(predicate::str::contains("REJECT"));
}

#[test]
fn pay_succeeds_when_recompute_fails() {
    let dir = seeded();
    fs::write(
        dir.path().join("data").join("courses.json"),
        r#"{"courses": [
            {"id": "c-1", "courseName": "Algebra", "subject": "Math", "grade": "7",
             "teacherId": "t-1", "courseFee": 100, "teacherPaymentPercentage": 70,
             "createdAt": "2024-01-01", "enrolledStudents": ["s-1"]},
            {"id": "c-2", "courseName": "Geometry", "subject": "Math", "grade": "7",
             "teacherId": "t-1", "courseFee": 80, "teacherPaymentPercentage": 70,
             "createdAt": "garbled", "enrolledStudents": ["s-1"]}
        ]}"#,
    )
    .unwrap();

    tuition(dir.path())
        .args(["pay", "s-1", "2024-01", "100", "--course", "c-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded payment"))
        .stderr(predicate::str::contains("Warning"))
        .stderr(predicate::str::contains("garbled"));

    let stored = fs::read_to_string(dir.path().join("data").join("payments.json")).unwrap();
    assert!(stored.contains("\"courseId\": \"c-1\""));
}

#[test]
fn pay_rejects_non_positive_amount() {
    let dir = seeded();

    tuition(dir.path())
        .args(["pay", "s-1", "2024-01", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid payment"));

    assert!(!dir.path().join("data").join("payments.json").exists());
}

#[test]
fn pay_rejects_malformed_month() {
    let dir = seeded();

    tuition(dir.path())
        .args(["pay", "s-1", "2024-1", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM"));
}

#[test]
fn ledger_merges_both_directions() {
    let dir = seeded();

    tuition(dir.path())
        .args(["pay", "s-1", "2024-01", "50"])
        .assert()
        .success();

    tuition(dir.path())
        .arg("ledger")
        .assert()
        .success()
        .stdout(predicate::str::contains("Money In"))
        .stdout(predicate::str::contains("Money Out"))
        .stdout(predicate::str::contains("All Courses"))
        .stdout(predicate::str::contains("Amy Noether"))
        .stdout(predicate::str::contains("$30.00"));

    tuition(dir.path())
        .args(["ledger", "--direction", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Money In").not());
}

#[test]
fn ledger_exports_csv() {
    let dir = seeded();
    let out = dir.path().join("ledger.csv");

    tuition(dir.path())
        .args(["ledger", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 transactions"));

    let text = fs::read_to_string(out).unwrap();
    assert!(text.starts_with("Date,Type,Counterparty,Details,Amount"));
    assert!(text.contains("2024-01-25,Money Out,Amy Noether,Math,20.00"));
}

#[test]
fn teachers_show_balances() {
    let dir = seeded();

    tuition(dir.path())
        .args(["pay", "s-1", "2024-01", "100", "--course", "c-1"])
        .assert()
        .success();

    // 70% of 100 earned, 20 paid out
    tuition(dir.path())
        .arg("teachers")
        .assert()
        .success()
        .stdout(predicate::str::contains("Amy Noether"))
        .stdout(predicate::str::contains("$70.00"))
        .stdout(predicate::str::contains("$50.00"));
}

#[test]
fn courses_match_loose_grades() {
    let dir = seeded();

    tuition(dir.path())
        .args(["courses", "s-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Algebra"));
}

#[test]
fn outstanding_reports_broken_students() {
    let dir = seeded();

    tuition(dir.path())
        .arg("outstanding")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace"))
        .stdout(predicate::str::contains("Could not compute"))
        .stdout(predicate::str::contains("Broken Date"));
}
