//! End-to-end runs of the `waitlist` binary against a scratch data directory.

use std::path::Path;
use std::process::{Command, Output};

fn waitlist(dir: &Path, user: &str, password: &str, args: &[&str]) -> Output {
    let config = dir.join("waitlist.toml");
    if !config.exists() {
        std::fs::write(&config, "").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_waitlist"))
        .arg("--config")
        .arg(&config)
        .arg("--data-dir")
        .arg(dir)
        .args(["--user", user, "--password", password])
        .args(args)
        .env_remove("WAITLIST_USER")
        .env_remove("WAITLIST_PASSWORD")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn admin(dir: &Path, args: &[&str]) -> Output {
    waitlist(dir, "admin", "admin123", args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn add_patient(dir: &Path, name: &str, first_contact: &str) {
    let output = admin(
        dir,
        &[
            "add",
            "--name",
            name,
            "--specialty",
            "orthopedic",
            "--first-contact",
            first_contact,
            "--phone",
            "(11) 4000-1000",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_add_grant_and_history() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    add_patient(dir, "Marta Lima", "2024-01-10");
    add_patient(dir, "Jorge Souza", "2024-02-01");
    assert!(dir.join("data_espera.csv").exists());
    assert!(dir.join("usuarios.json").exists());

    let listed = admin(dir, &["list", "--as-of", "2024-02-15"]);
    assert!(listed.status.success());
    let text = stdout(&listed);
    assert!(text.contains("Marta Lima"));
    assert!(text.contains("Jorge Souza"));
    assert!(text.contains("36"));

    let granted = admin(
        dir,
        &[
            "grant",
            "1",
            "--professional",
            "Dr. Paulo",
            "--time-slot",
            "Seg/Qua 09:00",
            "--start-date",
            "2024-03-04",
        ],
    );
    assert!(granted.status.success(), "{}", String::from_utf8_lossy(&granted.stderr));

    let served = std::fs::read_to_string(dir.join("data_atendidos.csv")).unwrap();
    assert!(served.contains("Marta Lima"));
    assert!(served.contains("Dr. Paulo"));
    let waiting = std::fs::read_to_string(dir.join("data_espera.csv")).unwrap();
    assert!(!waiting.contains("Marta Lima"));

    let history = admin(dir, &["history"]);
    assert!(history.status.success());
    assert!(stdout(&history).contains("Jorge Souza"));
}

#[test]
fn test_grant_unknown_row_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    add_patient(dir, "Marta Lima", "2024-01-10");

    let output = admin(
        dir,
        &[
            "grant",
            "5",
            "--professional",
            "Dr. Paulo",
            "--time-slot",
            "Seg 09:00",
            "--start-date",
            "2024-03-04",
        ],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("row 5").count(), 1, "{stderr}");
}

#[test]
fn test_wrong_password_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let output = waitlist(tmp.path(), "admin", "nope", &["list"]);
    assert!(!output.status.success());
}

#[test]
fn test_standard_user_cannot_grant() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    add_patient(dir, "Marta Lima", "2024-01-10");

    let created = admin(dir, &["users", "add", "recepcao", "--new-password", "r3c3p"]);
    assert!(created.status.success(), "{}", String::from_utf8_lossy(&created.stderr));

    let registered = waitlist(
        dir,
        "recepcao",
        "r3c3p",
        &["add", "--name", "Nina Reis", "--specialty", "psychology"],
    );
    assert!(registered.status.success());

    let output = waitlist(
        dir,
        "recepcao",
        "r3c3p",
        &[
            "grant",
            "1",
            "--professional",
            "Dr. Paulo",
            "--time-slot",
            "Seg 09:00",
            "--start-date",
            "2024-03-04",
        ],
    );
    assert!(!output.status.success());
    let waiting = std::fs::read_to_string(dir.join("data_espera.csv")).unwrap();
    assert!(waiting.contains("Marta Lima"));
}

#[test]
fn test_export_workbook_and_csv() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    add_patient(dir, "Marta Lima", "2024-01-10");

    let xlsx = dir.join("out.xlsx");
    let output = admin(dir, &["export", "--output", xlsx.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(std::fs::read(&xlsx).unwrap().starts_with(b"PK"));

    let csv = dir.join("out.csv");
    let output = admin(dir, &["export", "--csv", "--output", csv.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(std::fs::read_to_string(&csv).unwrap().contains("Marta Lima"));
}

#[test]
fn test_standard_user_sees_served_but_not_history() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    add_patient(dir, "Marta Lima", "2024-01-10");
    let granted = admin(
        dir,
        &[
            "grant",
            "1",
            "--professional",
            "Dr. Paulo",
            "--time-slot",
            "Seg 09:00",
            "--start-date",
            "2024-03-04",
        ],
    );
    assert!(granted.status.success());
    let created = admin(dir, &["users", "add", "rec", "--new-password", "r3c"]);
    assert!(created.status.success());

    let listed = waitlist(dir, "rec", "r3c", &["list", "--served"]);
    assert!(listed.status.success(), "{}", String::from_utf8_lossy(&listed.stderr));
    assert!(stdout(&listed).contains("Dr. Paulo"));

    let found = waitlist(dir, "rec", "r3c", &["find", "Marta"]);
    assert!(found.status.success());
    assert!(stdout(&found).contains("Atendidos"));

    let csv = dir.join("served.csv");
    let exported = waitlist(
        dir,
        "rec",
        "r3c",
        &["export", "--csv", "--served", "--output", csv.to_str().unwrap()],
    );
    assert!(exported.status.success());
    assert!(std::fs::read_to_string(&csv).unwrap().contains("Dr. Paulo"));

    let history = waitlist(dir, "rec", "r3c", &["history"]);
    assert!(!history.status.success());
}
