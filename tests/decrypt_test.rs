// End-to-end tests for browser-credential-decrypt
// Run with: cargo test --test decrypt_test

use std::path::{Path, PathBuf};
use std::process::Command;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rusqlite::Connection;

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_browser-credential-decrypt"))
        .args(args)
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.success(), stdout, stderr)
}

/// Build a Chromium-style blob: "v10" + nonce + AES-256-GCM(ciphertext||tag)
fn seal(key: &[u8; 32], nonce: &[u8; 12], plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes256Gcm::new(key.into());
    let sealed = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .expect("encryption cannot fail");
    let mut blob = b"v10".to_vec();
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(&sealed);
    blob
}

fn write_fixture_db(path: &Path, rows: &[(&str, &str, Vec<u8>)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute(
        "CREATE TABLE logins (
            signon_realm TEXT,
            username_value TEXT,
            password_value BLOB
        )",
        [],
    )
    .unwrap();
    for (realm, username, blob) in rows {
        conn.execute(
            "INSERT INTO logins (signon_realm, username_value, password_value)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![realm, username, blob],
        )
        .unwrap();
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    db_path: PathBuf,
    key_path: PathBuf,
    out_path: PathBuf,
}

fn fixture(key: &[u8; 32], rows: &[(&str, &str, Vec<u8>)]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("Login Data");
    let key_path = dir.path().join("key.dat");
    let out_path = dir.path().join("out.csv");
    write_fixture_db(&db_path, rows);
    std::fs::write(&key_path, key).unwrap();
    Fixture { _dir: dir, db_path, key_path, out_path }
}

#[test]
fn decrypt_writes_success_rows_only() {
    let key = [0u8; 32];
    let mut v99 = b"v99".to_vec();
    v99.extend_from_slice(&[0u8; 28]);

    let fx = fixture(
        &key,
        &[
            ("https://a.example", "alice", seal(&key, &[0u8; 12], b"hunter2")),
            ("https://b.example", "bob", v99),
            ("https://c.example", "carol", seal(&key, &[1u8; 12], b"pw,with comma")),
        ],
    );

    let (success, stdout, stderr) = run_cli(&[
        "decrypt",
        "--database",
        fx.db_path.to_str().unwrap(),
        "--key",
        fx.key_path.to_str().unwrap(),
        "--output",
        fx.out_path.to_str().unwrap(),
    ]);
    assert!(success, "decrypt failed: {}", stderr);

    let csv = std::fs::read_to_string(&fx.out_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "URL,userName,pwd");
    assert_eq!(lines[1], "https://a.example,alice,hunter2");
    assert_eq!(lines[2], "https://c.example,carol,\"pw,with comma\"");
    assert_eq!(lines.len(), 3, "failed record must not appear in the CSV");

    // The unrecoverable record shows up in the logged summary instead
    let combined = format!("{}{}", stdout, stderr);
    assert!(
        combined.contains("Recovered 2/3"),
        "expected summary in output: {}",
        combined
    );
}

#[test]
fn decrypt_also_writes_json_when_asked() {
    let key = [7u8; 32];
    let fx = fixture(
        &key,
        &[("https://a.example", "alice", seal(&key, &[2u8; 12], b"s3cret"))],
    );
    let json_path = fx.db_path.with_file_name("out.json");

    let (success, _, stderr) = run_cli(&[
        "decrypt",
        "--database",
        fx.db_path.to_str().unwrap(),
        "--key",
        fx.key_path.to_str().unwrap(),
        "--output",
        fx.out_path.to_str().unwrap(),
        "--json",
        json_path.to_str().unwrap(),
    ]);
    assert!(success, "decrypt failed: {}", stderr);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json[0]["url"], "https://a.example");
    assert_eq!(json[0]["username"], "alice");
    assert_eq!(json[0]["password"], "s3cret");
}

#[test]
fn wrong_length_key_fails_fast() {
    let key = [0u8; 32];
    let fx = fixture(
        &key,
        &[("https://a.example", "alice", seal(&key, &[0u8; 12], b"pw"))],
    );
    std::fs::write(&fx.key_path, [0u8; 31]).unwrap();

    let (success, stdout, stderr) = run_cli(&[
        "decrypt",
        "--database",
        fx.db_path.to_str().unwrap(),
        "--key",
        fx.key_path.to_str().unwrap(),
        "--output",
        fx.out_path.to_str().unwrap(),
    ]);
    assert!(!success, "31-byte key must be rejected");
    let combined = format!("{}{}", stdout, stderr);
    assert!(combined.contains("31"), "error should state the bad length: {}", combined);
    assert!(!fx.out_path.exists(), "no report may be written for a bad key");
}

#[test]
fn base64_key_file_is_accepted() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let key = [9u8; 32];
    let fx = fixture(
        &key,
        &[("https://a.example", "alice", seal(&key, &[5u8; 12], b"encoded-key"))],
    );
    std::fs::write(&fx.key_path, format!("{}\n", STANDARD.encode(key))).unwrap();

    let (success, _, stderr) = run_cli(&[
        "decrypt",
        "--database",
        fx.db_path.to_str().unwrap(),
        "--key",
        fx.key_path.to_str().unwrap(),
        "--output",
        fx.out_path.to_str().unwrap(),
    ]);
    assert!(success, "decrypt failed: {}", stderr);

    let csv = std::fs::read_to_string(&fx.out_path).unwrap();
    assert!(csv.contains("encoded-key"));
}

#[test]
fn inspect_reports_scheme_histogram_without_a_key() {
    let key = [3u8; 32];
    let mut v99 = b"v99".to_vec();
    v99.extend_from_slice(&[1u8; 28]);

    let fx = fixture(
        &key,
        &[
            ("https://a.example", "alice", seal(&key, &[0u8; 12], b"x")),
            ("https://b.example", "bob", v99),
        ],
    );

    let (success, stdout, stderr) = run_cli(&[
        "inspect",
        "--database",
        fx.db_path.to_str().unwrap(),
    ]);
    assert!(success, "inspect failed: {}", stderr);
    let combined = format!("{}{}", stdout, stderr);
    assert!(combined.contains("v10"), "histogram should mention v10: {}", combined);
    assert!(combined.contains("unsupported"), "histogram should count unsupported: {}", combined);
}

#[test]
fn missing_database_is_a_clean_error() {
    let dir = tempfile::tempdir().unwrap();
    let (success, stdout, stderr) = run_cli(&[
        "inspect",
        "--database",
        dir.path().join("absent.db").to_str().unwrap(),
    ]);
    assert!(!success);
    let combined = format!("{}{}", stdout, stderr);
    assert!(combined.contains("not found"), "unexpected error text: {}", combined);
}
