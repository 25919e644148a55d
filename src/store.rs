//! Login Data store reader
//!
//! Reads (signon_realm, username_value, password_value) rows from the
//! `logins` table of an exported Chromium "Login Data" SQLite database and
//! materializes them as raw records for the decryption engine. The blob
//! layout stays opaque here; classification belongs to the engine.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::batch::RawCredentialRecord;

/// Read every stored login row from a Login Data database file.
///
/// The database is copied to a temporary location first; a running browser
/// keeps the original locked. The copy path is unique per call, so
/// concurrent readers never clobber each other, and the file is removed on
/// drop even when reading fails.
pub fn read_login_records(db_path: &Path) -> Result<Vec<RawCredentialRecord>> {
    if !db_path.exists() {
        return Err(anyhow!("Login database not found: {:?}", db_path));
    }

    let temp = tempfile::Builder::new()
        .prefix("login_data_")
        .suffix(".db")
        .tempfile()
        .context("Failed to create temporary database copy")?;
    fs::copy(db_path, temp.path())
        .with_context(|| format!("Failed to copy login database {:?}", db_path))?;

    read_from_copy(temp.path())
}

fn read_from_copy(path: &Path) -> Result<Vec<RawCredentialRecord>> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .context("Failed to open login database")?;

    let mut stmt = conn
        .prepare("SELECT signon_realm, username_value, password_value FROM logins")
        .context("Failed to query logins table")?;

    let rows = stmt.query_map([], |row| {
        Ok(RawCredentialRecord {
            url: row.get(0)?,
            username: row.get(1)?,
            encrypted_value: row.get(2)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.context("Failed to read login row")?);
    }

    debug!("Read {} login rows from {:?}", records.len(), path);
    Ok(records)
}
