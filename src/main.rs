use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

mod batch;
mod crypto;
mod keyfile;
mod progress;
mod report;
mod store;

use crypto::{classify, tag_hex, AesGcmProvider, GcmScheme, ParsedCiphertext};

#[derive(Parser)]
#[command(name = "browser-credential-decrypt")]
#[command(about = "Offline decryption of credentials exported from Chromium login databases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt a Login Data database with an unwrapped master key
    Decrypt {
        /// Path to the exported "Login Data" SQLite database copy
        #[arg(short, long)]
        database: PathBuf,

        /// Path to the unwrapped 32-byte master key file (raw or base64)
        #[arg(short, long)]
        key: PathBuf,

        /// Output CSV path (header: URL,userName,pwd)
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the recovered rows as pretty JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify stored blobs by scheme tag without decrypting (no key needed)
    Inspect {
        /// Path to the exported "Login Data" SQLite database copy
        #[arg(short, long)]
        database: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Decrypt { verbose, .. } | Commands::Inspect { verbose, .. } => *verbose,
    };
    init_logging(verbose);

    match cli.command {
        Commands::Decrypt {
            database,
            key,
            output,
            json,
            ..
        } => decrypt_command(&database, &key, &output, json.as_deref()),
        Commands::Inspect { database, .. } => inspect_command(&database),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();
}

fn decrypt_command(
    database: &std::path::Path,
    key_path: &std::path::Path,
    output: &std::path::Path,
    json: Option<&std::path::Path>,
) -> Result<()> {
    let records = store::read_login_records(database)?;
    info!("🔐 Read {} stored credentials from {:?}", records.len(), database);

    let key = keyfile::read_master_key(key_path)?;

    let pb = progress::decrypt_spinner(records.len());
    let result = batch::process(&records, &key, &AesGcmProvider)?;
    progress::finish(&pb, "Decryption pass complete");
    drop(key);

    let summary = result.summary();
    info!("✅ Recovered {}/{} credentials", summary.recovered, summary.total);
    if summary.unsupported > 0 {
        warn!(
            "⚠️  {} records use an unrecognized or legacy scheme (run inspect for tags)",
            summary.unsupported
        );
    }
    if summary.auth_failed > 0 {
        warn!(
            "⚠️  {} records failed authentication (wrong key or corrupted data)",
            summary.auth_failed
        );
    }
    if summary.bad_encoding > 0 {
        warn!("⚠️  {} records decrypted to non-UTF-8 data", summary.bad_encoding);
    }

    let rows = report::emit_rows(&result);
    report::write_csv(&rows, output)?;
    info!("📄 Wrote {} rows to {:?}", rows.len(), output);

    if let Some(json_path) = json {
        report::write_json(&rows, json_path)?;
        info!("📄 Wrote JSON report to {:?}", json_path);
    }

    Ok(())
}

fn inspect_command(database: &std::path::Path) -> Result<()> {
    let records = store::read_login_records(database)?;
    info!("🔍 Classifying {} stored blobs from {:?}", records.len(), database);

    let pb = progress::record_bar(records.len() as u64);
    let mut v10 = 0usize;
    let mut v11 = 0usize;
    let mut unsupported = 0usize;
    let mut unknown_tags = BTreeSet::new();

    for record in &records {
        match classify(&record.encrypted_value) {
            ParsedCiphertext::Gcm { scheme: GcmScheme::V10, .. } => v10 += 1,
            ParsedCiphertext::Gcm { scheme: GcmScheme::V11, .. } => v11 += 1,
            ParsedCiphertext::Unsupported { tag } => {
                unsupported += 1;
                unknown_tags.insert(tag_hex(&tag));
            }
        }
        pb.inc(1);
    }
    progress::finish(&pb, "Classification complete");

    info!("📊 Scheme histogram:");
    info!("  • v10 (AES-256-GCM): {}", v10);
    info!("  • v11 (AES-256-GCM): {}", v11);
    info!("  • unsupported/legacy: {}", unsupported);
    if !unknown_tags.is_empty() {
        debug!(
            "Observed unknown tag bytes: {}",
            unknown_tags
                .iter()
                .map(|t| format!("0x{}", t))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}
