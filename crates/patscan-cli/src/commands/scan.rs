//! Scan command implementation.
//!
//! Loads a raw memory dump as a snapshot mapped at `--base` and searches it
//! for a single pattern or every entry of a signature file.
//!
//! # Output Format
//!
//! ```text
//! GlobalObjects: 0x7FF6A1B2C3D0
//! TypeDescriptor: not found
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use patscan_core::{
    BytePattern, MemorySnapshot, Module, NativeAddress, NativeWidth, PatternScanner, Signature,
    load_signatures,
};
use tracing::{info, warn};

use super::hex_utils::{parse_hex_address, parse_size};

#[derive(Args)]
pub struct ScanArgs {
    /// Raw memory dump to scan
    #[arg(short, long, env = "PATSCAN_FILE")]
    pub file: PathBuf,

    /// Address the first byte of the dump was read from
    #[arg(
        short,
        long,
        env = "PATSCAN_BASE",
        default_value = "0",
        value_parser = parse_hex_address
    )]
    pub base: NativeAddress,

    /// Pattern such as "48 8D 0D ?? ?? ?? ??"
    #[arg(
        short,
        long,
        conflicts_with = "signatures",
        required_unless_present = "signatures"
    )]
    pub pattern: Option<BytePattern>,

    /// JSON signature file
    #[arg(short, long)]
    pub signatures: Option<PathBuf>,

    /// Only scan these entries of the signature file (repeatable)
    #[arg(short, long, requires = "signatures")]
    pub name: Vec<String>,

    /// Start of an explicit scan window (hex)
    #[arg(long, requires = "size", value_parser = parse_hex_address)]
    pub start: Option<NativeAddress>,

    /// Size of the scan window in bytes
    #[arg(long, requires = "start", value_parser = parse_size)]
    pub size: Option<usize>,

    /// Module name used in logs
    #[arg(long, default_value = "dump")]
    pub module: String,
}

/// Explicit `(start, size)` scan window
type Window = (NativeAddress, usize);

/// Run the scan command
pub async fn run(args: ScanArgs) -> Result<()> {
    let snapshot = MemorySnapshot::from_file(&args.file, args.base)
        .await
        .with_context(|| format!("Failed to load dump {}", args.file.display()))?;
    info!(
        "Loaded {} ({} bytes at {})",
        args.file.display(),
        snapshot.len(),
        snapshot.base()
    );

    let targets = resolve_targets(args.pattern, args.signatures.as_deref(), &args.name)?;
    let window = args.start.zip(args.size);
    let module = snapshot.module(args.module)?;

    let results = scan_targets(&snapshot, &module, &targets, window).await?;

    let mut found = 0;
    for (name, address) in &results {
        if address.is_null() {
            println!("{}: {}", name.bold(), "not found".red());
        } else {
            found += 1;
            println!("{}: {}", name.bold(), address.to_string().green());
        }
    }

    if found < results.len() {
        warn!("{}/{} signatures found", found, results.len());
    } else {
        info!("{}/{} signatures found", found, results.len());
    }
    Ok(())
}

fn resolve_targets(
    pattern: Option<BytePattern>,
    signatures: Option<&Path>,
    names: &[String],
) -> Result<Vec<Signature>> {
    if let Some(pattern) = pattern {
        return Ok(vec![Signature {
            name: "pattern".to_string(),
            pattern,
        }]);
    }

    let Some(path) = signatures else {
        anyhow::bail!("Either --pattern or --signatures is required");
    };
    let set = load_signatures(path)
        .with_context(|| format!("Failed to load signatures from {}", path.display()))?;
    info!(
        "Loaded {} signatures (version: {})",
        set.entries.len(),
        if set.version.is_empty() {
            "unknown"
        } else {
            set.version.as_str()
        }
    );
    if names.is_empty() {
        return Ok(set.entries);
    }
    names
        .iter()
        .map(|name| set.require(name).cloned())
        .collect::<patscan_core::Result<_>>()
        .with_context(|| format!("Signature missing from {}", path.display()))
}

/// Scan each target in order, one read per target
async fn scan_targets(
    snapshot: &MemorySnapshot<NativeWidth>,
    module: &Module<NativeWidth>,
    targets: &[Signature],
    window: Option<Window>,
) -> Result<Vec<(String, NativeAddress)>> {
    let scanner = PatternScanner::new(snapshot);
    let mut results = Vec::with_capacity(targets.len());

    for signature in targets {
        let address = match window {
            Some((start, size)) => scanner
                .find_pattern_in_range(&signature.pattern, start, size)
                .await
                .map_err(|e| {
                    if e.is_read_failure() {
                        anyhow::Error::new(e).context(format!(
                            "Window {}+{:#x} is not inside the dump",
                            start, size
                        ))
                    } else {
                        e.into()
                    }
                })?,
            None => scanner.find_signature(signature, module).await?,
        };
        results.push((signature.name.clone(), address));
    }

    Ok(results)
}
