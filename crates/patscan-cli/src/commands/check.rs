//! Check command implementation.

use anyhow::Result;
use owo_colors::OwoColorize;
use patscan_core::BytePattern;

/// Run the check command
pub fn run(pattern: &str) -> Result<()> {
    let pattern = BytePattern::parse(pattern)?;
    let (fixed, wildcards) = count_elements(&pattern);

    println!("{}", pattern.to_string().bold());
    println!(
        "{} bytes ({} fixed, {} wildcard)",
        pattern.len(),
        fixed,
        wildcards
    );
    Ok(())
}

fn count_elements(pattern: &BytePattern) -> (usize, usize) {
    let wildcards = pattern.elements().iter().filter(|e| e.is_none()).count();
    (pattern.len() - wildcards, wildcards)
}
