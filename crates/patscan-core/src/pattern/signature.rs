use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::BytePattern;
use crate::error::{Error, Result};

/// A named pattern, as stored in a signature file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub pattern: BytePattern,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSet {
    #[serde(default)]
    pub version: String,
    pub entries: Vec<Signature>,
}

impl SignatureSet {
    pub fn entry(&self, name: &str) -> Option<&Signature> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn require(&self, name: &str) -> Result<&Signature> {
        self.entry(name)
            .ok_or_else(|| Error::SignatureNotFound(name.to_string()))
    }
}

pub fn load_signatures<P: AsRef<Path>>(path: P) -> Result<SignatureSet> {
    let content = fs::read_to_string(&path)?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}

pub fn save_signatures<P: AsRef<Path>>(path: P, signatures: &SignatureSet) -> Result<()> {
    let content = serde_json::to_string_pretty(signatures)?;
    fs::write(path, content)?;
    Ok(())
}
