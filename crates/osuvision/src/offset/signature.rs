use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// One entry of the signature descriptor file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDescriptor {
    pub name: String,
    /// Hex bytes separated by whitespace, `??` or `?` for wildcards
    pub pattern: String,
    /// Added to the match address
    #[serde(default)]
    pub offset: i64,
    /// Match is expressed relative to the main module's load base
    #[serde(default)]
    pub rva: bool,
}

impl SignatureDescriptor {
    pub fn pattern_bytes(&self) -> Result<Vec<Option<u8>>> {
        parse_pattern(&self.pattern).map_err(|message| Error::InvalidSignature {
            name: self.name.clone(),
            message,
        })
    }
}

/// A descriptor with its pattern already parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub pattern: Vec<Option<u8>>,
    pub offset: i64,
    pub rva: bool,
}

impl TryFrom<SignatureDescriptor> for Signature {
    type Error = Error;

    fn try_from(descriptor: SignatureDescriptor) -> Result<Self> {
        let pattern = descriptor.pattern_bytes()?;
        Ok(Self {
            name: descriptor.name,
            pattern,
            offset: descriptor.offset,
            rva: descriptor.rva,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SignatureFile {
    signatures: Vec<SignatureDescriptor>,
}

/// Ordered, validated set of signatures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureCatalog {
    signatures: Vec<Signature>,
}

impl SignatureCatalog {
    /// Validate descriptors: patterns must parse and names must be unique
    pub fn from_descriptors(descriptors: Vec<SignatureDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut signatures = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if !seen.insert(descriptor.name.clone()) {
                return Err(Error::DuplicateSignature(descriptor.name));
            }
            signatures.push(Signature::try_from(descriptor)?);
        }

        Ok(Self { signatures })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: SignatureFile = serde_json::from_str(content)?;
        Self::from_descriptors(file.signatures)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.signatures.iter().find(|s| s.name == name)
    }

    /// Signatures in descriptor order
    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }
}

pub fn load_signatures<P: AsRef<Path>>(path: P) -> Result<SignatureCatalog> {
    let content = fs::read_to_string(&path)?;
    SignatureCatalog::from_json(&content)
}

pub fn parse_pattern(pattern: &str) -> std::result::Result<Vec<Option<u8>>, String> {
    let mut bytes = Vec::new();
    for token in pattern.split_whitespace() {
        if token == "??" || token == "?" {
            bytes.push(None);
            continue;
        }

        let value = u8::from_str_radix(token, 16)
            .map_err(|e| format!("invalid pattern token '{}': {}", token, e))?;
        bytes.push(Some(value));
    }

    if bytes.is_empty() {
        return Err("pattern is empty".to_string());
    }

    Ok(bytes)
}

pub fn format_pattern(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(value) => format!("{:02X}", value),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
