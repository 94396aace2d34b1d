use crate::error::{JtmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// JTM format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Version {
    /// JTM 1.0: absolute IRIs only, no `prefixes`, no `instance_of`.
    #[default]
    #[serde(rename = "1.0")]
    V1_0,
    /// JTM 1.1: adds CURIEs, `prefixes` and `instance_of`.
    #[serde(rename = "1.1")]
    V1_1,
}

impl Version {
    /// Returns the wire representation (`"1.0"` or `"1.1"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::V1_0 => "1.0",
            Version::V1_1 => "1.1",
        }
    }

    /// Whether CURIEs, `prefixes` and `instance_of` are part of the grammar.
    pub fn is_compact(&self) -> bool {
        matches!(self, Version::V1_1)
    }
}

impl FromStr for Version {
    type Err = JtmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1.0" => Ok(Version::V1_0),
            "1.1" => Ok(Version::V1_1),
            other => Err(JtmError::invalid(format!("unknown JTM version: {}", other))),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
