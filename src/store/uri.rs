//! Store connection strings.
//!
//! Supported forms:
//! - `memory://` keeps documents in process memory only
//! - `file:///abs/path.json` keeps documents in memory backed by a JSON snapshot
//! - `mongodb://…` / `mongodb+srv://…` talks to a MongoDB deployment

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::store::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    Memory,
    File(PathBuf),
    /// Full connection string, handed to the driver unchanged.
    Mongo(String),
}

const MONGO_SCHEMES: [&str; 2] = ["mongodb://", "mongodb+srv://"];

impl StoreUri {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        // Seed lists (`h1,h2:27018`) are not URL hosts; leave them to the driver.
        if MONGO_SCHEMES.iter().any(|scheme| raw.starts_with(scheme)) {
            return Ok(StoreUri::Mongo(raw.to_string()));
        }

        let url = Url::parse(raw)?;
        match url.scheme() {
            "memory" => Ok(StoreUri::Memory),
            "file" => {
                let path = url.to_file_path().map_err(|_| StoreError::UnusableUri {
                    uri: raw.to_string(),
                    reason: "file URI must name an absolute local path".to_string(),
                })?;
                if path.as_os_str().is_empty() || raw.ends_with('/') {
                    return Err(StoreError::UnusableUri {
                        uri: raw.to_string(),
                        reason: "file URI must name a snapshot file".to_string(),
                    });
                }
                Ok(StoreUri::File(path))
            }
            other => Err(StoreError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl FromStr for StoreUri {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StoreUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreUri::Memory => write!(f, "memory://"),
            StoreUri::File(path) => write!(f, "file://{}", path.display()),
            StoreUri::Mongo(raw) => f.write_str(&redact_credentials(raw)),
        }
    }
}

/// Mask the `user:password@` part of a connection string.
fn redact_credentials(raw: &str) -> String {
    let Some((scheme, rest)) = raw.split_once("://") else {
        return raw.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", scheme, &rest[at + 1..]),
        None => raw.to_string(),
    }
}
