//! Runtime configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

use pairledger_infra::ledgers::DEFAULT_DOCUMENT_PREFIX;

pub const BIND_VAR: &str = "PAIRLEDGER_BIND";
pub const DATA_DIR_VAR: &str = "PAIRLEDGER_DATA_DIR";
pub const DOCUMENT_PREFIX_VAR: &str = "PAIRLEDGER_DOCUMENT_PREFIX";

const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// Directory of the JSON ledger files; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    pub document_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: None,
            document_prefix: DEFAULT_DOCUMENT_PREFIX.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind = match lookup(BIND_VAR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, default = DEFAULT_BIND, "{BIND_VAR} is not a socket address; using default");
                defaults.bind
            }),
            None => defaults.bind,
        };

        let data_dir = lookup(DATA_DIR_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);
        if data_dir.is_none() {
            warn!("{DATA_DIR_VAR} not set; ledgers are kept in memory and lost on exit");
        }

        let document_prefix = match lookup(DOCUMENT_PREFIX_VAR) {
            Some(raw) if is_valid_prefix(raw.trim()) => raw.trim().to_string(),
            Some(raw) => {
                warn!(value = %raw, "{DOCUMENT_PREFIX_VAR} must be alphanumeric; using default");
                defaults.document_prefix
            }
            None => defaults.document_prefix,
        };

        Self {
            bind,
            data_dir,
            document_prefix,
        }
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric())
}
