//! Excluded-prefix file import.
//!
//! One CIDR per line. A line without a prefix length gets the family's
//! host length (/32 for IPv4, /64 for IPv6). Malformed lines are logged
//! and skipped rather than failing the whole import; a full table is a
//! hard error.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use tracing::{info, warn};

use domain::exclusion::{ExclusionError, ExclusionTables};

use crate::config::ConfigError;

/// A prefix parsed from one line, in table key form. IPv6 prefixes are
/// keyed on the top 64 bits, so lengths beyond /64 are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedPrefix {
    V4 { addr: [u8; 4], prefix_len: u8 },
    V6 { addr: [u8; 8], prefix_len: u8 },
}

/// Parse one line of a prefix file.
pub fn parse_prefix_line(line: &str) -> Result<ParsedPrefix, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidCidr {
        value: line.to_string(),
        reason,
    };

    if line.contains(':') {
        let (addr_str, prefix_len) = match line.split_once('/') {
            Some((addr, len)) => {
                let len: u8 = len
                    .parse()
                    .map_err(|_| invalid(format!("invalid prefix length: '{len}'")))?;
                (addr, len)
            }
            None => (line, 64),
        };
        if prefix_len > 64 {
            return Err(invalid(format!(
                "prefix length {prefix_len} exceeds the /64 key width"
            )));
        }
        let addr: Ipv6Addr = addr_str
            .parse()
            .map_err(|e| invalid(format!("invalid IPv6 address: {e}")))?;
        let mut key = [0u8; 8];
        key.copy_from_slice(&addr.octets()[..8]);
        Ok(ParsedPrefix::V6 {
            addr: key,
            prefix_len,
        })
    } else {
        let (addr_str, prefix_len) = match line.split_once('/') {
            Some((addr, len)) => {
                let len: u8 = len
                    .parse()
                    .map_err(|_| invalid(format!("invalid prefix length: '{len}'")))?;
                (addr, len)
            }
            None => (line, 32),
        };
        if prefix_len > 32 {
            return Err(invalid(format!("prefix length {prefix_len} must be 0-32")));
        }
        let addr: Ipv4Addr = addr_str
            .parse()
            .map_err(|e| invalid(format!("invalid IPv4 address: {e}")))?;
        Ok(ParsedPrefix::V4 {
            addr: addr.octets(),
            prefix_len,
        })
    }
}

/// Counts from one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported_v4: usize,
    pub imported_v6: usize,
    pub skipped: usize,
}

/// Import every prefix in `path` into `tables`.
///
/// Malformed and duplicate lines are skipped with a warning; blank lines
/// and `#` comments are ignored. A full exclusion table aborts the import.
pub fn import_file(path: &Path, tables: &mut ExclusionTables) -> Result<ImportSummary, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut summary = ImportSummary::default();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parsed = match parse_prefix_line(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(%e, "skipping malformed prefix line");
                summary.skipped += 1;
                continue;
            }
        };

        let inserted = match parsed {
            ParsedPrefix::V4 { addr, prefix_len } => tables.v4.insert(addr, prefix_len),
            ParsedPrefix::V6 { addr, prefix_len } => tables.v6.insert(addr, prefix_len),
        };
        match inserted {
            Ok(()) => match parsed {
                ParsedPrefix::V4 { .. } => summary.imported_v4 += 1,
                ParsedPrefix::V6 { .. } => summary.imported_v6 += 1,
            },
            Err(ExclusionError::DuplicatePrefix) => {
                warn!(line, "skipping duplicate prefix");
                summary.skipped += 1;
            }
            Err(e @ ExclusionError::TableFull { .. }) => {
                return Err(ConfigError::Validation {
                    field: "exclude_files".to_string(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                warn!(%e, line, "skipping prefix");
                summary.skipped += 1;
            }
        }
    }

    info!(
        path = %path.display(),
        imported_v4 = summary.imported_v4,
        imported_v6 = summary.imported_v6,
        skipped = summary.skipped,
        "imported exclusion prefixes"
    );
    Ok(summary)
}

/// Build the exclusion tables from every configured prefix file.
pub fn load_exclusions(paths: &[std::path::PathBuf]) -> Result<ExclusionTables, ConfigError> {
    let mut tables = ExclusionTables::default();
    for path in paths {
        import_file(path, &mut tables)?;
    }
    Ok(tables)
}
