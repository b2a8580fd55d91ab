//! Error taxonomy shared by every ledger operation.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = LedgerError> = std::result::Result<T, E>;

/// Failure raised by a registry, import, or report operation.
///
/// Every operation is all-or-nothing: when one of these is returned the
/// ledger is left exactly as it was before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A numeric, date, or month value could not be parsed.
    #[error("invalid {field} \"{value}\": {reason}")]
    Parse {
        /// Name of the input being parsed (e.g. `"daily_fee"`).
        field: &'static str,
        /// Raw input text.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A row of an event source failed to parse.
    #[error("event source line {line}: {source}")]
    ParseRow {
        /// 1-based data line number, not counting the header.
        line: u64,
        /// Underlying field or record error.
        #[source]
        source: Box<LedgerError>,
    },

    /// The CSV reader rejected a record (wrong field count, bad UTF-8, ...).
    #[error("malformed record: {0}")]
    Csv(#[from] csv::Error),

    /// A referenced VPP or site is not registered.
    #[error("unknown {kind} \"{key}\"")]
    Lookup {
        /// `"vpp"` or `"site"`.
        kind: &'static str,
        /// The name or NMI that was looked up.
        key: String,
    },

    /// The event source does not exist.
    #[error("event source not found: {}", path.display())]
    NotFound {
        /// Path that was opened.
        path: PathBuf,
    },

    /// Any other I/O failure while reading or writing.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl LedgerError {
    pub(crate) fn parse(field: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Parse {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unknown_vpp(name: &str) -> Self {
        Self::Lookup {
            kind: "vpp",
            key: name.to_string(),
        }
    }

    pub(crate) fn unknown_site(nmi: &str) -> Self {
        Self::Lookup {
            kind: "site",
            key: nmi.to_string(),
        }
    }

    /// Returns `true` for malformed-input failures, including row-level ones.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::ParseRow { .. } | Self::Csv(_))
    }

    /// Returns `true` when a VPP or site reference could not be resolved.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup { .. })
    }

    /// Returns `true` when the import source is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Parses a decimal field, rejecting NaN and infinities.
pub(crate) fn parse_decimal(field: &'static str, raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| LedgerError::parse(field, raw, e))?;
    if !value.is_finite() {
        return Err(LedgerError::parse(field, raw, "expected a finite number"));
    }
    Ok(value)
}
