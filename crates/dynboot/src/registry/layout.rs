//! Column layouts the registry table has used.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column layout of the registry's node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    /// Six columns without a status column. Every node counts as advertised up.
    Legacy,
    /// Seven columns, the last one carrying the advertised `UP`/`DOWN` status.
    #[default]
    Status,
}

impl TableLayout {
    pub const IPV4: usize = 0;
    pub const IPV6: usize = 1;
    pub const PORT: usize = 2;
    pub const KEY: usize = 3;
    pub const MAINTAINER: usize = 4;
    pub const LOCATION: usize = 5;
    pub const STATUS: usize = 6;

    /// Number of cells per table row.
    #[must_use]
    pub fn columns(self) -> usize {
        match self {
            TableLayout::Legacy => 6,
            TableLayout::Status => 7,
        }
    }

    /// Whether rows carry an advertised status cell.
    #[must_use]
    pub fn has_status(self) -> bool {
        matches!(self, TableLayout::Status)
    }
}

impl fmt::Display for TableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLayout::Legacy => f.write_str("legacy"),
            TableLayout::Status => f.write_str("status"),
        }
    }
}

impl FromStr for TableLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" | "6" => Ok(TableLayout::Legacy),
            "status" | "7" => Ok(TableLayout::Status),
            other => Err(format!("unknown table layout: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_counts() {
        assert_eq!(TableLayout::Legacy.columns(), 6);
        assert_eq!(TableLayout::Status.columns(), 7);
        assert!(TableLayout::STATUS < TableLayout::Status.columns());
        assert!(!TableLayout::Legacy.has_status());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("legacy".parse::<TableLayout>(), Ok(TableLayout::Legacy));
        assert_eq!("STATUS".parse::<TableLayout>(), Ok(TableLayout::Status));
        assert!("html".parse::<TableLayout>().is_err());
    }
}
