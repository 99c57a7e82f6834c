//! Scan cursors and offset pagination.
//!
//! Local backends paginate a filtered, sorted key list by integer offset.
//! The remote backend passes the server cursor through unchanged. In both
//! cases `0` starts a scan and, when returned, ends it.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resume point of a paginated key enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanCursor(u64);

impl ScanCursor {
    /// The cursor that begins a scan and marks its completion.
    pub const START: ScanCursor = ScanCursor(0);

    pub fn new(position: u64) -> Self {
        Self(position)
    }

    pub fn position(&self) -> u64 {
        self.0
    }

    /// Returns true when a backend reported the scan as complete.
    pub fn is_terminal(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ScanCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScanCursor {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for ScanCursor {
    fn from(position: u64) -> Self {
        Self(position)
    }
}

/// Returns one page of `keys` starting at `cursor`.
///
/// The next cursor is the offset after the page, or [`ScanCursor::START`]
/// once the page reaches the end of the list. A `limit` of zero is treated
/// as one so a scan loop always makes progress.
pub fn paginate(keys: Vec<String>, cursor: ScanCursor, limit: usize) -> (ScanCursor, Vec<String>) {
    let limit = limit.max(1);
    let total = keys.len();
    let start = usize::try_from(cursor.position())
        .unwrap_or(usize::MAX)
        .min(total);
    let end = start.saturating_add(limit).min(total);

    let page: Vec<String> = keys.into_iter().skip(start).take(end - start).collect();
    let next = if end < total {
        ScanCursor::new(end as u64)
    } else {
        ScanCursor::START
    };

    (next, page)
}
