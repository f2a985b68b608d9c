use std::fmt;
use std::str::FromStr;

use crate::errors::ProdsnapError;
use crate::models::udts::ProductVersion;

/// Once minor hits this ceiling the next label rolls over to `(major + 1).0`.
/// Closed design constant, not user-configurable.
const MINOR_CEILING: u32 = 9;

/// A `major.minor` version label. Labels order lexicographically on
/// `(major, minor)`, which matches their chronological append order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionLabel {
    pub major: u32,
    pub minor: u32,
}

impl VersionLabel {
    /// The label of the first version of any product.
    pub const INITIAL: VersionLabel = VersionLabel { major: 1, minor: 0 };

    pub fn next(&self) -> VersionLabel {
        if self.minor < MINOR_CEILING {
            VersionLabel {
                major: self.major,
                minor: self.minor + 1,
            }
        } else {
            VersionLabel {
                major: self.major + 1,
                minor: 0,
            }
        }
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionLabel {
    type Err = ProdsnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProdsnapError::MalformedVersionLabel(s.to_string());

        let (major, minor) = s.split_once('.').ok_or_else(malformed)?;
        let label = VersionLabel {
            major: major.parse().map_err(|_| malformed())?,
            minor: minor.parse().map_err(|_| malformed())?,
        };

        // `u32::parse` accepts `+` signs and leading zeros; a stored label
        // must round-trip exactly or it did not come from this sequencer.
        if label.to_string() != s {
            return Err(malformed());
        }

        Ok(label)
    }
}

/// Computes the label for the version about to be appended to `versions`.
///
/// Pure function of the existing sequence: an empty sequence yields `1.0`,
/// otherwise the last label is parsed and incremented. A last label that
/// does not parse is corrupted stored data and surfaces as
/// `MalformedVersionLabel` rather than silently restarting the counter.
pub fn next_version_label(versions: &[ProductVersion]) -> Result<VersionLabel, ProdsnapError> {
    match versions.last() {
        None => Ok(VersionLabel::INITIAL),
        Some(last) => Ok(last.version_number.parse::<VersionLabel>()?.next()),
    }
}
