use std::fmt::Display;
use std::str::FromStr;

use crate::error::{ReportError, Result};

/// Prefix shared by every report header tag.
pub const REPORT_HEADER_PREFIX: &str = "#:GATKReport.";

/// Serialization format versions this engine can read.
///
/// Only one version is supported. A new format is added as a new variant;
/// the header check itself never gets looser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportVersion {
    V1_1,
}

impl ReportVersion {
    pub const LATEST: ReportVersion = ReportVersion::V1_1;

    pub fn tag(&self) -> &'static str {
        match self {
            ReportVersion::V1_1 => "#:GATKReport.v1.1",
        }
    }

    pub fn from_header(header: &str) -> Result<ReportVersion> {
        //! Identify the version from a report header line such as
        //! `#:GATKReport.v1.1:3`.
        //!
        //! Fails with [`ReportError::UnsupportedVersion`] on anything but the
        //! supported tag.

        let header = header.trim();
        let tag = match header.strip_prefix(REPORT_HEADER_PREFIX) {
            Some(rest) => format!(
                "{}{}",
                REPORT_HEADER_PREFIX,
                rest.split(':').next().unwrap_or_default()
            ),
            None => header.to_string(),
        };
        tag.trim().parse()
    }
}

impl FromStr for ReportVersion {
    type Err = ReportError;

    fn from_str(tag: &str) -> Result<ReportVersion> {
        match tag {
            "#:GATKReport.v1.1" => Ok(ReportVersion::V1_1),
            other => Err(ReportError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
