//! Partnership model

use serde::{Deserialize, Serialize};

/// A discount agreement with an institution
///
/// Matched by fuzzy case-insensitive name comparison against extracted or
/// declared institution names, not by foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partnership {
    pub institution_name: String,
    pub discount_percentage: u8,
    /// Contract end date, `YYYY-MM-DD`
    pub contract_end_date: String,
}

impl Partnership {
    /// Bidirectional case-insensitive substring match.
    ///
    /// Best-effort policy for AI-extracted names: either string containing
    /// the other counts as a match. Short or overlapping names can
    /// false-positive; callers take the first match in list order.
    pub fn matches_name(&self, extracted: &str) -> bool {
        let ours = self.institution_name.to_lowercase();
        let theirs = extracted.to_lowercase();
        ours.contains(&theirs) || theirs.contains(&ours)
    }
}
