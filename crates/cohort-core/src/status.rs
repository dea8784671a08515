//! Academic outcome labels and the class-code → label mapping.
//!
//! The trained classifier emits integer class codes. Codes `0`, `1`, `2`
//! map to `Dropout`, `Enrolled`, `Graduate`; anything else maps to
//! `Unknown` so an out-of-domain code never aborts a batch.

use std::fmt;

/// Predicted academic outcome for one student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StudentStatus {
    Dropout,
    Enrolled,
    Graduate,
    /// The classifier produced a code outside the known label table.
    Unknown,
}

impl StudentStatus {
    /// Every label, in display order.
    pub const ALL: [StudentStatus; 4] = [
        Self::Dropout,
        Self::Enrolled,
        Self::Graduate,
        Self::Unknown,
    ];

    /// Map a class code from the classifier to its label.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Dropout,
            1 => Self::Enrolled,
            2 => Self::Graduate,
            _ => Self::Unknown,
        }
    }

    /// The class code for this label, if it has one.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Dropout => Some(0),
            Self::Enrolled => Some(1),
            Self::Graduate => Some(2),
            Self::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dropout => "Dropout",
            Self::Enrolled => "Enrolled",
            Self::Graduate => "Graduate",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a sequence of class codes to labels, preserving order.
pub fn label_codes(codes: &[i64]) -> Vec<StudentStatus> {
    codes.iter().map(|&c| StudentStatus::from_code(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(StudentStatus::from_code(0), StudentStatus::Dropout);
        assert_eq!(StudentStatus::from_code(1), StudentStatus::Enrolled);
        assert_eq!(StudentStatus::from_code(2), StudentStatus::Graduate);
    }

    #[test]
    fn out_of_range_codes_are_unknown() {
        for code in [-1, 3, 7, i64::MAX, i64::MIN] {
            assert_eq!(StudentStatus::from_code(code), StudentStatus::Unknown);
        }
    }

    #[test]
    fn code_round_trips_for_known_labels() {
        for status in StudentStatus::ALL {
            if let Some(code) = status.code() {
                assert_eq!(StudentStatus::from_code(code), status);
            }
        }
        assert_eq!(StudentStatus::Unknown.code(), None);
    }

    #[test]
    fn label_codes_preserves_order() {
        let labels = label_codes(&[2, 0, 9, 1]);
        let names: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["Graduate", "Dropout", "Unknown", "Enrolled"]);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(StudentStatus::Graduate.to_string(), "Graduate");
        assert_eq!(format!("{}", StudentStatus::Unknown), "Unknown");
    }
}
