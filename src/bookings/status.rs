use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Draft,
    Reserved,
    Ongoing,
    Overdue,
    Complete,
    Archived,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 7] = [
        BookingStatus::Draft,
        BookingStatus::Reserved,
        BookingStatus::Ongoing,
        BookingStatus::Overdue,
        BookingStatus::Complete,
        BookingStatus::Archived,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Draft => "DRAFT",
            BookingStatus::Reserved => "RESERVED",
            BookingStatus::Ongoing => "ONGOING",
            BookingStatus::Overdue => "OVERDUE",
            BookingStatus::Complete => "COMPLETE",
            BookingStatus::Archived => "ARCHIVED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Status filter value from a query string. Empty and "ALL" mean no filter.
    pub fn parse_filter(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return None;
        }
        value.parse().ok()
    }

    pub fn color(&self) -> &'static str {
        match self {
            BookingStatus::Draft => "#667085",
            BookingStatus::Reserved => "#175CD3",
            BookingStatus::Ongoing => "#7A5AF8",
            BookingStatus::Overdue => "#B54708",
            BookingStatus::Complete => "#17B26A",
            BookingStatus::Archived => "#667085",
            BookingStatus::Cancelled => "#667085",
        }
    }

    /// "RESERVED" -> "Reserved"
    pub fn label(&self) -> String {
        let lower = self.as_str().to_ascii_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Bookings in these states no longer hold their assets
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            BookingStatus::Complete | BookingStatus::Cancelled | BookingStatus::Archived
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
