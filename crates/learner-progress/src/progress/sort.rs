use super::views::LearnerProgressView;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Asc => "Low to High",
            Self::Desc => "High to Low",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for any direction literal other than `asc` or `desc`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sort direction must be 'asc' or 'desc', got '{0}'")]
pub struct InvalidSortDirection(pub String);

impl FromStr for SortDirection {
    type Err = InvalidSortDirection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(InvalidSortDirection(other.to_string())),
        }
    }
}

/// Returns the views reordered by average progress. Equal averages keep their input order.
pub fn sort_by_progress(
    views: &[LearnerProgressView],
    direction: SortDirection,
) -> Vec<LearnerProgressView> {
    let mut sorted = views.to_vec();
    match direction {
        SortDirection::Asc => {
            sorted.sort_by(|a, b| a.average_progress.total_cmp(&b.average_progress))
        }
        SortDirection::Desc => {
            sorted.sort_by(|a, b| b.average_progress.total_cmp(&a.average_progress))
        }
    }
    sorted
}
