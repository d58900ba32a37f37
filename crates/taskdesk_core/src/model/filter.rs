//! Filter selections for the derived task views.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Category part of a filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Pass every category through.
    #[default]
    All,
    /// Keep tasks whose category equals this name exactly.
    Named(String),
}

impl CategoryFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Parses a selection value; `"Todas"` selects everything.
    pub fn parse(value: &str) -> Self {
        match value {
            "Todas" => Self::All,
            other => Self::Named(other.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }
}

/// Completion-status part of a filter selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !completed,
            Self::Completed => completed,
        }
    }
}

/// Returned when a status selection value is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusFilter(pub String);

impl Display for UnknownStatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown status filter `{}`; expected todas|pendentes|concluidas",
            self.0
        )
    }
}

impl Error for UnknownStatusFilter {}

impl FromStr for StatusFilter {
    type Err = UnknownStatusFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "todas" | "all" => Ok(Self::All),
            "pendentes" | "pending" => Ok(Self::Pending),
            "concluidas" | "concluídas" | "completed" => Ok(Self::Completed),
            _ => Err(UnknownStatusFilter(value.to_string())),
        }
    }
}

/// Full filter selection: category, then status, then text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: CategoryFilter,
    pub status: StatusFilter,
    /// Ignored when blank after trimming.
    pub search: String,
}

impl TaskFilter {
    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}
