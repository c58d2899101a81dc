//! Search, status filter and sort over an in-memory assignment list.

use std::cmp::Ordering;

use chrono::NaiveDate;

use shared::types::{Assignment, DueStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    DueSoon,
    Overdue,
}

impl StatusFilter {
    pub fn matches(&self, status: DueStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status != DueStatus::Overdue,
            StatusFilter::DueSoon => matches!(status, DueStatus::DueSoon(_)),
            StatusFilter::Overdue => status == DueStatus::Overdue,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::DueSoon,
            StatusFilter::DueSoon => StatusFilter::Overdue,
            StatusFilter::Overdue => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::DueSoon => "Due soon",
            StatusFilter::Overdue => "Overdue",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DueDate,
    Title,
    Id,
}

impl SortKey {
    pub fn next(&self) -> Self {
        match self {
            SortKey::DueDate => SortKey::Title,
            SortKey::Title => SortKey::Id,
            SortKey::Id => SortKey::DueDate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::DueDate => "Due date",
            SortKey::Title => "Title",
            SortKey::Id => "Id",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortKey,
    pub descending: bool,
}

impl ListQuery {
    /// Filter first, then sort. Assignments with an unparseable due date sort
    /// after every dated one when sorting by due date.
    pub fn apply<'a>(&self, assignments: &'a [Assignment], today: NaiveDate) -> Vec<&'a Assignment> {
        let needle = self.search.trim().to_lowercase();

        let mut rows: Vec<&Assignment> = assignments
            .iter()
            .filter(|a| {
                needle.is_empty()
                    || a.title.to_lowercase().contains(&needle)
                    || a.description.to_lowercase().contains(&needle)
            })
            .filter(|a| self.status.matches(a.due_status(today)))
            .collect();

        rows.sort_by(|a, b| self.compare(a, b));

        rows
    }

    /// `descending` flips the key order only. Undated rows stay last either way.
    fn compare(&self, a: &Assignment, b: &Assignment) -> Ordering {
        let directed = |ordering: Ordering| {
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        };

        match self.sort {
            SortKey::DueDate => match (a.due(), b.due()) {
                (Some(x), Some(y)) => directed(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| directed(a.id.cmp(&b.id))),
            SortKey::Title => directed(
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then(a.id.cmp(&b.id)),
            ),
            SortKey::Id => directed(a.id.cmp(&b.id)),
        }
    }
}
