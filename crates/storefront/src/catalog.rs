//! Read-only catalog views: text filtering and sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use lesson_shop_core::Lesson;

/// Lesson attribute to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Subject,
    Location,
    Price,
    Spaces,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Subject, Self::Location, Self::Price, Self::Spaces];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Location => "location",
            Self::Price => "price",
            Self::Spaces => "spaces",
        }
    }

    /// Compare two lessons on this attribute. Text compares case-insensitively.
    fn compare(self, a: &Lesson, b: &Lesson) -> Ordering {
        match self {
            Self::Subject => a.subject.to_lowercase().cmp(&b.subject.to_lowercase()),
            Self::Location => a.location.to_lowercase().cmp(&b.location.to_lowercase()),
            Self::Price => a.price.cmp(&b.price),
            Self::Spaces => a.spaces.cmp(&b.spaces),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown sort key '{s}' (expected subject, location, price or spaces)")
            })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort direction '{other}' (expected asc or desc)")),
        }
    }
}

/// Key and direction together. Defaults to subject, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    fn compare(self, a: &Lesson, b: &Lesson) -> Ordering {
        let ordering = self.key.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Whether any of subject, location, price or spaces contains `needle`.
///
/// `needle` must already be lowercase. Numbers are matched on their text form,
/// so `"42"` matches a price of 42.
fn matches_query(lesson: &Lesson, needle: &str) -> bool {
    lesson.subject.to_lowercase().contains(needle)
        || lesson.location.to_lowercase().contains(needle)
        || lesson.price.to_string().contains(needle)
        || lesson.spaces.to_string().contains(needle)
}

/// Lessons matching `query`, case-insensitively. An empty query keeps all.
#[must_use]
pub fn filter_lessons<'a>(lessons: &'a [Lesson], query: &str) -> Vec<&'a Lesson> {
    if query.is_empty() {
        return lessons.iter().collect();
    }

    let needle = query.to_lowercase();
    lessons
        .iter()
        .filter(|lesson| matches_query(lesson, &needle))
        .collect()
}

/// Sort in place. Equal lessons keep their relative order.
pub fn sort_lessons(lessons: &mut [&Lesson], order: SortOrder) {
    lessons.sort_by(|a, b| order.compare(a, b));
}

/// Filter then sort, returning owned lessons ready for display.
#[must_use]
pub fn visible_lessons(lessons: &[Lesson], query: &str, order: SortOrder) -> Vec<Lesson> {
    let mut visible = filter_lessons(lessons, query);
    sort_lessons(&mut visible, order);
    visible.into_iter().cloned().collect()
}
