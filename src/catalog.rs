//! Course catalog: records, category list, and the browser's filter.
//!
//! Filtering is a linear scan over a caller-owned slice: the catalog is a
//! few dozen entries and is re-filtered on every keystroke.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u32,
    pub title: String,
    pub instructor: String,
    pub duration: String,
    pub students: u32,
    pub rating: f32,
    pub price: String,
    pub level: Level,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// =============================================================================
// QUERY
// =============================================================================

/// The course browser's two toggles: selected category and search text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseQuery {
    pub category: String,
    pub search: String,
}

impl Default for CourseQuery {
    fn default() -> Self {
        Self { category: ALL_CATEGORIES.to_string(), search: String::new() }
    }
}

impl CourseQuery {
    pub fn select_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Whether `course` passes both the category and the search filter.
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        let category_ok = self.category == ALL_CATEGORIES || course.category == self.category;
        if !category_ok {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        course.title.to_lowercase().contains(&needle) || course.instructor.to_lowercase().contains(&needle)
    }
}

/// Courses matching `query`, in input order.
#[must_use]
pub fn filter_courses<'a>(courses: &'a [Course], query: &CourseQuery) -> Vec<&'a Course> {
    courses.iter().filter(|course| query.matches(course)).collect()
}

/// `"All"` followed by each distinct category in first-seen order.
#[must_use]
pub fn categories(courses: &[Course]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for course in courses {
        if !out.iter().any(|c| *c == course.category) {
            out.push(course.category.clone());
        }
    }
    out
}

// =============================================================================
// LOADING
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read a JSON array of courses from `path`.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the file cannot be read or is not a valid
/// course list.
pub async fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Course>, CatalogError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await?;
    let courses: Vec<Course> = serde_json::from_str(&raw)?;
    info!(path = %path.display(), count = courses.len(), "catalog loaded");
    Ok(courses)
}
