//! # Course Filters
//!
//! Name filter shared by list and count so both see the same rows.

use super::domain::Course;

/// Filters applied to list/count queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Case-insensitive name substring
    pub name: Option<String>,
}

impl Filters {
    /// Filter by name substring; empty input means no filter.
    ///
    /// Whitespace is part of the needle and is matched literally.
    pub fn by_name(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::default()
        } else {
            Self { name: Some(name) }
        }
    }

    /// Lower-cased needle, if any
    pub fn name_needle(&self) -> Option<String> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase)
    }

    /// SQL LIKE pattern for the name filter, with wildcards in the needle escaped
    pub fn name_like_pattern(&self) -> Option<String> {
        self.name_needle().map(|needle| {
            let mut escaped = String::with_capacity(needle.len() + 2);
            escaped.push('%');
            for c in needle.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped.push('%');
            escaped
        })
    }

    /// Check if a course matches all filters
    pub fn matches(&self, course: &Course) -> bool {
        match self.name_needle() {
            Some(needle) => course.name.to_lowercase().contains(&needle),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn course(name: &str) -> Course {
        let now = Utc::now();
        Course {
            id: "id".to_string(),
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filters::default().matches(&course("Anything")));
        assert_eq!(Filters::by_name(""), Filters::default());
    }

    #[test]
    fn test_whitespace_filter_is_literal() {
        let filters = Filters::by_name("   ");

        assert!(!filters.matches(&course("Anything")));
        assert!(filters.matches(&course("Go   101")));
        assert_eq!(filters.name_like_pattern().as_deref(), Some("%   %"));
    }

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let filters = Filters::by_name("GO");

        assert!(filters.matches(&course("Intro to go")));
        assert!(filters.matches(&course("Golang")));
        assert!(!filters.matches(&course("Rust")));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(
            Filters::by_name("Go").name_like_pattern().as_deref(),
            Some("%go%")
        );
        assert_eq!(
            Filters::by_name("100%_done").name_like_pattern().as_deref(),
            Some("%100\\%\\_done%")
        );
        assert_eq!(Filters::default().name_like_pattern(), None);
    }
}
