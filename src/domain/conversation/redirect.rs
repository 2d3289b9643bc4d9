//! Redirect descriptor built once all preferences are collected.

use serde::Serialize;

/// Button label shown with the course-recommendation redirect.
pub const BUTTON_TEXT: &str = "View Recommended Courses";

/// A URL plus button label directing the user to a results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub url: String,
    pub button_text: String,
}

impl Redirect {
    /// Builds the course-search redirect from the collected preferences.
    ///
    /// Parameter order is stable (country, duration, level, course) and
    /// values are percent-encoded.
    pub fn course_search(
        base_path: &str,
        country: &str,
        duration: &str,
        level: &str,
        course: &str,
    ) -> Self {
        let url = format!(
            "{}?country={}&duration={}&level={}&course={}",
            base_path,
            urlencoding::encode(country),
            urlencoding::encode(duration),
            urlencoding::encode(level),
            urlencoding::encode(course),
        );
        Self {
            url,
            button_text: BUTTON_TEXT.to_string(),
        }
    }
}
