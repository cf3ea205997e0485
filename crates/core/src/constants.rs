use std::time::Duration;

/// Remote table holding study materials
pub const NOTES_TABLE: &str = "notes";

/// Remote table holding material requests
pub const REQUESTS_TABLE: &str = "requests";

/// Remote table holding thank-you notes
pub const THANK_YOU_TABLE: &str = "thank_you_notes";

/// Grade levels in display order
pub const GRADE_ORDER: [&str; 5] = [
    "Grade 1-5",
    "Grade 6-9",
    "Grade 10",
    "Grade 11 (O/L)",
    "Grade 12-13 (A/L)",
];

/// Grade preselected on the request form
pub const DEFAULT_REQUEST_GRADE: &str = "Grade 6-9";

/// Number of rows shown on the landing listing before "show all"
pub const PREVIEW_SIZE: usize = 6;

/// Quiescence window before a filter change triggers a query
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Window used to coalesce bursts of realtime change notifications
pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(250);

/// Prefix of generated anonymous author tags
pub const ANONYMOUS_AUTHOR_PREFIX: &str = "Anon#";

/// Display name used for anonymous authors
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";
