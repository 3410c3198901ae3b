//! Portfolio projects.
//!
//! A project is written only by the administrator and read by everyone. The
//! types here are already validated; raw form input is checked in
//! [`crate::domain::forms`].

use std::fmt;

use chrono::NaiveDate;
use url::Url;

use super::user::{DisplayName, UserId};

/// Maximum stored length for titles and URLs.
pub const PROJECT_FIELD_MAX: usize = 250;

/// Display format for creation dates, e.g. `March 05, 2024`.
pub const PROJECT_DATE_FORMAT: &str = "%B %d, %Y";

/// Validation errors returned by the project value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    NonPositiveId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyUrl,
    InvalidUrl,
    UrlTooLong { max: usize },
    UnknownCategory { value: String },
    EmptyBody,
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "project id must be positive"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyUrl => write!(f, "url must not be empty"),
            Self::InvalidUrl => write!(f, "url must be absolute, e.g. https://example.com"),
            Self::UrlTooLong { max } => write!(f, "url must be at most {max} characters"),
            Self::UnknownCategory { value } => write!(f, "unknown project category: {value}"),
            Self::EmptyBody => write!(f, "body must not be empty"),
        }
    }
}

impl std::error::Error for ProjectValidationError {}

/// Store-assigned project identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(i32);

impl ProjectId {
    pub fn new(raw: i32) -> Result<Self, ProjectValidationError> {
        if raw < 1 {
            return Err(ProjectValidationError::NonPositiveId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of project shown on the portfolio page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Python,
    Wordpress,
}

impl Category {
    /// Every category in menu order.
    pub const ALL: [Category; 2] = [Category::Python, Category::Wordpress];

    /// Stored and submitted spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Wordpress => "Wordpress",
        }
    }

    /// Parse the stored spelling.
    pub fn parse(raw: &str) -> Result<Self, ProjectValidationError> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == raw)
            .ok_or_else(|| ProjectValidationError::UnknownCategory {
                value: raw.to_owned(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute URL kept exactly as entered.
///
/// Parsing normalises (a bare host gains a trailing slash), so the checked
/// input string is stored rather than the parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebUrl(String);

impl WebUrl {
    /// Validate and construct a [`WebUrl`].
    ///
    /// # Examples
    /// ```
    /// use portfolio::domain::WebUrl;
    ///
    /// let url = WebUrl::new("https://x.io").unwrap();
    /// assert_eq!(url.as_ref(), "https://x.io");
    /// assert!(WebUrl::new("not a url").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProjectValidationError::EmptyUrl);
        }
        if trimmed.chars().count() > PROJECT_FIELD_MAX {
            return Err(ProjectValidationError::UrlTooLong {
                max: PROJECT_FIELD_MAX,
            });
        }
        let parsed = Url::parse(trimmed).map_err(|_| ProjectValidationError::InvalidUrl)?;
        if !parsed.has_host() {
            return Err(ProjectValidationError::InvalidUrl);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for WebUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WebUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated project content as submitted through the project form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub project_url: WebUrl,
    pub category: Category,
    pub img_url: WebUrl,
    /// Rich text HTML produced by the editor widget.
    pub body: String,
}

/// Project to insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub draft: ProjectDraft,
    pub author: UserId,
    pub created_on: NaiveDate,
}

/// Replacement content for an existing project.
///
/// The creation date is never rewritten; the author becomes the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub id: ProjectId,
    pub draft: ProjectDraft,
    pub author: UserId,
}

/// Owning author as shown on the project page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub name: DisplayName,
}

/// Persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub draft: ProjectDraft,
    pub created_on: NaiveDate,
    pub author: Author,
}

impl Project {
    /// Creation date in the long display form.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.created_on.format(PROJECT_DATE_FORMAT).to_string()
    }
}
