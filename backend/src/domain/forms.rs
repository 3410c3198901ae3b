//! Form input validation.
//!
//! Each of the four forms (project, registration, login, contact) has a raw
//! input struct holding exactly what the browser submitted and a `validate`
//! method producing either a trusted domain record or [`FormErrors`]. Nothing
//! here touches the store.
//!
//! Error wording follows the messages visitors already know from the site:
//! `This field is required.`, `Invalid URL.` and `Not a valid choice.`.

use std::fmt;

use serde::Deserialize;
use zeroize::Zeroizing;

use super::auth::{LoginCredentials, Registration};
use super::contact::{CONTACT_FIELD_MAX, CONTACT_MESSAGE_MAX, ContactDraft};
use super::project::{Category, PROJECT_FIELD_MAX, ProjectDraft, ProjectValidationError, WebUrl};
use super::user::{DisplayName, EmailAddress, USER_FIELD_MAX};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL.";
pub const INVALID_CHOICE_MESSAGE: &str = "Not a valid choice.";

/// Field name paired with the label shown next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
}

impl Field {
    #[must_use]
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }
}

/// Shared surface of the four form shapes.
pub trait Form {
    /// Fields in display order.
    const FIELDS: &'static [Field];

    /// Submitted value of `field`, for re-rendering. Secrets are never echoed.
    fn value(&self, field: &str) -> &str;

    /// Label for `name`, falling back to the name itself.
    fn label(name: &str) -> &str {
        Self::FIELDS
            .iter()
            .find(|field| field.name == name)
            .map_or(name, |field| field.label)
    }
}

/// Per-field validation messages in field declaration order.
///
/// ## Invariants
/// - Every recorded field has at least one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: Vec<(&'static str, Vec<String>)>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message for one field.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Append `message` to the messages recorded for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field, vec![message])),
        }
    }

    /// Record the error of `result` against `field`, passing a success through.
    fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for `field`; empty when the field passed.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map_or(&[], |(_, messages)| messages.as_slice())
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        !self.messages(field).is_empty()
    }

    /// Iterate `(field, messages)` pairs in declaration order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (*name, messages.as_slice()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

fn required(value: &str) -> Result<&str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(REQUIRED_MESSAGE.to_owned())
    } else {
        Ok(trimmed)
    }
}

fn at_most(value: &str, max: usize) -> Result<&str, String> {
    if value.chars().count() > max {
        Err(format!("Field cannot be longer than {max} characters."))
    } else {
        Ok(value)
    }
}

fn web_url(value: &str) -> Result<WebUrl, String> {
    WebUrl::new(value).map_err(|err| match err {
        ProjectValidationError::UrlTooLong { max } => {
            format!("Field cannot be longer than {max} characters.")
        }
        _ => INVALID_URL_MESSAGE.to_owned(),
    })
}

fn category(value: &str) -> Result<Category, String> {
    Category::parse(value).map_err(|_| INVALID_CHOICE_MESSAGE.to_owned())
}

/// Raw project form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub title: String,
    pub project_url: String,
    pub category: String,
    pub img_url: String,
    pub body: String,
}

impl Form for ProjectInput {
    const FIELDS: &'static [Field] = &[
        Field::new("title", "Project Title"),
        Field::new("project_url", "Project Url"),
        Field::new("category", "Category"),
        Field::new("img_url", "Project Image URL"),
        Field::new("body", "Project Content"),
    ];

    fn value(&self, field: &str) -> &str {
        match field {
            "title" => &self.title,
            "project_url" => &self.project_url,
            "category" => &self.category,
            "img_url" => &self.img_url,
            "body" => &self.body,
            _ => "",
        }
    }
}

impl ProjectInput {
    /// Pre-fill the form from stored content, as shown when editing.
    #[must_use]
    pub fn from_draft(draft: &ProjectDraft) -> Self {
        Self {
            title: draft.title.clone(),
            project_url: draft.project_url.to_string(),
            category: draft.category.as_str().to_owned(),
            img_url: draft.img_url.to_string(),
            body: draft.body.clone(),
        }
    }

    /// Validate every field, collecting all failures.
    ///
    /// # Examples
    /// ```
    /// use portfolio::domain::forms::ProjectInput;
    ///
    /// let errors = ProjectInput::default().validate().unwrap_err();
    /// assert_eq!(errors.messages("title"), ["This field is required."]);
    /// ```
    pub fn validate(&self) -> Result<ProjectDraft, FormErrors> {
        let mut errors = FormErrors::new();
        let title = errors.check(
            "title",
            required(&self.title).and_then(|value| at_most(value, PROJECT_FIELD_MAX)),
        );
        let project_url =
            errors.check("project_url", required(&self.project_url).and_then(web_url));
        let category = errors.check("category", required(&self.category).and_then(category));
        let img_url = errors.check("img_url", required(&self.img_url).and_then(web_url));
        let body = errors.check("body", required(&self.body));

        match (title, project_url, category, img_url, body) {
            (Some(title), Some(project_url), Some(category), Some(img_url), Some(_)) => {
                Ok(ProjectDraft {
                    title: title.to_owned(),
                    project_url,
                    category,
                    img_url,
                    // Rich text keeps its own whitespace.
                    body: self.body.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Raw registration form submission.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrationInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Form for RegistrationInput {
    const FIELDS: &'static [Field] = &[
        Field::new("email", "Email"),
        Field::new("password", "Password"),
        Field::new("name", "Name"),
    ];

    fn value(&self, field: &str) -> &str {
        match field {
            "email" => &self.email,
            "name" => &self.name,
            _ => "",
        }
    }
}

impl RegistrationInput {
    pub fn validate(&self) -> Result<Registration, FormErrors> {
        let mut errors = FormErrors::new();
        let email = errors.check(
            "email",
            required(&self.email)
                .and_then(|value| EmailAddress::new(value).map_err(|err| capitalise(&err))),
        );
        let password = errors.check("password", required(&self.password).map(|_| ()));
        let name = errors.check(
            "name",
            required(&self.name)
                .and_then(|value| at_most(value, USER_FIELD_MAX))
                .and_then(|value| DisplayName::new(value).map_err(|err| capitalise(&err))),
        );

        match (email, password, name) {
            (Some(email), Some(()), Some(name)) => Ok(Registration {
                email,
                password: Zeroizing::new(self.password.clone()),
                name,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw login form submission.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Form for LoginInput {
    const FIELDS: &'static [Field] = &[
        Field::new("email", "Email"),
        Field::new("password", "Password"),
    ];

    fn value(&self, field: &str) -> &str {
        match field {
            "email" => &self.email,
            _ => "",
        }
    }
}

impl LoginInput {
    pub fn validate(&self) -> Result<LoginCredentials, FormErrors> {
        let mut errors = FormErrors::new();
        let email = errors.check("email", required(&self.email).map(str::to_owned));
        let password = errors.check("password", required(&self.password).map(|_| ()));

        match (email, password) {
            (Some(email), Some(())) => Ok(LoginCredentials::new(email, self.password.clone())),
            _ => Err(errors),
        }
    }
}

/// Raw contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Form for ContactInput {
    const FIELDS: &'static [Field] = &[
        Field::new("name", "Full Name"),
        Field::new("email", "Email"),
        Field::new("subject", "Subject"),
        Field::new("message", "Message"),
    ];

    fn value(&self, field: &str) -> &str {
        match field {
            "name" => &self.name,
            "email" => &self.email,
            "subject" => &self.subject,
            "message" => &self.message,
            _ => "",
        }
    }
}

impl ContactInput {
    /// Validate the submission. Only name and email are required.
    ///
    /// # Examples
    /// ```
    /// use portfolio::domain::forms::ContactInput;
    ///
    /// let input = ContactInput { email: "ada@example.com".into(), ..ContactInput::default() };
    /// let errors = input.validate().unwrap_err();
    /// assert!(errors.contains("name"));
    /// assert!(!errors.contains("email"));
    /// ```
    pub fn validate(&self) -> Result<ContactDraft, FormErrors> {
        let mut errors = FormErrors::new();
        let name = errors.check(
            "name",
            required(&self.name).and_then(|value| at_most(value, CONTACT_FIELD_MAX)),
        );
        let email = errors.check(
            "email",
            required(&self.email).and_then(|value| at_most(value, CONTACT_FIELD_MAX)),
        );
        let subject = errors.check("subject", at_most(self.subject.trim(), CONTACT_FIELD_MAX));
        let message = errors.check("message", at_most(&self.message, CONTACT_MESSAGE_MAX));

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) => Ok(ContactDraft {
                name: name.to_owned(),
                email: email.to_owned(),
                subject: subject.to_owned(),
                message: message.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

fn capitalise(error: &impl fmt::Display) -> String {
    let text = error.to_string();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => text,
    }
}
