//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. Identity 1 is the administrator.
    users (id) {
        id -> Int4,
        /// Unique login email (max 100 characters).
        #[max_length = 100]
        email -> Varchar,
        /// Encoded Argon2id password hash.
        #[max_length = 255]
        password -> Varchar,
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    /// Portfolio projects.
    projects (id) {
        id -> Int4,
        author_id -> Int4,
        /// Unique title (max 250 characters).
        #[max_length = 250]
        title -> Varchar,
        #[max_length = 250]
        project_url -> Varchar,
        #[max_length = 50]
        category -> Varchar,
        created_on -> Date,
        body -> Text,
        #[max_length = 250]
        img_url -> Varchar,
    }
}

diesel::table! {
    /// Visitor messages; written only.
    contact (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 100]
        email -> Varchar,
        #[max_length = 100]
        subject -> Varchar,
        #[max_length = 1000]
        message -> Varchar,
    }
}

diesel::joinable!(projects -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(contact, projects, users);

/// Unique constraint on `users.email`.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
/// Unique constraint on `projects.title`.
pub(crate) const PROJECTS_TITLE_KEY: &str = "projects_title_key";
/// Foreign key from `projects.author_id` to `users.id`.
pub(crate) const PROJECTS_AUTHOR_FKEY: &str = "projects_author_id_fkey";
