//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{contact, projects, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Insertable struct for registering accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// Row struct for reading from the projects table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub project_url: String,
    pub category: String,
    pub created_on: NaiveDate,
    pub body: String,
    pub img_url: String,
}

/// Insertable struct for publishing projects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub author_id: i32,
    pub title: &'a str,
    pub project_url: &'a str,
    pub category: &'a str,
    pub created_on: NaiveDate,
    pub body: &'a str,
    pub img_url: &'a str,
}

/// Changeset applied when a project is edited; `created_on` is untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = projects)]
pub(crate) struct ProjectChangeset<'a> {
    pub author_id: i32,
    pub title: &'a str,
    pub project_url: &'a str,
    pub category: &'a str,
    pub body: &'a str,
    pub img_url: &'a str,
}

/// Insertable struct for contact messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contact)]
pub(crate) struct NewContactRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}
