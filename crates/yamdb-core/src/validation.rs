//! # Validation
//!
//! Two tiers, both invoked explicitly by the caller before a write:
//!
//! * [`FieldRules::check_fields`] covers per-field constraints (lengths,
//!   slug format, score range).
//! * `Title::validate` and `User::validate` are the record-level rules.
//!
//! [`FieldRules::full_clean`] runs the field checks followed by the
//! record-level rule. Storage never calls any of this on its own.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::{Category, Comment, Genre, IdentityRecord, Review, Title, User};

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Field-level constraints of a record.
pub trait FieldRules {
    fn check_fields(&self) -> Result<()>;

    /// Field checks plus any record-level rule. Records without one only
    /// run their field checks.
    fn full_clean(&mut self) -> Result<()> {
        self.check_fields()
    }
}

fn check_required(field: &str, value: &str, max: usize) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    check_max(field, value, max)
}

fn check_max(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(AppError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn check_slug(slug: &str) -> Result<()> {
    check_required("slug", slug, SLUG_LENGTH)?;
    if !SLUG_RE.is_match(slug) {
        return Err(AppError::validation(
            "slug may contain only letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}

/// Checks a release year against an explicit current year.
pub fn validate_year(year: i32, current_year: i32) -> Result<()> {
    if year < 0 {
        Err(AppError::validation("year cannot be negative"))
    } else if year > current_year {
        Err(AppError::validation("year cannot exceed current year"))
    } else {
        Ok(())
    }
}

pub fn validate_score(score: i32) -> Result<()> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(AppError::validation(format!(
            "score must be between {SCORE_MIN} and {SCORE_MAX}"
        )));
    }
    Ok(())
}

/// Lowercases the domain part of an address, leaving the local part alone.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

impl FieldRules for Category {
    fn check_fields(&self) -> Result<()> {
        check_required("name", &self.name, NAME_LENGTH)?;
        check_slug(&self.slug)
    }
}

impl FieldRules for Genre {
    fn check_fields(&self) -> Result<()> {
        check_required("name", &self.name, NAME_LENGTH)?;
        check_slug(&self.slug)
    }
}

impl Title {
    /// Rejects years before 0 or after the current calendar year (UTC).
    pub fn validate(&self) -> Result<()> {
        validate_year(self.year, Utc::now().year())
    }
}

impl FieldRules for Title {
    fn check_fields(&self) -> Result<()> {
        check_required("name", &self.name, NAME_LENGTH)
    }

    fn full_clean(&mut self) -> Result<()> {
        self.check_fields()?;
        self.validate()
    }
}

impl IdentityRecord {
    /// Base identity clean step. NFKC-normalizes the username and
    /// normalizes the email; never fails.
    pub fn clean(&mut self) {
        self.username = self.username.nfkc().collect();
        self.email = normalize_email(&self.email);
    }

    fn check_fields(&self) -> Result<()> {
        check_required("username", &self.username, USERNAME_LENGTH)?;
        if !USERNAME_RE.is_match(&self.username) {
            return Err(AppError::validation(
                "username may contain only letters, digits and @/./+/-/_",
            ));
        }
        check_required("email", &self.email, EMAIL_LENGTH)?;
        if !EMAIL_RE.is_match(&self.email) {
            return Err(AppError::validation("enter a valid email address"));
        }
        check_max("first_name", &self.first_name, PERSON_NAME_LENGTH)?;
        check_max("last_name", &self.last_name, PERSON_NAME_LENGTH)
    }
}

impl User {
    /// Runs the base identity clean step, then rejects the reserved username.
    pub fn validate(&mut self) -> Result<()> {
        self.identity.clean();
        if self.identity.username == RESERVED_USERNAME {
            return Err(AppError::validation(format!(
                "`{RESERVED_USERNAME}` cannot be used as a username"
            )));
        }
        Ok(())
    }
}

impl FieldRules for User {
    fn check_fields(&self) -> Result<()> {
        self.identity.check_fields()?;
        check_max("confirmation_code", &self.confirmation_code, CODE_LENGTH)
    }

    fn full_clean(&mut self) -> Result<()> {
        self.check_fields()?;
        self.validate()
    }
}

impl FieldRules for Review {
    fn check_fields(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(AppError::validation("text must not be empty"));
        }
        validate_score(self.score)
    }
}

impl FieldRules for Comment {
    fn check_fields(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(AppError::validation("text must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn this_year() -> i32 {
        Utc::now().year()
    }

    #[test]
    fn test_title_year_bounds() {
        assert!(Title::new("Old", 0).validate().is_ok());
        assert!(Title::new("Now", this_year()).validate().is_ok());

        let err = Title::new("Negative", -1).validate().unwrap_err();
        assert_eq!(err, AppError::validation("year cannot be negative"));

        let err = Title::new("Future", this_year() + 1).validate().unwrap_err();
        assert_eq!(err, AppError::validation("year cannot exceed current year"));
    }

    #[test]
    fn test_validate_year_against_fixed_clock() {
        assert!(validate_year(1999, 2000).is_ok());
        assert!(validate_year(2000, 2000).is_ok());
        assert!(validate_year(2001, 2000).is_err());
        assert!(validate_year(i32::MIN, 2000).is_err());
    }

    #[test]
    fn test_reserved_username_rejected() {
        let mut user = User::new("me", "me@example.com");
        let err = user.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("`me`"));
    }

    #[test]
    fn test_username_match_is_exact() {
        for name in ["Me", "ME", "me2", "meme", " me", "m"] {
            let mut user = User::new(name, "x@example.com");
            assert!(user.validate().is_ok(), "{name} should be allowed");
        }
    }

    #[test]
    fn test_compatibility_forms_of_reserved_username_rejected() {
        // Fullwidth "ｍｅ" folds to "me" under NFKC.
        let mut user = User::new("\u{FF4D}\u{FF45}", "x@example.com");
        assert!(user.validate().is_err());
        assert_eq!(user.username(), "me");
    }

    #[test]
    fn test_clean_normalizes_username() {
        let mut user = User::new("\u{FF41}lice", "alice@example.com");
        user.validate().unwrap();
        assert_eq!(user.username(), "alice");
    }

    #[test]
    fn test_user_validate_normalizes_email_domain() {
        let mut user = User::new("alice", "Alice@Example.COM");
        user.validate().unwrap();
        assert_eq!(user.email(), "Alice@example.com");
    }

    #[test]
    fn test_score_bounds_inclusive() {
        let title = Uuid::now_v7();
        let author = Uuid::now_v7();
        for score in [1, 5, 10] {
            assert!(Review::new(title, author, "ok", score).check_fields().is_ok());
        }
        for score in [0, 11, -3] {
            assert!(Review::new(title, author, "ok", score).check_fields().is_err());
        }
    }

    #[test]
    fn test_empty_text_rejected() {
        let review = Review::new(Uuid::now_v7(), Uuid::now_v7(), "", 5);
        assert!(review.check_fields().is_err());
        let comment = Comment::new(Uuid::now_v7(), Uuid::now_v7(), "");
        assert!(comment.check_fields().is_err());
    }

    #[test]
    fn test_slug_format_and_length() {
        assert!(Category::new("Films", "films").check_fields().is_ok());
        assert!(Genre::new("Sci-Fi", "sci-fi_2").check_fields().is_ok());
        assert!(Genre::new("Bad", "no spaces").check_fields().is_err());
        assert!(Genre::new("Bad", "").check_fields().is_err());
        let long = "a".repeat(SLUG_LENGTH + 1);
        assert!(Category::new("Long", long).check_fields().is_err());
        assert!(Category::new("", "empty-name").check_fields().is_err());
    }

    #[test]
    fn test_user_field_rules() {
        assert!(User::new("alice.b+1@x", "alice@example.com").check_fields().is_ok());
        assert!(User::new("bad name", "alice@example.com").check_fields().is_err());
        assert!(User::new("alice", "not-an-email").check_fields().is_err());

        let mut user = User::new("alice", "alice@example.com");
        user.confirmation_code = "x".repeat(CODE_LENGTH + 1);
        assert!(user.check_fields().is_err());
    }

    #[test]
    fn test_full_clean_runs_record_rule() {
        let mut title = Title::new("Future", this_year() + 5);
        assert!(title.check_fields().is_ok());
        assert!(title.full_clean().is_err());

        let mut user = User::new("me", "me@example.com");
        assert!(user.check_fields().is_ok());
        assert!(user.full_clean().is_err());
    }
}
