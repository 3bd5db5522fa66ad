//! # Domain Models
//!
//! These structs represent the persisted entities of YaMDb.
//! We use UUID v7 for time-ordered, globally unique identification.
//! References between records are held as ids; the persistence engine
//! resolves them and enforces the cascade rules noted on each field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// A top-level classification of titles (e.g., "Films", "Books").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Unique URL-safe key; listings are ordered by it.
    pub slug: String,
}

impl Category {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A genre tag; a title may carry any number of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Genre {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A work that can be reviewed (film, book, song...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    /// Release year. Only checked by `Title::validate`, never by storage.
    pub year: i32,
    pub description: Option<String>,
    /// Cleared (not cascaded) when the category is deleted.
    pub category_id: Option<Uuid>,
    pub genre_ids: BTreeSet<Uuid>,
}

impl Title {
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            year,
            description: None,
            category_id: None,
            genre_ids: BTreeSet::new(),
        }
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_genres(mut self, genre_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.genre_ids.extend(genre_ids);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Access level of a user on the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "user" => Ok(Role::User),
            other => Err(AppError::validation(format!("unknown role `{other}`"))),
        }
    }
}

/// The generic account record every user is built on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: Uuid,
    pub username: String,
    /// Globally unique across users.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Opaque password hash; hashing belongs to the auth layer.
    #[serde(default, skip_serializing)]
    pub password: String,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl IdentityRecord {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            password: String::new(),
            is_superuser: false,
            is_staff: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }
}

/// A platform account: the base identity plus profile and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub identity: IdentityRecord,
    pub bio: String,
    pub role: Role,
    /// One-time code for the e-mail confirmation handshake.
    #[serde(default, skip_serializing)]
    pub confirmation_code: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            identity: IdentityRecord::new(username, email),
            bio: String::new(),
            role: Role::default(),
            confirmation_code: String::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn id(&self) -> Uuid {
        self.identity.id
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.identity.is_superuser
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity.username)
    }
}

/// A user's scored opinion of a title. One per (author, title).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    /// Cascade: deleted with the title.
    pub title_id: Uuid,
    pub text: String,
    /// Cascade: deleted with the author.
    pub author_id: Uuid,
    pub score: i32,
    /// Set once at creation.
    pub pub_date: DateTime<Utc>,
}

impl Review {
    pub fn new(title_id: Uuid, author_id: Uuid, text: impl Into<String>, score: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            title_id,
            text: text.into(),
            author_id,
            score,
            pub_date: Utc::now(),
        }
    }

    /// Display label: the review text followed by the reviewed title's name.
    pub fn label(&self, title: &Title) -> String {
        format!("{} {}", self.text, title.name)
    }
}

/// A reply attached to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    /// Cascade: deleted with the review.
    pub review_id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub pub_date: DateTime<Utc>,
}

impl Comment {
    pub fn new(review_id: Uuid, author_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            review_id,
            text: text.into(),
            author_id,
            pub_date: Utc::now(),
        }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_user() {
        let user = User::new("alice", "alice@example.com");
        assert_eq!(user.role, Role::User);
        assert!(user.confirmation_code.is_empty());
        assert!(user.identity.is_active);
    }

    #[test]
    fn test_is_admin_by_role_or_superuser() {
        let admin = User::new("root", "root@example.com").with_role(Role::Admin);
        assert!(admin.is_admin());
        assert!(!admin.is_moderator());

        let mut superuser = User::new("boss", "boss@example.com");
        superuser.identity.is_superuser = true;
        assert!(superuser.is_admin());

        let moder = User::new("mod", "mod@example.com").with_role(Role::Moderator);
        assert!(moder.is_moderator());
        assert!(!moder.is_admin());
    }

    #[test]
    fn test_role_text_round_trip() {
        for role in [Role::Admin, Role::Moderator, Role::User] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("Admin".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Moderator).unwrap(), "\"moderator\"");
    }

    #[test]
    fn test_display_uses_human_name() {
        assert_eq!(Category::new("Films", "films").to_string(), "Films");
        assert_eq!(Title::new("Dune", 1965).to_string(), "Dune");
        assert_eq!(User::new("alice", "a@example.com").to_string(), "alice");
    }

    #[test]
    fn test_review_label_names_title() {
        let title = Title::new("Dune", 1965);
        let review = Review::new(title.id, Uuid::now_v7(), "Spice must flow", 9);
        assert_eq!(review.label(&title), "Spice must flow Dune");
    }

    #[test]
    fn test_user_serialization_hides_secrets() {
        let mut user = User::new("alice", "alice@example.com");
        user.confirmation_code = "123456".into();
        user.identity.password = "argon2$hash".into();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "user");
        assert!(json.get("confirmation_code").is_none());
        assert!(json.get("password").is_none());
    }
}
