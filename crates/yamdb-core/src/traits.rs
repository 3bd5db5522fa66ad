//! # Core Traits (Ports)
//!
//! Any persistence plugin must implement these traits to back the model.
//! Implementations own uniqueness, foreign keys and cascades; callers are
//! expected to have validated records before handing them over.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, Comment, Genre, Review, Title, User};

/// Categories, genres and the titles that reference them.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    // Category Operations
    async fn create_category(&self, category: Category) -> Result<()>;
    async fn get_category(&self, slug: &str) -> Result<Option<Category>>;
    /// Ordered by slug.
    async fn list_categories(&self) -> Result<Vec<Category>>;
    /// Rewrites name and slug of the category with `category.id`.
    async fn update_category(&self, category: Category) -> Result<()>;
    /// Titles in the category keep existing with the reference cleared.
    async fn delete_category(&self, slug: &str) -> Result<bool>;

    // Genre Operations
    async fn create_genre(&self, genre: Genre) -> Result<()>;
    async fn get_genre(&self, slug: &str) -> Result<Option<Genre>>;
    /// Ordered by slug.
    async fn list_genres(&self) -> Result<Vec<Genre>>;
    /// Rewrites name and slug of the genre with `genre.id`.
    async fn update_genre(&self, genre: Genre) -> Result<()>;
    async fn delete_genre(&self, slug: &str) -> Result<bool>;

    // Title Operations
    async fn create_title(&self, title: Title) -> Result<()>;
    async fn get_title(&self, id: Uuid) -> Result<Option<Title>>;
    /// Ordered by name.
    async fn list_titles(&self) -> Result<Vec<Title>>;
    async fn list_titles_in_category(&self, category_id: Uuid) -> Result<Vec<Title>>;
    async fn list_titles_with_genre(&self, genre_id: Uuid) -> Result<Vec<Title>>;
    /// Replaces every field, including the genre set.
    async fn update_title(&self, title: Title) -> Result<()>;
    /// Cascades to the title's reviews and their comments.
    async fn delete_title(&self, id: Uuid) -> Result<bool>;
}

/// Platform accounts.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(&self, user: User) -> Result<()>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Ordered by username.
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn update_user(&self, user: User) -> Result<()>;
    /// Cascades to every review and comment the user wrote.
    async fn delete_user(&self, id: Uuid) -> Result<bool>;
}

/// Reviews and the comments under them.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ReviewRepo: Send + Sync {
    // Review Operations
    /// Stores `review.pub_date` as given; `Review::new` stamps it with the
    /// creation time. Fails with `AppError::Conflict` if the author already
    /// reviewed the title.
    async fn create_review(&self, review: Review) -> Result<()>;
    async fn get_review(&self, id: Uuid) -> Result<Option<Review>>;
    /// Ordered by publication date, oldest first.
    async fn list_reviews(&self, title_id: Uuid) -> Result<Vec<Review>>;
    /// Writes text and score only; `pub_date` and references stay as stored.
    async fn update_review(&self, review: Review) -> Result<()>;
    async fn delete_review(&self, id: Uuid) -> Result<bool>;

    // Comment Operations
    /// Stores `comment.pub_date` as given; `Comment::new` stamps it.
    async fn create_comment(&self, comment: Comment) -> Result<()>;
    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>>;
    /// Ordered by publication date, oldest first.
    async fn list_comments(&self, review_id: Uuid) -> Result<Vec<Comment>>;
    /// Writes text only.
    async fn update_comment(&self, comment: Comment) -> Result<()>;
    async fn delete_comment(&self, id: Uuid) -> Result<bool>;
}
