use std::sync::Arc;

use log::debug;
use uuid::Uuid;
use yamdb_core::error::{AppError, Result};
use yamdb_core::models::{Comment, Review};
use yamdb_core::traits::ReviewRepo;
use yamdb_core::validation::FieldRules;

use crate::checked;

pub struct ReviewService {
    repo: Arc<dyn ReviewRepo>,
}

impl ReviewService {
    pub fn new(repo: Arc<dyn ReviewRepo>) -> Self {
        Self { repo }
    }

    /// Stamps `pub_date` with the current time. A second review by the same
    /// author on the same title comes back as `AppError::Conflict`.
    pub async fn post_review(
        &self,
        title_id: Uuid,
        author_id: Uuid,
        text: &str,
        score: i32,
    ) -> Result<Review> {
        let review = Review::new(title_id, author_id, text, score);
        checked("review", review.check_fields())?;
        self.repo.create_review(review.clone()).await?;
        debug!("review {} posted on {title_id}", review.id);
        Ok(review)
    }

    /// Applies the given changes; `pub_date` keeps its original value.
    pub async fn edit_review(
        &self,
        id: Uuid,
        text: Option<String>,
        score: Option<i32>,
    ) -> Result<Review> {
        let mut review = self
            .repo
            .get_review(id)
            .await?
            .ok_or_else(|| AppError::not_found("Review", id))?;
        if let Some(text) = text {
            review.text = text;
        }
        if let Some(score) = score {
            review.score = score;
        }
        checked("review", review.check_fields())?;
        self.repo.update_review(review.clone()).await?;
        Ok(review)
    }

    pub async fn post_comment(&self, review_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment> {
        let comment = Comment::new(review_id, author_id, text);
        checked("comment", comment.check_fields())?;
        self.repo.create_comment(comment.clone()).await?;
        debug!("comment {} posted on review {review_id}", comment.id);
        Ok(comment)
    }
}
