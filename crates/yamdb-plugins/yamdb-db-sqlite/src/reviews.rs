use async_trait::async_trait;
use log::debug;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;
use yamdb_core::error::{AppError, Result};
use yamdb_core::models::{Comment, Review};
use yamdb_core::traits::ReviewRepo;

use crate::{col, db_err, uuid_col, uuid_to_blob, SqliteRepo};

fn row_to_review(row: &SqliteRow) -> Result<Review> {
    Ok(Review {
        id: uuid_col(row, "id")?,
        title_id: uuid_col(row, "title_id")?,
        text: col(row, "text")?,
        author_id: uuid_col(row, "author_id")?,
        score: col(row, "score")?,
        pub_date: col(row, "pub_date")?,
    })
}

fn row_to_comment(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: uuid_col(row, "id")?,
        review_id: uuid_col(row, "review_id")?,
        text: col(row, "text")?,
        author_id: uuid_col(row, "author_id")?,
        pub_date: col(row, "pub_date")?,
    })
}

#[async_trait]
impl ReviewRepo for SqliteRepo {
    async fn create_review(&self, review: Review) -> Result<()> {
        sqlx::query(
            "INSERT INTO reviews (id, title_id, author_id, text, score, pub_date) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(review.id))
        .bind(uuid_to_blob(review.title_id))
        .bind(uuid_to_blob(review.author_id))
        .bind(&review.text)
        .bind(review.score)
        .bind(review.pub_date)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        debug!("created review {} on title {}", review.id, review.title_id);
        Ok(())
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>> {
        let row = sqlx::query("SELECT * FROM reviews WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_review).transpose()
    }

    async fn list_reviews(&self, title_id: Uuid) -> Result<Vec<Review>> {
        let rows = sqlx::query("SELECT * FROM reviews WHERE title_id = ? ORDER BY pub_date ASC, id ASC")
            .bind(uuid_to_blob(title_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(row_to_review).collect()
    }

    async fn update_review(&self, review: Review) -> Result<()> {
        let done = sqlx::query("UPDATE reviews SET text = ?, score = ? WHERE id = ?")
            .bind(&review.text)
            .bind(review.score)
            .bind(uuid_to_blob(review.id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if done.rows_affected() == 0 {
            return Err(AppError::not_found("Review", review.id));
        }
        Ok(())
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(done.rows_affected() > 0)
    }

    async fn create_comment(&self, comment: Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, review_id, author_id, text, pub_date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(comment.id))
        .bind(uuid_to_blob(comment.review_id))
        .bind(uuid_to_blob(comment.author_id))
        .bind(&comment.text)
        .bind(comment.pub_date)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        debug!("created comment {} on review {}", comment.id, comment.review_id);
        Ok(())
    }

    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_comment).transpose()
    }

    async fn list_comments(&self, review_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query("SELECT * FROM comments WHERE review_id = ? ORDER BY pub_date ASC, id ASC")
            .bind(uuid_to_blob(review_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(row_to_comment).collect()
    }

    async fn update_comment(&self, comment: Comment) -> Result<()> {
        let done = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
            .bind(&comment.text)
            .bind(uuid_to_blob(comment.id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if done.rows_affected() == 0 {
            return Err(AppError::not_found("Comment", comment.id));
        }
        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(done.rows_affected() > 0)
    }
}
