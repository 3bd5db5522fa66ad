use std::collections::BTreeSet;

use async_trait::async_trait;
use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;
use yamdb_core::error::{AppError, Result};
use yamdb_core::models::{Category, Genre, Title};
use yamdb_core::traits::CatalogRepo;

use crate::{col, db_err, opt_uuid_col, uuid_col, uuid_to_blob, SqliteRepo};

fn row_to_category(row: &SqliteRow) -> Result<Category> {
    Ok(Category {
        id: uuid_col(row, "id")?,
        name: col(row, "name")?,
        slug: col(row, "slug")?,
    })
}

fn row_to_genre(row: &SqliteRow) -> Result<Genre> {
    Ok(Genre {
        id: uuid_col(row, "id")?,
        name: col(row, "name")?,
        slug: col(row, "slug")?,
    })
}

impl SqliteRepo {
    async fn genre_ids_of(&self, title_id: Uuid) -> Result<BTreeSet<Uuid>> {
        let rows = sqlx::query("SELECT genre_id FROM title_genres WHERE title_id = ?")
            .bind(uuid_to_blob(title_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(|row| uuid_col(row, "genre_id")).collect()
    }

    /// Maps title rows and attaches each title's genre set.
    async fn hydrate_titles(&self, rows: Vec<SqliteRow>) -> Result<Vec<Title>> {
        let mut titles = rows
            .iter()
            .map(|row| {
                Ok(Title {
                    id: uuid_col(row, "id")?,
                    name: col(row, "name")?,
                    year: col(row, "year")?,
                    description: col(row, "description")?,
                    category_id: opt_uuid_col(row, "category_id")?,
                    genre_ids: BTreeSet::new(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        drop(rows);

        for title in &mut titles {
            title.genre_ids = self.genre_ids_of(title.id).await?;
        }
        Ok(titles)
    }

    async fn link_genres(
        tx: &mut Transaction<'_, Sqlite>,
        title_id: Uuid,
        genre_ids: &BTreeSet<Uuid>,
    ) -> Result<()> {
        for genre_id in genre_ids {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES (?, ?)")
                .bind(uuid_to_blob(title_id))
                .bind(uuid_to_blob(*genre_id))
                .execute(&mut **tx)
                .await
                .map_err(db_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogRepo for SqliteRepo {
    async fn create_category(&self, category: Category) -> Result<()> {
        sqlx::query("INSERT INTO categories (id, name, slug) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(category.id))
            .bind(&category.name)
            .bind(&category.slug)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        debug!("created category {}", category.slug);
        Ok(())
    }

    async fn get_category(&self, slug: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, slug FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, slug FROM categories ORDER BY slug")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(row_to_category).collect()
    }

    async fn update_category(&self, category: Category) -> Result<()> {
        let done = sqlx::query("UPDATE categories SET name = ?, slug = ? WHERE id = ?")
            .bind(&category.name)
            .bind(&category.slug)
            .bind(uuid_to_blob(category.id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if done.rows_affected() == 0 {
            return Err(AppError::not_found("Category", category.id));
        }
        Ok(())
    }

    async fn delete_category(&self, slug: &str) -> Result<bool> {
        let done = sqlx::query("DELETE FROM categories WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(done.rows_affected() > 0)
    }

    async fn create_genre(&self, genre: Genre) -> Result<()> {
        sqlx::query("INSERT INTO genres (id, name, slug) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(genre.id))
            .bind(&genre.name)
            .bind(&genre.slug)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        debug!("created genre {}", genre.slug);
        Ok(())
    }

    async fn get_genre(&self, slug: &str) -> Result<Option<Genre>> {
        let row = sqlx::query("SELECT id, name, slug FROM genres WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_genre).transpose()
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        let rows = sqlx::query("SELECT id, name, slug FROM genres ORDER BY slug")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(row_to_genre).collect()
    }

    async fn update_genre(&self, genre: Genre) -> Result<()> {
        let done = sqlx::query("UPDATE genres SET name = ?, slug = ? WHERE id = ?")
            .bind(&genre.name)
            .bind(&genre.slug)
            .bind(uuid_to_blob(genre.id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if done.rows_affected() == 0 {
            return Err(AppError::not_found("Genre", genre.id));
        }
        Ok(())
    }

    async fn delete_genre(&self, slug: &str) -> Result<bool> {
        let done = sqlx::query("DELETE FROM genres WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(done.rows_affected() > 0)
    }

    /// Inserts the title and its genre links in one transaction, so an
    /// unknown genre leaves no half-written title behind.
    async fn create_title(&self, title: Title) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO titles (id, name, year, description, category_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(title.id))
        .bind(&title.name)
        .bind(title.year)
        .bind(&title.description)
        .bind(title.category_id.map(uuid_to_blob))
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        Self::link_genres(&mut tx, title.id, &title.genre_ids).await?;

        tx.commit().await.map_err(db_err)?;
        debug!("created title {} ({})", title.name, title.id);
        Ok(())
    }

    async fn get_title(&self, id: Uuid) -> Result<Option<Title>> {
        let row = sqlx::query("SELECT * FROM titles WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => Ok(self.hydrate_titles(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_titles(&self) -> Result<Vec<Title>> {
        let rows = sqlx::query("SELECT * FROM titles ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        self.hydrate_titles(rows).await
    }

    async fn list_titles_in_category(&self, category_id: Uuid) -> Result<Vec<Title>> {
        let rows = sqlx::query("SELECT * FROM titles WHERE category_id = ? ORDER BY name, id")
            .bind(uuid_to_blob(category_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        self.hydrate_titles(rows).await
    }

    async fn list_titles_with_genre(&self, genre_id: Uuid) -> Result<Vec<Title>> {
        let rows = sqlx::query(
            "SELECT t.* FROM titles t JOIN title_genres tg ON tg.title_id = t.id \
             WHERE tg.genre_id = ? ORDER BY t.name, t.id",
        )
        .bind(uuid_to_blob(genre_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        self.hydrate_titles(rows).await
    }

    async fn update_title(&self, title: Title) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let done = sqlx::query(
            "UPDATE titles SET name = ?, year = ?, description = ?, category_id = ? WHERE id = ?",
        )
        .bind(&title.name)
        .bind(title.year)
        .bind(&title.description)
        .bind(title.category_id.map(uuid_to_blob))
        .bind(uuid_to_blob(title.id))
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if done.rows_affected() == 0 {
            return Err(AppError::not_found("Title", title.id));
        }

        sqlx::query("DELETE FROM title_genres WHERE title_id = ?")
            .bind(uuid_to_blob(title.id))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        Self::link_genres(&mut tx, title.id, &title.genre_ids).await?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn delete_title(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM titles WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        debug!("deleted title {id}: {} row(s)", done.rows_affected());
        Ok(done.rows_affected() > 0)
    }
}
