use std::sync::Arc;

use log::info;
use yamdb_core::error::Result;
use yamdb_core::models::{Category, Genre, Title};
use yamdb_core::traits::CatalogRepo;
use yamdb_core::validation::FieldRules;

use crate::checked;

pub struct CatalogService {
    repo: Arc<dyn CatalogRepo>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepo>) -> Self {
        Self { repo }
    }

    pub async fn create_category(&self, name: &str, slug: &str) -> Result<Category> {
        let category = Category::new(name, slug);
        checked("category", category.check_fields())?;
        self.repo.create_category(category.clone()).await?;
        info!("category `{}` created", category.slug);
        Ok(category)
    }

    pub async fn create_genre(&self, name: &str, slug: &str) -> Result<Genre> {
        let genre = Genre::new(name, slug);
        checked("genre", genre.check_fields())?;
        self.repo.create_genre(genre.clone()).await?;
        info!("genre `{}` created", genre.slug);
        Ok(genre)
    }

    /// Checks fields and the release year before the title is stored.
    pub async fn create_title(&self, mut title: Title) -> Result<Title> {
        checked("title", title.full_clean())?;
        self.repo.create_title(title.clone()).await?;
        info!("title `{}` created", title.name);
        Ok(title)
    }

    pub async fn update_title(&self, mut title: Title) -> Result<Title> {
        checked("title", title.full_clean())?;
        self.repo.update_title(title.clone()).await?;
        Ok(title)
    }
}
