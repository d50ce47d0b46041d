//! Image repository - metadata rows for uploaded employee images.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::image;
use crate::domain::Image;
use crate::errors::{AppError, AppResult};

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn insert(&self, employee_id: i32, image_path: String) -> AppResult<Image>;

    async fn list_for_employee(&self, employee_id: i32) -> AppResult<Vec<Image>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Image>>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed implementation of `ImageRepository`
pub struct ImageStore {
    db: DatabaseConnection,
}

impl ImageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImageRepository for ImageStore {
    async fn insert(&self, employee_id: i32, image_path: String) -> AppResult<Image> {
        let active_model = image::ActiveModel {
            image_path: Set(image_path),
            employee_id: Set(employee_id),
            ..Default::default()
        };
        let model = active_model.insert(&self.db).await?;
        Ok(Image::from(model))
    }

    async fn list_for_employee(&self, employee_id: i32) -> AppResult<Vec<Image>> {
        let models = image::Entity::find()
            .filter(image::Column::EmployeeId.eq(employee_id))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Image::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Image>> {
        let result = image::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Image::from))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = image::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Image"));
        }
        Ok(())
    }
}
