//! Upload service - employee image galleries.
//!
//! Each upload is written to local disk and recorded as an `images` row;
//! deletion removes both.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::UPLOAD_FOLDER_EMPLOYEES;
use crate::domain::Image;
use crate::errors::{AppResult, OptionExt};
use crate::infra::{EmployeeRepository, FileStore, ImageRepository};

#[async_trait]
pub trait UploadService: Send + Sync {
    /// Store an image for the employee
    async fn upload_image(
        &self,
        employee_id: i32,
        data: Vec<u8>,
        original_name: String,
    ) -> AppResult<Image>;

    /// All images recorded for the employee
    async fn employee_images(&self, employee_id: i32) -> AppResult<Vec<Image>>;

    /// Remove an image row and its file
    async fn delete_image(&self, image_id: i32) -> AppResult<()>;
}

/// Concrete implementation of UploadService.
pub struct ImageManager {
    employees: Arc<dyn EmployeeRepository>,
    images: Arc<dyn ImageRepository>,
    files: FileStore,
}

impl ImageManager {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        images: Arc<dyn ImageRepository>,
        files: FileStore,
    ) -> Self {
        Self {
            employees,
            images,
            files,
        }
    }
}

#[async_trait]
impl UploadService for ImageManager {
    async fn upload_image(
        &self,
        employee_id: i32,
        data: Vec<u8>,
        original_name: String,
    ) -> AppResult<Image> {
        self.employees
            .find_by_id(employee_id)
            .await?
            .ok_or_not_found("Employee")?;

        let path = self
            .files
            .save(&data, UPLOAD_FOLDER_EMPLOYEES, &original_name)
            .await?;
        self.images.insert(employee_id, path).await
    }

    async fn employee_images(&self, employee_id: i32) -> AppResult<Vec<Image>> {
        self.employees
            .find_by_id(employee_id)
            .await?
            .ok_or_not_found("Employee")?;
        self.images.list_for_employee(employee_id).await
    }

    async fn delete_image(&self, image_id: i32) -> AppResult<()> {
        let image = self
            .images
            .find_by_id(image_id)
            .await?
            .ok_or_not_found("Image")?;

        self.files.delete(&image.image_path).await?;
        self.images.delete(image_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Employee;
    use crate::errors::AppError;
    use crate::infra::{MockEmployeeRepository, MockImageRepository};
    use uuid::Uuid;

    fn temp_store() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4())))
    }

    fn existing_employee(repo: &mut MockEmployeeRepository) {
        repo.expect_find_by_id().returning(|id| {
            Ok(Some(Employee {
                id,
                full_name: "Alice Smith".to_string(),
                position: "Engineer".to_string(),
                profile_picture_path: None,
            }))
        });
    }

    #[tokio::test]
    async fn test_upload_for_unknown_employee_is_not_found() {
        let mut employees = MockEmployeeRepository::new();
        employees.expect_find_by_id().returning(|_| Ok(None));
        let mut images = MockImageRepository::new();
        images.expect_insert().never();

        let service = ImageManager::new(Arc::new(employees), Arc::new(images), temp_store());
        let result = service
            .upload_image(99, b"bytes".to_vec(), "a.png".to_string())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upload_records_saved_path() {
        let mut employees = MockEmployeeRepository::new();
        existing_employee(&mut employees);
        let mut images = MockImageRepository::new();
        images.expect_insert().returning(|employee_id, path| {
            Ok(Image {
                id: 1,
                image_path: path,
                employee_id,
            })
        });

        let service = ImageManager::new(Arc::new(employees), Arc::new(images), temp_store());
        let image = service
            .upload_image(7, b"bytes".to_vec(), "photo.png".to_string())
            .await
            .unwrap();
        assert_eq!(image.employee_id, 7);
        assert!(image.image_path.ends_with(".png"));

        tokio::fs::remove_file(&image.image_path).await.ok();
    }

    #[tokio::test]
    async fn test_delete_unknown_image_is_not_found() {
        let employees = MockEmployeeRepository::new();
        let mut images = MockImageRepository::new();
        images.expect_find_by_id().returning(|_| Ok(None));
        images.expect_delete().never();

        let service = ImageManager::new(Arc::new(employees), Arc::new(images), temp_store());
        assert!(matches!(
            service.delete_image(4).await,
            Err(AppError::NotFound(_))
        ));
    }
}
