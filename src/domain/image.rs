//! Uploaded image metadata.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An uploaded image belonging to an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: i32,
    pub image_path: String,
    pub employee_id: i32,
}
