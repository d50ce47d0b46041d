//! Uploaded image entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Image;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub image_path: String,
    pub employee_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Image {
    fn from(model: Model) -> Self {
        Image {
            id: model.id,
            image_path: model.image_path,
            employee_id: model.employee_id,
        }
    }
}
