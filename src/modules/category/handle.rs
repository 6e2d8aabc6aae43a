use actix_web::web;

use crate::api::{error, success};
use crate::modules::category::model::{CreateCategoryModel, UpdateCategoryModel};
use crate::modules::category::schema::CategoryEntity;
use crate::modules::category::service::CategoryService;
use crate::utils::{IdQuery, ValidatedJson, ValidatedQuery};

pub async fn list_categories(
    service: web::Data<CategoryService>,
) -> Result<success::Success<Vec<CategoryEntity>>, error::Error> {
    let categories = service.list().await?;
    Ok(success::Success::ok(Some(categories)))
}

pub async fn create_category(
    service: web::Data<CategoryService>,
    body: ValidatedJson<CreateCategoryModel>,
) -> Result<success::Success<CategoryEntity>, error::Error> {
    let category = service.create(body.0).await?;
    Ok(success::Success::created(Some(category)).message("Category created successfully"))
}

pub async fn update_category(
    service: web::Data<CategoryService>,
    body: ValidatedJson<UpdateCategoryModel>,
) -> Result<success::Success<CategoryEntity>, error::Error> {
    let category = service.update(body.0).await?;
    Ok(success::Success::ok(Some(category)).message("Category updated successfully"))
}

pub async fn delete_category(
    service: web::Data<CategoryService>,
    query: ValidatedQuery<IdQuery>,
) -> Result<success::Success<()>, error::Error> {
    service.delete(&query.0.id).await?;
    Ok(success::Success::ok(None).message("Category deleted successfully"))
}
