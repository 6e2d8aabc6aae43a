use actix_web::web;

use crate::api::{error, success};
use crate::modules::gallery::model::{
    CreateGalleryModel, GalleryQuery, PublicGallery, UpdateGalleryModel,
};
use crate::modules::gallery::schema::GalleryEntity;
use crate::modules::gallery::service::GalleryService;
use crate::utils::{IdQuery, ValidatedJson, ValidatedQuery};

pub async fn list_galleries(
    service: web::Data<GalleryService>,
    query: ValidatedQuery<GalleryQuery>,
) -> Result<success::Success<Vec<GalleryEntity>>, error::Error> {
    let galleries = service.list(&query.0).await?;
    Ok(success::Success::ok(Some(galleries)))
}

pub async fn create_gallery(
    service: web::Data<GalleryService>,
    body: ValidatedJson<CreateGalleryModel>,
) -> Result<success::Success<GalleryEntity>, error::Error> {
    let gallery = service.create(body.0).await?;
    Ok(success::Success::created(Some(gallery)).message("Gallery created successfully"))
}

pub async fn update_gallery(
    service: web::Data<GalleryService>,
    body: ValidatedJson<UpdateGalleryModel>,
) -> Result<success::Success<GalleryEntity>, error::Error> {
    let gallery = service.update(body.0).await?;
    Ok(success::Success::ok(Some(gallery)).message("Gallery updated successfully"))
}

pub async fn delete_gallery(
    service: web::Data<GalleryService>,
    query: ValidatedQuery<IdQuery>,
) -> Result<success::Success<()>, error::Error> {
    service.delete(&query.0.id).await?;
    Ok(success::Success::ok(None).message("Gallery deleted successfully"))
}

pub async fn list_public_galleries(
    service: web::Data<GalleryService>,
) -> Result<success::Success<Vec<PublicGallery>>, error::Error> {
    let galleries = service.list_public().await?;
    Ok(success::Success::ok(Some(galleries)))
}

pub async fn get_public_gallery(
    service: web::Data<GalleryService>,
    slug: web::Path<String>,
) -> Result<success::Success<PublicGallery>, error::Error> {
    let gallery = service.get_public_by_slug(&slug).await?;
    Ok(success::Success::ok(Some(gallery)))
}
