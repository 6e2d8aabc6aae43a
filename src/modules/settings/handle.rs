use actix_web::web;

use crate::api::{error, success};
use crate::modules::settings::schema::SiteSettings;
use crate::modules::settings::service::SettingsService;

pub async fn get_settings(
    service: web::Data<SettingsService>,
) -> Result<success::Success<SiteSettings>, error::Error> {
    let settings = service.get().await?;
    Ok(success::Success::ok(Some(settings)))
}

pub async fn update_settings(
    service: web::Data<SettingsService>,
    body: web::Json<serde_json::Value>,
) -> Result<success::Success<SiteSettings>, error::Error> {
    let settings = service.update(body.into_inner()).await?;
    Ok(success::Success::ok(Some(settings)).message("Settings updated successfully"))
}
