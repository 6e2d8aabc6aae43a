use actix_web::web;

use crate::api::{error, success};
use crate::modules::stats::model::DashboardStats;
use crate::modules::stats::service::StatsService;

pub async fn get_stats(
    service: web::Data<StatsService>,
) -> Result<success::Success<DashboardStats>, error::Error> {
    let stats = service.dashboard().await?;
    Ok(success::Success::ok(Some(stats)))
}
