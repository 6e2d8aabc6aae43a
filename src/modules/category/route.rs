use actix_web::web;

use crate::modules::category::handle::*;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/categories")
            .route(web::get().to(list_categories))
            .route(web::post().to(create_category))
            .route(web::put().to(update_category))
            .route(web::delete().to(delete_category)),
    );
}
