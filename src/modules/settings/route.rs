use actix_web::web;

use crate::modules::settings::handle::*;

/// Admin-only; wrapped by the caller with the role check.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/settings")
            .route(web::get().to(get_settings))
            .route(web::put().to(update_settings)),
    );
}

pub fn public_api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/settings").route(web::get().to(get_settings)));
}
