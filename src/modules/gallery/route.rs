use actix_web::web;

use crate::modules::gallery::handle::*;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/galleries")
            .route(web::get().to(list_galleries))
            .route(web::post().to(create_gallery))
            .route(web::put().to(update_gallery))
            .route(web::delete().to(delete_gallery)),
    );
}

pub fn public_api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/galleries").route(web::get().to(list_public_galleries)))
        .service(web::resource("/galleries/{slug}").route(web::get().to(get_public_gallery)));
}
