use actix_web::web;

use crate::modules::photo::handle::*;

/// Admin routes, mounted under the authenticated CMS scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/photos")
            .route(web::get().to(list_photos))
            .route(web::post().to(upload_photos))
            .route(web::put().to(update_photo))
            .route(web::delete().to(delete_photo)),
    );
}

pub fn public_api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/photos").route(web::get().to(list_public_photos)));
}

/// Static serving of stored uploads under `prefix`.
pub fn uploads_configure(prefix: String) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::resource(format!("{}/{{name}}", prefix.trim_end_matches('/')))
                .route(web::get().to(serve_upload)),
        );
    }
}
