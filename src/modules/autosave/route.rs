use actix_web::web;

use crate::modules::autosave::handle::*;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/save-changes")
            .route(web::post().to(save_changes))
            .route(web::get().to(get_history)),
    )
    .service(web::resource("/save-status").route(web::get().to(get_save_status)));
}
