use actix_web::web;

use crate::modules::stats::handle::*;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/stats").route(web::get().to(get_stats)));
}
