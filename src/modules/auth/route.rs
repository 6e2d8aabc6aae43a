use actix_web::web;

use crate::modules::auth::handle::*;

pub fn public_api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/login", web::post().to(login)));
}
