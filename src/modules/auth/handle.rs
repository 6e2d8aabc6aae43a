use actix_web::web;

use crate::api::{error, success};
use crate::modules::auth::model::{LoginModel, LoginResponse};
use crate::modules::auth::service::AuthService;
use crate::utils::ValidatedJson;

pub async fn login(
    service: web::Data<AuthService>,
    body: ValidatedJson<LoginModel>,
) -> Result<success::Success<LoginResponse>, error::Error> {
    let response = service.login(body.0)?;
    Ok(success::Success::ok(Some(response)).message("Signin successful"))
}
