use actix_web::web;

use crate::api::{error, success};
use crate::modules::autosave::model::{SaveChangesModel, SaveOutcome, SaveResult, SaveStatus};
use crate::modules::autosave::service::AutoSave;
use crate::modules::version_control::CommitInfo;
use validator::Validate;

pub async fn save_changes(
    service: web::Data<AutoSave>,
    body: web::Bytes,
) -> Result<success::Success<SaveResult>, error::Error> {
    // the body is optional
    let model = if body.iter().all(u8::is_ascii_whitespace) {
        SaveChangesModel::default()
    } else {
        serde_json::from_slice::<SaveChangesModel>(&body)
            .map_err(|e| error::Error::bad_request(e.to_string()))?
    };
    model.validate().map_err(|e| error::Error::bad_request(e.to_string()))?;
    match service.save_with_changes(model.message, model.changes).await? {
        SaveOutcome::Saved { commit } => Ok(success::Success::ok(Some(SaveResult {
            commit_hash: Some(commit),
        }))
        .message("Changes saved successfully")),
        SaveOutcome::Clean => {
            Ok(success::Success::ok(Some(SaveResult { commit_hash: None }))
                .message("No changes to save"))
        }
        SaveOutcome::AlreadySaving => Err(error::Error::conflict("A save is already in progress")),
    }
}

pub async fn get_history(
    service: web::Data<AutoSave>,
) -> Result<success::Success<Vec<CommitInfo>>, error::Error> {
    let commits = service.history().await?;
    Ok(success::Success::ok(Some(commits)))
}

pub async fn get_save_status(
    service: web::Data<AutoSave>,
) -> Result<success::Success<SaveStatus>, error::Error> {
    Ok(success::Success::ok(Some(service.status())))
}
