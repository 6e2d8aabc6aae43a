use serde_json::{Map, Value};
use validator::Validate;

use crate::api::error;
use crate::modules::settings::schema::SiteSettings;
use crate::utils::next_timestamp;

/// Keys owned by the server; a patch never overwrites them.
const PROTECTED_KEYS: [&str; 2] = ["id", "updatedAt"];

/// `PUT /settings` accepts `{"settings": {...}}` or the bare object.
pub fn extract_patch(body: Value) -> Result<Map<String, Value>, error::SystemError> {
    let mut object = match body {
        Value::Object(object) => object,
        _ => return Err(error::SystemError::bad_request("Settings must be a JSON object")),
    };

    match object.remove("settings") {
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(error::SystemError::bad_request("Settings must be a JSON object")),
        None => Ok(object),
    }
}

/// Shallow merge: each top-level key in `patch` replaces the stored value.
pub fn merge_settings(
    current: &SiteSettings,
    patch: Map<String, Value>,
) -> Result<SiteSettings, error::SystemError> {
    if patch.keys().all(|k| PROTECTED_KEYS.contains(&k.as_str())) {
        return Err(error::SystemError::bad_request("No fields to update"));
    }

    let mut doc = match serde_json::to_value(current)? {
        Value::Object(doc) => doc,
        _ => return Err(error::SystemError::bad_request("Stored settings are not an object")),
    };
    for (key, value) in patch {
        if PROTECTED_KEYS.contains(&key.as_str()) {
            continue;
        }
        doc.insert(key, value);
    }

    let mut merged: SiteSettings = serde_json::from_value(Value::Object(doc))
        .map_err(|e| error::SystemError::bad_request(format!("Invalid settings: {e}")))?;
    merged.validate().map_err(|e| error::SystemError::bad_request(e.to_string()))?;
    merged.updated_at = next_timestamp(current.updated_at);
    Ok(merged)
}
