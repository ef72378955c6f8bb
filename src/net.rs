//! Submission to the processing endpoint, classification of its reply and
//! naming of the downloadable result.

use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, FormData, RequestInit, Response};

use crate::options::ProcessOptions;
use crate::state::{AppState, ResultLink};

/// Relative endpoint the form posts to.
pub const PROCESS_ENDPOINT: &str = "/process";

/// Shown for any failure of the request lifecycle itself, including a
/// rejection whose body was not JSON and a success payload that cannot be
/// turned into a download. The page does not distinguish these.
pub const NETWORK_ERROR_MESSAGE: &str = "A network error occurred. Please check your connection.";

/// Shown when the server rejects the request without a usable message.
pub const GENERIC_SERVER_ERROR: &str = "An unknown server error occurred.";

/// Outcome of one submission attempt.
pub enum SubmitOutcome {
    /// The server answered 2xx with the processed image payload.
    Processed(Blob),
    /// The server answered non-2xx; carries the message to display.
    Rejected(String),
    /// The request never completed, or a reply body could not be read.
    TransportFailed,
}

/// An outcome reduced to plain data, once the success payload has been
/// materialized into a link (or failed to).
pub enum SubmitResolution {
    Completed(ResultLink),
    Rejected(String),
    Failed,
}

/// Terminal transition for one submission attempt: a completed link is
/// shown, a server message surfaces verbatim, anything else collapses into
/// the generic connectivity message.
pub fn resolve_submission(state: &mut AppState, resolution: SubmitResolution) {
    match resolution {
        SubmitResolution::Completed(link) => state.finish_submit_success(link),
        SubmitResolution::Rejected(message) => state.finish_submit_error(message),
        SubmitResolution::Failed => state.finish_submit_error(NETWORK_ERROR_MESSAGE.to_string()),
    }
}

/// Posts the file and options as multipart form data and classifies the
/// reply. Never returns an error; every failure mode collapses into one
/// of the outcome variants.
pub async fn submit_for_processing(file: &File, options: &ProcessOptions) -> SubmitOutcome {
    log::info!(
        "submitting {} ({} bytes) to {PROCESS_ENDPOINT}",
        file.name(),
        file.size()
    );
    match try_submit(file, options).await {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("request to {PROCESS_ENDPOINT} failed: {err:?}");
            SubmitOutcome::TransportFailed
        }
    }
}

async fn try_submit(file: &File, options: &ProcessOptions) -> Result<SubmitOutcome, JsValue> {
    let form = FormData::new()?;
    form.append_with_blob_and_filename("image", file, &file.name())?;
    for (name, value) in options.form_fields() {
        form.append_with_str(name, &value)?;
    }

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(form.as_ref());

    let fetched = crate::window().fetch_with_str_and_init(PROCESS_ENDPOINT, &init);
    let response: Response = JsFuture::from(fetched).await?.dyn_into()?;
    log::debug!("{PROCESS_ENDPOINT} answered {}", response.status());

    if response.ok() {
        let blob: Blob = JsFuture::from(response.blob()?).await?.dyn_into()?;
        return Ok(SubmitOutcome::Processed(blob));
    }

    let body = JsFuture::from(response.text()?).await?;
    match rejection_message(&body.as_string().unwrap_or_default()) {
        Some(message) => Ok(SubmitOutcome::Rejected(message)),
        // a rejection body that is not JSON gets the transport treatment
        None => Ok(SubmitOutcome::TransportFailed),
    }
}

/// Extracts the display message from a rejection body. `None` means the
/// body was not JSON at all; a JSON body without a usable `error` string
/// maps to the generic server-error message.
pub fn rejection_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => Some(message.to_string()),
        _ => Some(GENERIC_SERVER_ERROR.to_string()),
    }
}

/// Names the download after the original file, with a `processed_` prefix
/// and the extension the payload type calls for. `None` when the type
/// names no extension; the caller treats that as a failed transfer.
pub fn download_filename(original_name: &str, content_type: &str) -> Option<String> {
    let stem = match original_name.rfind('.') {
        Some(dot) => &original_name[..dot],
        None => original_name,
    };
    Some(format!("processed_{stem}.{}", output_extension(content_type)?))
}

/// Subtype of the payload content type, normalizing `jpeg` to `jpg`.
/// Nothing for a type without a subtype.
pub fn output_extension(content_type: &str) -> Option<String> {
    let (_, subtype) = content_type.split_once('/')?;
    Some(subtype.replacen("jpeg", "jpg", 1))
}
