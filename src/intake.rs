//! File intake: a MIME gate followed by two chained async stages, reading
//! the file into a data URL for the preview and decoding it for its pixel
//! dimensions. Every stage reports back through the state with the
//! selection id it was started for, so a completion that lands after the
//! user picked a different file is discarded instead of applied.

use js_sys::Function;
use leptos::prelude::*;
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, File, FileReader, ImageBitmap};

use crate::state::{AppState, ImageDimensions};

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Invalid file type. Please select an image.")]
    NotAnImage,
    #[error("Could not read the selected file.")]
    ReadFailed,
    #[error("Could not decode the image. The file may be corrupt.")]
    DecodeFailed,
}

/// Gate on the declared type only; sniffing the content is the server's
/// job.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Runs the full intake pipeline for one picked or dropped file.
pub async fn run_intake(state: RwSignal<AppState>, file: File) {
    let name = file.name();
    let mime = file.type_();
    if !is_image_mime(&mime) {
        log::warn!("rejected {name}: declared type {mime:?} is not an image");
        state.update(|s| s.reject_selection(IntakeError::NotAnImage.to_string()));
        return;
    }

    let size = file.size() as u64;
    let Some(id) = state.try_update(|s| s.begin_selection(&name, size)) else {
        return;
    };
    log::debug!("intake started for {name} ({size} bytes)");

    let data_url = match read_as_data_url(&file).await {
        Ok(url) => url,
        Err(err) => {
            log::warn!("read failed for {name}: {err:?}");
            state.update(|s| s.fail_intake(id, IntakeError::ReadFailed.to_string()));
            return;
        }
    };
    if state.try_update(|s| s.set_preview(id, data_url)) != Some(true) {
        // a newer selection took over while the read was in flight
        return;
    }

    match decode_dimensions(&file).await {
        Ok(dims) => {
            log::info!("decoded {name}: {}x{} px", dims.width, dims.height);
            state.update(|s| {
                s.finish_decode(id, dims);
            });
        }
        Err(err) => {
            log::warn!("decode failed for {name}: {err:?}");
            state.update(|s| s.fail_intake(id, IntakeError::DecodeFailed.to_string()));
        }
    }
}

/// Wraps a `FileReader` read into a future resolving to the data URL.
async fn read_as_data_url(file: &File) -> Result<String, JsValue> {
    let reader = FileReader::new()?;
    let target = reader.clone();
    let promise = js_sys::Promise::new(&mut |resolve: Function, reject: Function| {
        let reader = target.clone();
        let fail = reject.clone();
        let onload = Closure::once_into_js(move |_: Event| match reader.result() {
            Ok(value) => {
                let _ = resolve.call1(&JsValue::NULL, &value);
            }
            Err(err) => {
                let _ = fail.call1(&JsValue::NULL, &err);
            }
        });
        let onerror = Closure::once_into_js(move |_: Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("FileReader error"));
        });
        target.set_onload(Some(onload.unchecked_ref()));
        target.set_onerror(Some(onerror.unchecked_ref()));
    });
    reader.read_as_data_url(file)?;
    JsFuture::from(promise)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("FileReader produced a non-string result"))
}

/// Decodes the image far enough to learn its natural size.
async fn decode_dimensions(file: &File) -> Result<ImageDimensions, JsValue> {
    let promise = crate::window().create_image_bitmap_with_blob(file)?;
    let bitmap: ImageBitmap = JsFuture::from(promise).await?.dyn_into()?;
    let dims = ImageDimensions {
        width: bitmap.width(),
        height: bitmap.height(),
    };
    // only the dimensions are needed; release the pixel data right away
    bitmap.close();
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_image_types_pass_the_gate() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("image/svg+xml"));
        assert!(is_image_mime("image/x-obscure"));
    }

    #[test]
    fn everything_else_is_rejected() {
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime("text/html"));
        assert!(!is_image_mime(""));
        // the gate is case-sensitive, like the page it replaces
        assert!(!is_image_mime("IMAGE/PNG"));
    }

    #[test]
    fn intake_errors_read_as_user_facing_messages() {
        assert_eq!(
            IntakeError::NotAnImage.to_string(),
            "Invalid file type. Please select an image."
        );
        assert_eq!(
            IntakeError::ReadFailed.to_string(),
            "Could not read the selected file."
        );
        assert_eq!(
            IntakeError::DecodeFailed.to_string(),
            "Could not decode the image. The file may be corrupt."
        );
    }
}
