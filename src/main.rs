use leptos::prelude::*;
use web_sys::{DragEvent, File, SubmitEvent, Url, Window};

mod format;
mod intake;
mod net;
mod options;
mod state;

use format::{format_dimensions_cm, format_dimensions_in, format_dimensions_px, format_file_size};
use net::{
    SubmitOutcome, SubmitResolution, download_filename, resolve_submission, submit_for_processing,
};
use options::{DEFAULT_QUALITY, DimensionUnit, SizeUnit};
use state::{AppState, ResultLink};

fn window() -> Window {
    web_sys::window().expect("window")
}

#[component]
fn App() -> impl IntoView {
    let file_ref = NodeRef::<leptos::html::Input>::new();

    let state = RwSignal::new(AppState::default());

    // the file input is the single source of the file itself; everything
    // derived from it lives in the state
    let current_file = move || {
        file_ref
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
    };

    let start_intake = move |file: File| {
        wasm_bindgen_futures::spawn_local(intake::run_intake(state, file));
    };

    // file input onchange
    let on_file_change = move |_| {
        if let Some(file) = current_file() {
            start_intake(file);
        }
    };

    // drag & drop on the upload area
    let on_drag_enter = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        state.update(|s| s.set_drag_active(true));
    };
    let on_drag_over = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        state.update(|s| s.set_drag_active(true));
    };
    let on_drag_leave = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        state.update(|s| s.set_drag_active(false));
    };
    let on_drop = {
        move |ev: DragEvent| {
            ev.prevent_default();
            ev.stop_propagation();
            state.update(|s| s.set_drag_active(false));
            let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) else {
                return;
            };
            let Some(file) = files.get(0) else { return };
            // mirror the drop into the input so submission reads the same
            // file a manual pick would
            if let Some(input) = file_ref.get() {
                input.set_files(Some(&files));
            }
            start_intake(file);
        }
    };

    let on_submit = {
        move |ev: SubmitEvent| {
            ev.prevent_default();
            let Some(file) = current_file() else { return };
            if state.try_update(|s| s.begin_submit()) != Some(true) {
                return;
            }
            let options = state.with_untracked(|s| s.options.clone());
            wasm_bindgen_futures::spawn_local(async move {
                let resolution = match submit_for_processing(&file, &options).await {
                    SubmitOutcome::Processed(blob) => {
                        match download_filename(&file.name(), &blob.type_())
                            .zip(Url::create_object_url_with_blob(&blob).ok())
                        {
                            Some((filename, url)) => SubmitResolution::Completed(ResultLink {
                                url,
                                filename,
                                size: blob.size() as u64,
                            }),
                            // a payload without a usable type or URL reads as
                            // a failed transfer
                            None => SubmitResolution::Failed,
                        }
                    }
                    SubmitOutcome::Rejected(message) => SubmitResolution::Rejected(message),
                    SubmitOutcome::TransportFailed => SubmitResolution::Failed,
                };
                state.update(|s| resolve_submission(s, resolution));
            });
        }
    };

    // option controls
    let on_width = move |ev| {
        let width = event_target_value(&ev).parse().ok();
        state.update(|s| s.options.width = width);
    };
    let on_height = move |ev| {
        let height = event_target_value(&ev).parse().ok();
        state.update(|s| s.options.height = height);
    };
    let on_unit = move |ev| {
        let unit = DimensionUnit::from_value(&event_target_value(&ev));
        state.update(|s| s.options.unit = unit);
    };
    let on_target_size = move |ev| {
        let size = event_target_value(&ev).parse().ok();
        state.update(|s| s.options.target_size = size);
    };
    let on_target_size_unit = move |ev| {
        let unit = SizeUnit::from_value(&event_target_value(&ev));
        state.update(|s| s.options.target_size_unit = unit);
    };
    let on_quality = move |ev| {
        let quality = event_target_value(&ev).parse().unwrap_or(DEFAULT_QUALITY);
        state.update(|s| s.options.quality = quality);
    };

    // derived strings; the metadata block appears as one unit once the
    // selection has decoded
    let info = Memo::new(move |_| {
        state.with(|s| {
            s.selected
                .as_ref()
                .and_then(|file| file.decoded.map(|dims| (file.name.clone(), file.size, dims)))
        })
    });
    let info_hidden = move || info.get().is_none();
    let filename = move || info.get().map(|(name, ..)| name).unwrap_or_default();
    let filesize = move || {
        info.get()
            .map(|(_, size, _)| format_file_size(size))
            .unwrap_or_default()
    };
    let dims_px = move || {
        info.get()
            .map(|(.., dims)| format_dimensions_px(dims.width, dims.height))
            .unwrap_or_default()
    };
    let dims_in = move || {
        info.get()
            .map(|(.., dims)| format_dimensions_in(dims.width, dims.height))
            .unwrap_or_default()
    };
    let dims_cm = move || {
        info.get()
            .map(|(.., dims)| format_dimensions_cm(dims.width, dims.height))
            .unwrap_or_default()
    };
    let preview_src = move || {
        state.with(|s| {
            s.selected
                .as_ref()
                .and_then(|file| file.preview.clone())
                .unwrap_or_default()
        })
    };

    let quality_locked = Memo::new(move |_| state.with(|s| s.options.size_overrides_quality()));
    let quality_text = move || state.with(|s| s.options.quality.to_string());

    let submit_disabled = move || state.with(|s| !s.trigger_enabled());
    let drag_over = move || state.with(|s| s.drag_active);
    let status_class = move || {
        state.with(|s| s.status.as_ref().map(|line| line.class()).unwrap_or(""))
    };
    let status_message = move || {
        state.with(|s| {
            s.status
                .as_ref()
                .map(|line| line.message.clone())
                .unwrap_or_default()
        })
    };
    let no_result = move || state.with(|s| s.result.is_none());
    let result_link = move || state.with(|s| s.result.clone());

    view! {
        <form id="upload-form" on:submit=on_submit>
            <div
                id="upload-area"
                class=("drag-over", drag_over)
                on:dragenter=on_drag_enter
                on:dragover=on_drag_over
                on:dragleave=on_drag_leave
                on:drop=on_drop
            >
                <p>"Drag & drop an image here, or pick one:"</p>
                <input
                    node_ref=file_ref
                    id="image-input"
                    type="file"
                    accept="image/*"
                    on:change=on_file_change
                />
            </div>

            <div id="image-info-wrapper" class=("hidden", info_hidden)>
                <img id="image-preview" alt="Preview of the selected image" src=preview_src />
                <dl class="image-meta">
                    <dt>"File"</dt>
                    <dd id="original-filename">{filename}</dd>
                    <dt>"Size"</dt>
                    <dd id="original-filesize">{filesize}</dd>
                    <dt>"Dimensions"</dt>
                    <dd id="original-dims-px">{dims_px}</dd>
                    <dd id="original-dims-in">{dims_in}</dd>
                    <dd id="original-dims-cm">{dims_cm}</dd>
                </dl>
            </div>

            <fieldset class="controls">
                <legend>"Resize"</legend>
                <label>
                    <span class="panel-label">"Width"</span>
                    <input id="target-width" type="number" min="1" placeholder="auto" on:input=on_width />
                </label>
                <label>
                    <span class="panel-label">"Height"</span>
                    <input id="target-height" type="number" min="1" placeholder="auto" on:input=on_height />
                </label>
                <label>
                    <span class="panel-label">"Unit"</span>
                    <select id="dimension-unit" on:change=on_unit>
                        <option value="px">"px"</option>
                        <option value="in">"in"</option>
                        <option value="cm">"cm"</option>
                    </select>
                </label>
            </fieldset>

            <fieldset class="controls">
                <legend>"Compress"</legend>
                <label>
                    <span class="panel-label">"Target size"</span>
                    <input id="target-size" type="number" min="1" step="any" placeholder="optional" on:input=on_target_size />
                </label>
                <select id="target-size-unit" on:change=on_target_size_unit>
                    <option value="kb">"KB"</option>
                    <option value="mb">"MB"</option>
                </select>
                <div id="quality-slider-group" class=("disabled", move || quality_locked.get())>
                    <label>
                        <span class="panel-label">"Quality"</span>
                        <input
                            id="quality"
                            type="range"
                            min="0"
                            max="100"
                            prop:value=quality_text
                            prop:disabled=move || quality_locked.get()
                            on:input=on_quality
                        />
                    </label>
                    <span id="quality-value">{quality_text}</span>
                </div>
            </fieldset>

            <button id="submit-btn" type="submit" prop:disabled=submit_disabled>
                "Process Image"
            </button>

            <div id="status-area" class=status_class>{status_message}</div>

            <div id="result-area" class=("hidden", no_result)>
                <div id="download-container">
                    {move || {
                        result_link()
                            .map(|ResultLink { url, filename, size }| {
                                view! {
                                    <a href=url download=filename>"Download Image"</a>
                                    <p>"New file size: " <strong>{format_file_size(size)}</strong></p>
                                }
                            })
                    }}
                </div>
            </div>
        </form>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("couldn't initialize logger");
    mount_to_body(|| view! { <App /> });
}
