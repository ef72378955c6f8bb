//! Application state for the upload form.
//!
//! Everything the page shows is derived from this one plain-data struct,
//! so the trigger-enablement rule and the handling of late async results
//! are testable without a browser. The async intake stages and the
//! submission run elsewhere and report back through the methods here.

use crate::options::ProcessOptions;

/// Status text shown while a submission is in flight.
pub const PROCESSING_MESSAGE: &str = "Processing, please wait...";

/// Identifies one file selection. Monotonic per state instance; the async
/// intake stages carry the id they were started for, and completions that
/// present an outdated id are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// The file currently held by the form, together with whatever the intake
/// stages have produced for it so far.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile {
    pub id: SelectionId,
    pub name: String,
    pub size: u64,
    /// Data URL for the preview image, once the read stage finishes.
    pub preview: Option<String>,
    /// Natural dimensions, once the decode stage finishes.
    pub decoded: Option<ImageDimensions>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Busy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Error,
}

/// One line in the status area.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusLine {
    pub fn error(message: String) -> Self {
        StatusLine { kind: StatusKind::Error, message }
    }

    pub fn class(&self) -> &'static str {
        match self.kind {
            StatusKind::Loading => "status-loading",
            StatusKind::Error => "status-error",
        }
    }
}

/// A finished processing result, ready to download.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultLink {
    /// Object URL for the processed payload.
    pub url: String,
    pub filename: String,
    pub size: u64,
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    selection_seq: u64,
    pub selected: Option<SelectedFile>,
    pub options: ProcessOptions,
    pub phase: SubmitPhase,
    pub status: Option<StatusLine>,
    pub result: Option<ResultLink>,
    pub drag_active: bool,
}

impl AppState {
    /// The submission trigger is enabled exactly when the current selection
    /// has decoded successfully and no submission is in flight.
    pub fn trigger_enabled(&self) -> bool {
        self.phase == SubmitPhase::Idle
            && self.selected.as_ref().is_some_and(|file| file.decoded.is_some())
    }

    /// Starts a new selection: bumps the generation and clears any prior
    /// status, result and intake progress. Returns the id the intake stages
    /// must present when they report back.
    pub fn begin_selection(&mut self, name: &str, size: u64) -> SelectionId {
        self.selection_seq += 1;
        let id = SelectionId(self.selection_seq);
        self.selected = Some(SelectedFile {
            id,
            name: name.to_string(),
            size,
            preview: None,
            decoded: None,
        });
        self.status = None;
        self.result = None;
        id
    }

    /// Rejects a pick before it becomes a selection. The generation still
    /// advances: the file input now holds the rejected file, so a previous
    /// selection (and any of its in-flight stages) must not keep the
    /// trigger enabled.
    pub fn reject_selection(&mut self, message: String) {
        self.selection_seq += 1;
        self.selected = None;
        self.result = None;
        self.status = Some(StatusLine::error(message));
    }

    /// Applies the read stage's data URL. Returns false when the result is
    /// stale, in which case the caller must stop the pipeline.
    pub fn set_preview(&mut self, id: SelectionId, data_url: String) -> bool {
        match &mut self.selected {
            Some(file) if file.id == id => {
                file.preview = Some(data_url);
                true
            }
            _ => false,
        }
    }

    /// Applies the decode stage's dimensions, enabling the trigger. Stale
    /// results are discarded.
    pub fn finish_decode(&mut self, id: SelectionId, dims: ImageDimensions) -> bool {
        match &mut self.selected {
            Some(file) if file.id == id => {
                file.decoded = Some(dims);
                true
            }
            _ => false,
        }
    }

    /// Records a failed read or decode for the given selection. Stale
    /// failures are dropped silently; a current one surfaces in the status
    /// area and leaves the trigger disabled.
    pub fn fail_intake(&mut self, id: SelectionId, message: String) {
        if let Some(file) = &mut self.selected
            && file.id == id
        {
            file.preview = None;
            file.decoded = None;
            self.status = Some(StatusLine::error(message));
        }
    }

    /// Moves the submit machine from Idle to Busy. Returns false without
    /// touching anything when the trigger is not enabled, which also keeps
    /// a second submission from starting while one is in flight.
    pub fn begin_submit(&mut self) -> bool {
        if !self.trigger_enabled() {
            return false;
        }
        self.phase = SubmitPhase::Busy;
        self.status = Some(StatusLine {
            kind: StatusKind::Loading,
            message: PROCESSING_MESSAGE.to_string(),
        });
        self.result = None;
        true
    }

    /// Success exit of the submit machine: back to Idle with the result
    /// shown and the loading status cleared.
    pub fn finish_submit_success(&mut self, result: ResultLink) {
        self.phase = SubmitPhase::Idle;
        self.status = None;
        self.result = Some(result);
    }

    /// Error exit of the submit machine: back to Idle with the message
    /// shown and no result.
    pub fn finish_submit_error(&mut self, message: String) {
        self.phase = SubmitPhase::Idle;
        self.status = Some(StatusLine::error(message));
        self.result = None;
    }

    pub fn set_drag_active(&mut self, active: bool) {
        self.drag_active = active;
    }
}
