use super::capture::ShapeCapture;
use super::error::{StoreError, SubmitError, ValidationError};
use super::geometry::{Geometry, RawShape, Submission};
use super::notify::{Confirm, Notifier};
use super::store::{ShapeStore, StoreResponse};
use super::widget::MapWidget;
use itertools::Itertools;
use log::{debug, info, warn};
use std::time::Duration;

pub const CONFIRM_PROMPT: &str = "Are you sure you want to create this polygon?";
pub const CREATED_NOTICE: &str = "Polygon created successfully";
pub const FAILED_NOTICE: &str = "Failed to create polygon";

pub const DEFAULT_CLEAR_RESET: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotatorState {
    Idle,
    Drawing,
    Submitting,
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub name: String,
    pub shapes: usize,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Confirmation),
    Declined,
}

/// Holds the shape drawn on the map and the name given to it, and sends both
/// to a `ShapeStore` on request.
///
/// Only one submission can be in flight: while the state is `Submitting`
/// further submissions fail with `SubmitError::Busy`.
pub struct Annotator<W: MapWidget> {
    capture: ShapeCapture<W>,
    store: Box<dyn ShapeStore>,
    notifier: Box<dyn Notifier>,
    confirm: Box<dyn Confirm>,
    clear_reset: Duration,
    name: String,
    pending: Vec<Geometry>,
    state: AnnotatorState,
}

impl<W: MapWidget> Annotator<W> {
    pub fn new(
        widget: W,
        store: Box<dyn ShapeStore>,
        notifier: Box<dyn Notifier>,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        Annotator {
            capture: ShapeCapture::new(widget),
            store,
            notifier,
            confirm,
            clear_reset: DEFAULT_CLEAR_RESET,
            name: String::new(),
            pending: vec![],
            state: AnnotatorState::Idle,
        }
    }

    pub fn with_clear_reset(mut self, clear_reset: Duration) -> Self {
        self.clear_reset = clear_reset;
        self
    }

    pub fn widget(&self) -> &W {
        self.capture.widget()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn pending(&self) -> &[Geometry] {
        &self.pending
    }

    pub fn state(&self) -> AnnotatorState {
        match self.state {
            AnnotatorState::Cleared if !self.capture.is_clearing() => AnnotatorState::Idle,
            state => state,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state == AnnotatorState::Submitting
    }

    /// Feeds a completed draw gesture from the widget.
    pub fn on_shape_created(&mut self, raw: &RawShape) -> Option<Geometry> {
        let pending = &mut self.pending;
        let drawn = self
            .capture
            .on_shape_created(raw, |coordinates| *pending = coordinates);
        if drawn.is_some() && !self.is_busy() {
            self.state = AnnotatorState::Drawing;
        }
        drawn
    }

    /// Replaces the pending shapes.
    pub fn handle_set_cord(&mut self, coordinates: Vec<Geometry>) {
        self.pending = coordinates.into_iter().map(Geometry::normalized).collect();
        if !self.is_busy() {
            self.state = if self.pending.is_empty() {
                AnnotatorState::Idle
            } else {
                AnnotatorState::Drawing
            };
        }
    }

    /// Renders shapes that already exist and returns how many were drawn.
    pub fn load(&mut self, geometries: &[Geometry]) -> usize {
        self.capture.load(geometries)
    }

    /// Drops the pending shapes and wipes the map.
    pub fn clear(&mut self) {
        debug!("clearing {} pending shape(s)", self.pending.len());
        self.pending.clear();
        self.capture.signal_clear(self.clear_reset);
        if !self.is_busy() {
            self.state = AnnotatorState::Cleared;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.pending.is_empty() {
            return Err(ValidationError::NoShapeDrawn);
        }
        Ok(())
    }

    /// Validates and confirms. Returns the record to send, or `None` if the
    /// user declined.
    pub fn begin_submit(&mut self) -> Result<Option<Submission>, SubmitError> {
        if self.is_busy() {
            debug!("submission already in flight");
            return Err(SubmitError::Busy);
        }
        if let Err(err) = self.validate() {
            self.notifier.notify_error(err.notice());
            return Err(err.into());
        }
        if !self.confirm.confirm(CONFIRM_PROMPT) {
            debug!("submission declined");
            return Ok(None);
        }
        self.state = AnnotatorState::Submitting;
        Ok(Some(Submission {
            name: self.name.trim().to_string(),
            coordinates: self.pending.clone(),
        }))
    }

    /// Settles a submission started with `begin_submit`.
    pub fn finish_submit(
        &mut self,
        submission: Submission,
        result: Result<StoreResponse, StoreError>,
    ) -> Result<SubmitOutcome, SubmitError> {
        if !self.is_busy() {
            warn!("settling '{}' without a submission in flight", submission.name);
        }
        let err = match result {
            Ok(response) if response.is_created() => {
                info!(
                    "created '{}' ({})",
                    submission.name,
                    submission.coordinates.iter().map(Geometry::kind).join(", ")
                );
                self.notifier.notify_success(CREATED_NOTICE);
                self.pending.clear();
                self.capture.signal_clear(self.clear_reset);
                self.state = AnnotatorState::Cleared;
                return Ok(SubmitOutcome::Created(Confirmation {
                    name: submission.name,
                    shapes: submission.coordinates.len(),
                    status: response.status,
                }));
            }
            Ok(response) => SubmitError::Rejected {
                status: response.status,
            },
            Err(err) => SubmitError::Store(err),
        };
        warn!("could not create '{}': {}", submission.name, err);
        self.notifier.notify_error(FAILED_NOTICE);
        self.state = if self.pending.is_empty() {
            AnnotatorState::Idle
        } else {
            AnnotatorState::Drawing
        };
        Err(err)
    }

    /// Validates, confirms and sends the pending shapes in one go.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        let submission = match self.begin_submit()? {
            Some(submission) => submission,
            None => return Ok(SubmitOutcome::Declined),
        };
        let result = self.store.create(&submission).await;
        self.finish_submit(submission, result)
    }
}
