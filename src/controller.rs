//! Form submission controller.
//!
//! The controller never looks up UI elements itself. Every read and write goes
//! through a [`ContactView`] handed in by the caller, and the network goes
//! through a [`Transport`], so a terminal UI, a headless command and test
//! doubles all drive the same flow.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::banner::BannerKind;
use crate::form::{validate_field, FieldId, FieldState, FormFields, ValidationError};
use crate::transport::{parse_error_messages, FormPayload, Transport, TransportError, TransportResponse};

pub const SEND_LABEL: &str = "Send";
pub const SENDING_LABEL: &str = "Sending...";
pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

/// The handles the controller needs from whatever is presenting the form
pub trait ContactView {
    fn field_value(&self, field: FieldId) -> String;
    fn set_field_state(&mut self, field: FieldId, state: FieldState);
    fn clear_fields(&mut self);
    fn show_banner(&mut self, kind: BannerKind, text: &str);
    fn hide_banner(&mut self, kind: BannerKind);
    fn set_submit_control(&mut self, enabled: bool, label: &str);
}

/// Every way a submission can fail. `Display` is the banner text.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", .0.join(", "))]
    ServerRejection(Vec<String>),
    #[error("Sorry, an error occurred. Please try again.")]
    ServerRejectionUnstructured { status: u16 },
    #[error("Network error. Please check your connection and try again.")]
    Transport(#[from] TransportError),
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    Success(String),
    Failure(SubmitError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }

    /// Banner text for this outcome
    pub fn message(&self) -> String {
        match self {
            SubmissionOutcome::Success(message) => message.clone(),
            SubmissionOutcome::Failure(error) => error.to_string(),
        }
    }
}

/// Map what the transport produced to an outcome.
pub fn interpret_response(result: Result<TransportResponse, TransportError>) -> SubmissionOutcome {
    match result {
        Ok(response) if response.is_success() => SubmissionOutcome::Success(SUCCESS_MESSAGE.to_string()),
        Ok(response) => match parse_error_messages(&response.body) {
            Some(messages) => SubmissionOutcome::Failure(SubmitError::ServerRejection(messages)),
            None => SubmissionOutcome::Failure(SubmitError::ServerRejectionUnstructured {
                status: response.status,
            }),
        },
        Err(error) => SubmissionOutcome::Failure(SubmitError::Transport(error)),
    }
}

pub struct ContactController<T> {
    transport: Arc<T>,
    extra_fields: Vec<(String, String)>,
}

impl<T> Clone for ContactController<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            extra_fields: self.extra_fields.clone(),
        }
    }
}

impl<T: Transport + 'static> ContactController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            extra_fields: Vec::new(),
        }
    }

    /// Additional multipart fields sent with every submission (e.g. `_subject`)
    pub fn with_extra_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.extra_fields.extend(fields);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate and submit in one go. Returns the validation error without
    /// touching the network if the form is not submittable.
    pub async fn handle_submit<V: ContactView>(&self, view: &mut V) -> Result<SubmissionOutcome, SubmitError> {
        let payload = self.begin_submit(view)?;
        let result = self.transport.submit(&payload).await;
        Ok(self.finish_submit(view, result))
    }

    /// Validation half of a submission. On success the submit control is
    /// busy and the returned payload is ready to send.
    pub fn begin_submit<V: ContactView>(&self, view: &mut V) -> Result<FormPayload, SubmitError> {
        view.hide_banner(BannerKind::Success);
        view.hide_banner(BannerKind::Error);

        // Trimmed copies decide validity; the raw values are what gets sent
        let raw = FieldId::all().map(|field| view.field_value(field));
        let fields = FormFields::from_values(&raw[0], &raw[1], &raw[2]);

        if let Err(error) = fields.check() {
            tracing::debug!(reason = %error, "submission rejected locally");
            view.show_banner(BannerKind::Error, &error.to_string());
            return Err(error.into());
        }

        view.set_submit_control(false, SENDING_LABEL);

        let mut payload = FormPayload::default();
        for (field, value) in FieldId::all().iter().zip(&raw) {
            payload.push(field.as_str(), value);
        }
        for (name, value) in &self.extra_fields {
            payload.push(name, value);
        }
        tracing::info!(fields = payload.fields.len(), "submitting contact form");
        Ok(payload)
    }

    /// Run the network call on the runtime so an event loop can keep going.
    pub fn dispatch(&self, payload: FormPayload) -> JoinHandle<Result<TransportResponse, TransportError>> {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move { transport.submit(&payload).await })
    }

    /// Report the settled call and restore the submit control.
    pub fn finish_submit<V: ContactView>(
        &self,
        view: &mut V,
        result: Result<TransportResponse, TransportError>,
    ) -> SubmissionOutcome {
        let outcome = interpret_response(result);

        match &outcome {
            SubmissionOutcome::Success(message) => {
                tracing::info!("contact form delivered");
                view.clear_fields();
                for field in FieldId::all() {
                    view.set_field_state(field, FieldState::Neutral);
                }
                view.show_banner(BannerKind::Success, message);
            }
            SubmissionOutcome::Failure(error) => {
                match error {
                    SubmitError::Transport(cause) => tracing::warn!(%cause, "contact form transport failed"),
                    SubmitError::ServerRejectionUnstructured { status } => {
                        tracing::warn!(status, "endpoint rejected submission without details")
                    }
                    other => tracing::warn!(reason = %other, "endpoint rejected submission"),
                }
                view.show_banner(BannerKind::Error, &error.to_string());
            }
        }

        view.set_submit_control(true, SEND_LABEL);
        outcome
    }

    /// Blur handler: set the field's marker from its current value.
    pub fn validate_input<V: ContactView>(&self, view: &mut V, field: FieldId) -> FieldState {
        let state = validate_field(field, &view.field_value(field));
        view.set_field_state(field, state);
        state
    }

    /// Input handler: clear the edited field's marker and the error banner.
    /// The success banner is left alone.
    pub fn on_input<V: ContactView>(&self, view: &mut V, field: FieldId) {
        view.set_field_state(field, FieldState::Neutral);
        view.hide_banner(BannerKind::Error);
    }
}
