pub mod app;
pub mod banner;
pub mod config;
pub mod console;
pub mod controller;
pub mod decor;
pub mod form;
pub mod handler;
pub mod logging;
pub mod transport;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use banner::{BannerKind, Banners};
pub use config::Config;
pub use controller::{ContactController, ContactView, SubmissionOutcome, SubmitError};
pub use form::{FieldId, FieldState, FormFields, ValidationError, ValidationResult};
pub use transport::{FormPayload, FormspreeClient, Transport, TransportError, TransportResponse};
