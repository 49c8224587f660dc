//! Platform-neutral core of the DocScan web client.
//!
//! Every page of the DocScan site runs the same controller: it gates protected
//! pages on a client-side session marker, renders the signed-in user's profile,
//! intercepts form submissions and turns each JSON response into either a
//! navigation or a transient notification. Browser access goes through the
//! traits in [`ports`], so everything here runs natively under test.

pub mod config;
pub mod controller;
pub mod error;
pub mod notification;
pub mod ports;
pub mod profile;
pub mod reports;
pub mod response;
pub mod routes;
pub mod session;
pub mod submission;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, ConfigError, RuntimeOverrides};
pub use controller::{
    AuthCheck, COUNTDOWN_ID, InitOutcome, LOGOUT_BUTTON_ID, PREVIEW_ID, PageController,
    SUCCESS_MODAL_ID, SubmitOutcome,
};
pub use error::{ClientError, TransportError};
pub use notification::{Notification, NotificationId, Severity};
pub use ports::{ApiTransport, ElementKind, LIST_TITLE_TAG, ListItem, PageDocument, Timers};
pub use response::RawResponse;
pub use session::{SessionContext, SessionMarker, SessionStore};
pub use submission::{
    ApiRequest, FieldValue, FormAttributes, FormEntry, FormHandle, FormSpec, HttpVerb,
    RequestBody, SubmissionKind,
};
