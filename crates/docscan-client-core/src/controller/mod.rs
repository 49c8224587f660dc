//! The page controller: session gate, profile hydration, form interception and
//! the redirect-or-notify dispatch for every response.
//!
//! Each submission is an independent request/response cycle. Nothing is shared
//! between cycles except the session context, which only login and logout
//! replace. Overlapping submissions on different forms are allowed.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, TransportError};
use crate::notification::{
    ANALYTICS_LOAD_FAILED_MESSAGE, ERROR_FALLBACK_MESSAGE, LOGOUT_FAILED_MESSAGE,
    MATCHES_LOAD_FAILED_MESSAGE, NETWORK_ERROR_MESSAGE, Notification,
    PROFILE_LOAD_FAILED_MESSAGE, REGISTRATION_COMPLETE_MESSAGE, SUCCESS_FALLBACK_MESSAGE,
    Severity,
};
use crate::ports::{ApiTransport, PageDocument, Timers};
use crate::profile::{Profile, ProfileEnvelope, render_profile};
use crate::reports::{
    AnalyticsResponse, MATCHES_LIST_ID, MatchesResponse, TOP_USERS_ID, TOTAL_SCANS_ID,
};
use crate::response::{ApiEnvelope, RawResponse, decode_json, http_error};
use crate::routes::{ApiEndpoint, PageRoute, final_segment, matches_path};
use crate::session::{SessionContext, SessionMarker, SessionStore};
use crate::submission::{
    ApiRequest, FormSpec, HttpVerb, SuccessFlow, encode_submission, text_field,
};

pub const SUCCESS_MODAL_ID: &str = "successModal";
pub const COUNTDOWN_ID: &str = "countdown";
pub const LOGOUT_BUTTON_ID: &str = "logout-btn";
pub const PREVIEW_ID: &str = "preview";

const USERNAME_FIELD: &str = "username";
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCheck {
    Allowed,
    RedirectedToLogin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Ready,
    RedirectedToLogin,
}

/// Terminal result of one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Redirected(String),
    Notified(Notification),
    /// Completion indicator shown; navigation to login is scheduled.
    RegistrationComplete,
}

pub struct PageController<D, T, S, C>
where
    D: PageDocument + 'static,
    T: ApiTransport<File = D::File>,
    S: SessionStore,
    C: Timers,
{
    config: ClientConfig,
    document: Rc<D>,
    transport: T,
    store: S,
    timers: C,
    session: RefCell<SessionContext>,
}

impl<D, T, S, C> PageController<D, T, S, C>
where
    D: PageDocument + 'static,
    T: ApiTransport<File = D::File>,
    S: SessionStore,
    C: Timers,
{
    /// Reads the session marker once; afterwards only login and logout change it.
    pub fn new(config: ClientConfig, document: Rc<D>, transport: T, store: S, timers: C) -> Self {
        let session = SessionContext::load(&store);
        Self {
            config,
            document,
            transport,
            store,
            timers,
            session: RefCell::new(session),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn document(&self) -> &Rc<D> {
        &self.document
    }

    pub fn session(&self) -> SessionContext {
        self.session.borrow().clone()
    }

    /// Runs once per page load. Protected pages without a session marker
    /// redirect before any network work; public pages skip the profile fetch.
    pub async fn initialize(&self) -> InitOutcome {
        let path = self.document.current_path();
        let route = PageRoute::from_path(&path);
        debug!(path = %path, ?route, "initializing page controller");

        if self.check_auth_status() == AuthCheck::RedirectedToLogin {
            return InitOutcome::RedirectedToLogin;
        }
        if route.is_public() {
            return InitOutcome::Ready;
        }

        self.load_profile().await;
        self.load_page_reports().await;
        InitOutcome::Ready
    }

    /// Advisory only: the server still rejects unauthenticated API calls.
    pub fn check_auth_status(&self) -> AuthCheck {
        let path = self.document.current_path();
        let segment = final_segment(&path);
        if self.config.is_protected_segment(segment) && !self.session.borrow().is_present() {
            info!(segment, "no session marker on protected page; redirecting to login");
            self.document.navigate(&PageRoute::Login.to_path());
            return AuthCheck::RedirectedToLogin;
        }
        AuthCheck::Allowed
    }

    /// Resolves every form on the page into a submission spec. The caller
    /// installs the submit interceptors and routes them to [`Self::submit`].
    pub fn bind_forms(&self) -> Vec<FormSpec> {
        let current_path = self.document.current_path();
        let specs = self
            .document
            .forms()
            .into_iter()
            .map(|(handle, attributes)| FormSpec::resolve(handle, &attributes, &current_path))
            .collect::<Vec<_>>();
        debug!(forms = specs.len(), "bound page forms");
        specs
    }

    pub async fn submit(&self, spec: &FormSpec) -> SubmitOutcome {
        let entries = self.document.form_entries(spec.handle);
        let marker = text_field(&entries, USERNAME_FIELD).and_then(SessionMarker::new);
        let request = encode_submission(spec.verb, &self.config.api_url(&spec.target), entries);

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(_) => return self.notify(Notification::error(NETWORK_ERROR_MESSAGE)),
        };

        if !response.is_success() {
            let error = http_error(&response);
            return self.notify(Notification::error(error.user_message(ERROR_FALLBACK_MESSAGE)));
        }

        let envelope = ApiEnvelope::from_body(&response.body);
        let mut default_redirect = None;
        match spec.kind.success_flow() {
            SuccessFlow::RegistrationComplete => {
                self.complete_registration();
                return SubmitOutcome::RegistrationComplete;
            }
            SuccessFlow::EstablishSession => {
                match marker {
                    Some(marker) => self.session.borrow_mut().establish(&self.store, marker),
                    None => warn!(
                        form_target = %spec.target,
                        "login succeeded without a username field"
                    ),
                }
                default_redirect = Some(self.config.post_login_path.as_str());
            }
            SuccessFlow::EndSession => self.session.borrow_mut().end(&self.store),
            SuccessFlow::RefreshProfile => {
                self.load_profile().await;
            }
            SuccessFlow::Standard => {}
        }

        if let Some(target) = envelope.redirect_target().or(default_redirect) {
            info!(redirect = target, "navigating after successful submission");
            self.document.navigate(target);
            return SubmitOutcome::Redirected(target.to_string());
        }

        let message = envelope.message_text().unwrap_or(SUCCESS_FALLBACK_MESSAGE);
        self.notify(Notification::success(message))
    }

    /// Signs out; the session marker is cleared only when the server confirms.
    pub async fn logout(&self) -> bool {
        let request = ApiRequest::empty(
            ApiEndpoint::Logout.verb(),
            self.config.api_url(ApiEndpoint::Logout.path()),
        );
        match self.send(request).await {
            Ok(response) if response.is_success() => {
                self.session.borrow_mut().end(&self.store);
                self.document.navigate(&PageRoute::Login.to_path());
                true
            }
            Ok(response) => {
                let error = http_error(&response);
                self.show_alert(&error.user_message(LOGOUT_FAILED_MESSAGE), Severity::Error);
                false
            }
            Err(_) => {
                self.show_alert(LOGOUT_FAILED_MESSAGE, Severity::Error);
                false
            }
        }
    }

    /// Fetches and renders the profile. Failures surface as a notification.
    pub async fn load_profile(&self) -> Option<Profile> {
        match self
            .get_json::<ProfileEnvelope>(ApiEndpoint::Profile.path())
            .await
        {
            Ok(envelope) => {
                let written = render_profile(self.document.as_ref(), &envelope.profile);
                debug!(fields = written, "rendered profile");
                Some(envelope.profile)
            }
            Err(error) => {
                warn!(%error, "profile load failed");
                self.show_alert(
                    server_message(&error).unwrap_or(PROFILE_LOAD_FAILED_MESSAGE),
                    Severity::Error,
                );
                None
            }
        }
    }

    /// Loads the report widgets present on the page.
    pub async fn load_page_reports(&self) {
        if self.document.element_kind(MATCHES_LIST_ID).is_some() {
            self.load_matches().await;
        }
        if self.document.element_kind(TOTAL_SCANS_ID).is_some()
            || self.document.element_kind(TOP_USERS_ID).is_some()
        {
            self.load_analytics().await;
        }
    }

    /// Document id comes from the final path segment.
    pub async fn load_matches(&self) -> Option<MatchesResponse> {
        let path = self.document.current_path();
        let doc_id = final_segment(&path).trim();
        if doc_id.is_empty() {
            warn!(path = %path, "matches page without a document id");
            self.show_alert(MATCHES_LOAD_FAILED_MESSAGE, Severity::Error);
            return None;
        }

        match self.get_json::<MatchesResponse>(&matches_path(doc_id)).await {
            Ok(matches) => {
                let items = matches
                    .matches
                    .iter()
                    .map(|entry| entry.to_list_item())
                    .collect::<Vec<_>>();
                self.document.replace_list(MATCHES_LIST_ID, &items);
                Some(matches)
            }
            Err(ClientError::Transport(_)) => {
                self.show_alert(NETWORK_ERROR_MESSAGE, Severity::Error);
                None
            }
            Err(error) => {
                warn!(%error, doc_id, "matches load failed");
                self.show_alert(MATCHES_LOAD_FAILED_MESSAGE, Severity::Error);
                None
            }
        }
    }

    /// Admin-only: 401/403 responses send the user back to the index page.
    pub async fn load_analytics(&self) -> Option<AnalyticsResponse> {
        match self
            .get_json::<AnalyticsResponse>(ApiEndpoint::Analytics.path())
            .await
        {
            Ok(analytics) => {
                self.document
                    .set_text(TOTAL_SCANS_ID, &analytics.total_scans.to_string());
                self.document
                    .replace_list(TOP_USERS_ID, &analytics.top_user_items());
                Some(analytics)
            }
            Err(error) => {
                warn!(%error, "analytics load failed");
                self.show_alert(
                    &error.user_message(ANALYTICS_LOAD_FAILED_MESSAGE),
                    Severity::Error,
                );
                if matches!(error.status(), Some(401 | 403)) {
                    self.document.navigate(&PageRoute::Index.to_path());
                }
                None
            }
        }
    }

    /// Previews the file just picked in an upload form. Nothing happens when
    /// the selection was cleared or the page has no preview element.
    pub fn preview_upload(&self, file: Option<&D::File>) -> bool {
        let Some(file) = file else {
            return false;
        };
        let shown = self.document.show_file_preview(PREVIEW_ID, file);
        debug!(shown, "upload preview");
        shown
    }

    /// Inserts a notification and schedules its removal after the configured TTL.
    pub fn show_alert(&self, message: &str, severity: Severity) {
        let notification = Notification {
            message: message.to_string(),
            severity,
        };
        let Some(id) = self.document.insert_notification(&notification) else {
            warn!(message, "notification could not be displayed");
            return;
        };
        let document = Rc::clone(&self.document);
        self.timers.schedule(
            self.config.notification_ttl,
            Box::new(move || document.remove_notification(id)),
        );
    }

    fn notify(&self, notification: Notification) -> SubmitOutcome {
        self.show_alert(&notification.message, notification.severity);
        SubmitOutcome::Notified(notification)
    }

    /// Shows the completion modal with a per-second countdown and navigates to
    /// login once the configured delay has elapsed.
    fn complete_registration(&self) {
        let delay = self.config.registration_redirect_delay;
        if self.document.show_element(SUCCESS_MODAL_ID) {
            let total_ticks = countdown_seconds(delay);
            self.document
                .set_text(COUNTDOWN_ID, &total_ticks.to_string());
            for elapsed in 1..total_ticks {
                let document = Rc::clone(&self.document);
                let remaining = total_ticks - elapsed;
                self.timers.schedule(
                    COUNTDOWN_TICK * elapsed as u32,
                    Box::new(move || {
                        document.set_text(COUNTDOWN_ID, &remaining.to_string());
                    }),
                );
            }
        } else {
            self.show_alert(REGISTRATION_COMPLETE_MESSAGE, Severity::Success);
        }

        info!(
            delay_ms = delay.as_millis() as u64,
            "registration complete; login redirect scheduled"
        );
        let document = Rc::clone(&self.document);
        let login = PageRoute::Login.to_path();
        self.timers.schedule(
            delay,
            Box::new(move || {
                document.set_text(COUNTDOWN_ID, "0");
                document.navigate(&login);
            }),
        );
    }

    async fn send(&self, request: ApiRequest<D::File>) -> Result<RawResponse, TransportError> {
        debug!(method = %request.verb, url = %request.url, "sending request");
        let result = self.transport.send(request).await;
        match &result {
            Ok(response) => debug!(status = response.status, "response received"),
            Err(error) => warn!(%error, "request did not complete"),
        }
        result
    }

    async fn get_json<P: DeserializeOwned>(&self, path: &str) -> Result<P, ClientError> {
        let request = ApiRequest::empty(HttpVerb::Get, self.config.api_url(path));
        let response = self.send(request).await?;
        decode_json(&response)
    }
}

fn server_message(error: &ClientError) -> Option<&str> {
    match error {
        ClientError::Http {
            message: Some(message),
            ..
        } if !message.trim().is_empty() => Some(message.as_str()),
        _ => None,
    }
}

/// Whole seconds shown by the countdown, rounding partial seconds up.
fn countdown_seconds(delay: Duration) -> u64 {
    delay.as_secs() + u64::from(delay.subsec_nanos() > 0)
}
