use std::cell::Cell;
use std::time::Duration;

use async_trait::async_trait;
use docscan_client_core::{
    ApiRequest, ApiTransport, FieldValue, FormEntry, HttpVerb, RawResponse, RequestBody,
    TransportError,
};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;
use web_sys::{AbortController, File, FormData, RequestCredentials};

use super::*;

/// Fetch-based transport. Session cookies ride along on same-origin requests.
pub(super) struct BrowserTransport {
    timeout: Option<Duration>,
}

impl BrowserTransport {
    pub(super) fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

/// Aborts the in-flight request when the timeout fires. Dropping the guard
/// cancels the timer.
struct AbortGuard {
    controller: AbortController,
    fired: Rc<Cell<bool>>,
    _timeout: Timeout,
}

impl AbortGuard {
    fn arm(timeout: Duration) -> Result<Self, TransportError> {
        let controller = AbortController::new().map_err(|_| {
            TransportError::Build("failed to initialize request timeout".to_string())
        })?;
        let fired = Rc::new(Cell::new(false));
        let timeout_controller = controller.clone();
        let timeout_fired = Rc::clone(&fired);
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            timeout_fired.set(true);
            timeout_controller.abort();
        });
        Ok(Self {
            controller,
            fired,
            _timeout: timeout,
        })
    }
}

fn request_builder(verb: HttpVerb, url: &str) -> RequestBuilder {
    match verb {
        HttpVerb::Get => Request::get(url),
        HttpVerb::Post => Request::post(url),
        HttpVerb::Put => Request::put(url),
        HttpVerb::Patch => Request::patch(url),
        HttpVerb::Delete => Request::delete(url),
    }
}

fn multipart_body(entries: &[FormEntry<File>]) -> Result<FormData, TransportError> {
    let data = FormData::new()
        .map_err(|_| TransportError::Build("failed to create multipart body".to_string()))?;
    for entry in entries {
        let appended = match &entry.value {
            FieldValue::Text(text) => data.append_with_str(&entry.name, text),
            FieldValue::File(file) => {
                data.append_with_blob_and_filename(&entry.name, file, &file.name())
            }
        };
        appended.map_err(|_| {
            TransportError::Build(format!("failed to append form field `{}`", entry.name))
        })?;
    }
    Ok(data)
}

#[async_trait(?Send)]
impl ApiTransport for BrowserTransport {
    type File = File;

    async fn send(&self, request: ApiRequest<File>) -> Result<RawResponse, TransportError> {
        let guard = self.timeout.map(AbortGuard::arm).transpose()?;
        let signal = guard.as_ref().map(|guard| guard.controller.signal());

        let mut builder = request_builder(request.verb, &request.url)
            .credentials(RequestCredentials::SameOrigin)
            .abort_signal(signal.as_ref());
        if let Some(content_type) = request.content_type() {
            builder = builder.header("content-type", content_type);
        }

        let built = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::UrlEncoded(body) => builder.body(body),
            RequestBody::Multipart(entries) => builder.body(multipart_body(&entries)?),
        }
        .map_err(|error| TransportError::Build(error.to_string()))?;

        let response = built.send().await.map_err(|error| {
            if guard.as_ref().is_some_and(|guard| guard.fired.get()) {
                TransportError::Timeout(request.url.clone())
            } else {
                TransportError::Network(error.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(RawResponse::new(status, body))
    }
}
