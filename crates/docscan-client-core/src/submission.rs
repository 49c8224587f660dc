//! Form submission intents: which verb, which target, which body encoding, and
//! which success flow a form gets. Everything here is decided when the form is
//! bound, not when the response comes back.

use std::fmt;

use url::form_urlencoded;

use crate::routes::ApiEndpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn body_encoding(self) -> BodyEncoding {
        match self {
            Self::Get => BodyEncoding::QueryString,
            Self::Put | Self::Patch => BodyEncoding::UrlEncoded,
            Self::Post | Self::Delete => BodyEncoding::Multipart,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    QueryString,
    UrlEncoded,
    Multipart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Login,
    Register,
    Logout,
    ProfileUpdate,
    Upload,
    CreditRequest,
    Generic,
}

impl SubmissionKind {
    /// Value of a form's `data-kind` attribute.
    pub fn parse_tag(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            "logout" => Some(Self::Logout),
            "profile-update" | "profile_update" => Some(Self::ProfileUpdate),
            "upload" => Some(Self::Upload),
            "credit-request" | "credit_request" => Some(Self::CreditRequest),
            "generic" => Some(Self::Generic),
            _ => None,
        }
    }

    pub fn from_endpoint(endpoint: ApiEndpoint) -> Self {
        match endpoint {
            ApiEndpoint::Login => Self::Login,
            ApiEndpoint::Register => Self::Register,
            ApiEndpoint::Logout => Self::Logout,
            ApiEndpoint::ProfileUpdate => Self::ProfileUpdate,
            ApiEndpoint::Upload => Self::Upload,
            ApiEndpoint::CreditRequest => Self::CreditRequest,
            ApiEndpoint::Profile | ApiEndpoint::Analytics => Self::Generic,
        }
    }

    pub fn success_flow(self) -> SuccessFlow {
        match self {
            Self::Login => SuccessFlow::EstablishSession,
            Self::Register => SuccessFlow::RegistrationComplete,
            Self::Logout => SuccessFlow::EndSession,
            Self::ProfileUpdate => SuccessFlow::RefreshProfile,
            Self::Upload | Self::CreditRequest | Self::Generic => SuccessFlow::Standard,
        }
    }
}

/// What happens after a 2xx response, before the redirect-or-notify step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessFlow {
    Standard,
    EstablishSession,
    EndSession,
    RefreshProfile,
    /// Shows the completion indicator and navigates to login after a delay.
    /// Replaces the redirect-or-notify step entirely.
    RegistrationComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormHandle(pub usize);

/// Raw attributes read off a `<form>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormAttributes {
    pub action: Option<String>,
    pub data_action: Option<String>,
    pub data_method: Option<String>,
    /// Declared `method`. A form without one submits as GET, as browsers do.
    pub method: Option<String>,
    pub data_kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSpec {
    pub handle: FormHandle,
    pub target: String,
    pub verb: HttpVerb,
    pub kind: SubmissionKind,
}

impl FormSpec {
    pub fn resolve(handle: FormHandle, attributes: &FormAttributes, current_path: &str) -> Self {
        let target = non_empty(attributes.action.as_deref())
            .or_else(|| non_empty(attributes.data_action.as_deref()))
            .unwrap_or(current_path)
            .to_string();

        let verb = match non_empty(attributes.data_method.as_deref()) {
            Some(raw) => HttpVerb::parse(raw).unwrap_or_else(|| {
                tracing::warn!(
                    data_method = raw,
                    form_target = %target,
                    "unknown data-method; using declared method"
                );
                declared_verb(attributes)
            }),
            None => declared_verb(attributes),
        };

        let kind = non_empty(attributes.data_kind.as_deref())
            .and_then(|raw| {
                let parsed = SubmissionKind::parse_tag(raw);
                if parsed.is_none() {
                    tracing::warn!(
                        data_kind = raw,
                        form_target = %target,
                        "unknown data-kind; falling back to target lookup"
                    );
                }
                parsed
            })
            .or_else(|| ApiEndpoint::from_target(&target).map(SubmissionKind::from_endpoint))
            .unwrap_or(SubmissionKind::Generic);

        Self {
            handle,
            target,
            verb,
            kind,
        }
    }
}

fn declared_verb(attributes: &FormAttributes) -> HttpVerb {
    non_empty(attributes.method.as_deref())
        .and_then(HttpVerb::parse)
        .unwrap_or(HttpVerb::Get)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<F> {
    Text(String),
    File(F),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry<F> {
    pub name: String,
    pub value: FieldValue<F>,
}

impl<F> FormEntry<F> {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file: F) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::File(file),
        }
    }
}

/// First non-empty text value for `name`.
pub fn text_field<'a, F>(entries: &'a [FormEntry<F>], name: &str) -> Option<&'a str> {
    entries.iter().find_map(|entry| match &entry.value {
        FieldValue::Text(value) if entry.name == name && !value.trim().is_empty() => {
            Some(value.as_str())
        }
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody<F> {
    Empty,
    UrlEncoded(String),
    Multipart(Vec<FormEntry<F>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest<F> {
    pub verb: HttpVerb,
    pub url: String,
    pub body: RequestBody<F>,
}

impl<F> ApiRequest<F> {
    pub fn empty(verb: HttpVerb, url: impl Into<String>) -> Self {
        Self {
            verb,
            url: url.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self.body {
            RequestBody::UrlEncoded(_) => Some("application/x-www-form-urlencoded"),
            // The browser adds the multipart boundary itself.
            RequestBody::Empty | RequestBody::Multipart(_) => None,
        }
    }
}

/// Encodes form entries for the verb. File entries cannot travel in URL-encoded
/// bodies or query strings and are dropped there, as a browser would send only
/// the file name.
pub fn encode_submission<F>(
    verb: HttpVerb,
    url: &str,
    entries: Vec<FormEntry<F>>,
) -> ApiRequest<F> {
    match verb.body_encoding() {
        BodyEncoding::Multipart => ApiRequest {
            verb,
            url: url.to_string(),
            body: RequestBody::Multipart(entries),
        },
        BodyEncoding::UrlEncoded => ApiRequest {
            verb,
            url: url.to_string(),
            body: RequestBody::UrlEncoded(urlencode_text_entries(&entries)),
        },
        BodyEncoding::QueryString => {
            let query = urlencode_text_entries(&entries);
            let url = if query.is_empty() {
                url.to_string()
            } else if url.contains('?') {
                format!("{url}&{query}")
            } else {
                format!("{url}?{query}")
            };
            ApiRequest::empty(verb, url)
        }
    }
}

fn urlencode_text_entries<F>(entries: &[FormEntry<F>]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for entry in entries {
        if let FieldValue::Text(value) = &entry.value {
            serializer.append_pair(&entry.name, value);
        }
    }
    serializer.finish()
}
