use crate::submission::HttpVerb;

pub const PAGE_PREFIX: &str = "/page/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRoute {
    Login,
    Register,
    Index,
    Profile,
    Upload,
    Credits,
    Admin,
    Matches { doc_id: String },
    Other(String),
}

impl PageRoute {
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let Some(rest) = trimmed.strip_prefix(PAGE_PREFIX) else {
            return Self::Other(trimmed.to_string());
        };
        let rest = rest.trim_end_matches('/');
        match rest {
            "login" => Self::Login,
            "register" => Self::Register,
            "index" => Self::Index,
            "profile" => Self::Profile,
            "upload" => Self::Upload,
            "credits" => Self::Credits,
            "admin" => Self::Admin,
            _ => match rest.strip_prefix("matches/") {
                Some(doc_id) if !doc_id.is_empty() && !doc_id.contains('/') => Self::Matches {
                    doc_id: doc_id.to_string(),
                },
                _ => Self::Other(trimmed.to_string()),
            },
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/page/login".to_string(),
            Self::Register => "/page/register".to_string(),
            Self::Index => "/page/index".to_string(),
            Self::Profile => "/page/profile".to_string(),
            Self::Upload => "/page/upload".to_string(),
            Self::Credits => "/page/credits".to_string(),
            Self::Admin => "/page/admin".to_string(),
            Self::Matches { doc_id } => format!("/page/matches/{doc_id}"),
            Self::Other(path) => path.clone(),
        }
    }

    /// Pages reachable without a session. They never trigger a profile fetch.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// Last `/`-separated segment of a path; empty when the path ends with `/`.
pub fn final_segment(path: &str) -> &str {
    let without_query = path.split(['?', '#']).next().unwrap_or_default();
    without_query.rsplit('/').next().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEndpoint {
    Login,
    Register,
    Logout,
    Profile,
    ProfileUpdate,
    Upload,
    CreditRequest,
    Analytics,
}

const ENDPOINTS: [ApiEndpoint; 8] = [
    ApiEndpoint::Login,
    ApiEndpoint::Register,
    ApiEndpoint::Logout,
    ApiEndpoint::Profile,
    ApiEndpoint::ProfileUpdate,
    ApiEndpoint::Upload,
    ApiEndpoint::CreditRequest,
    ApiEndpoint::Analytics,
];

impl ApiEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::Logout => "/auth/logout",
            Self::Profile => "/user/profile",
            Self::ProfileUpdate => "/user/update",
            Self::Upload => "/upload",
            Self::CreditRequest => "/credits/request",
            Self::Analytics => "/admin/analytics",
        }
    }

    pub fn verb(self) -> HttpVerb {
        match self {
            Self::Profile | Self::Analytics => HttpVerb::Get,
            Self::ProfileUpdate => HttpVerb::Put,
            Self::Login | Self::Register | Self::Logout | Self::Upload | Self::CreditRequest => {
                HttpVerb::Post
            }
        }
    }

    /// Matches a form target against the endpoint table. Absolute URLs and query
    /// strings are reduced to their path first.
    pub fn from_target(target: &str) -> Option<Self> {
        let path = target_path(target);
        ENDPOINTS
            .into_iter()
            .find(|endpoint| endpoint.path() == path)
    }
}

pub fn matches_path(doc_id: &str) -> String {
    format!("/matches/{}", encode_path_component(doc_id))
}

pub fn encode_path_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn target_path(target: &str) -> &str {
    let target = target.trim();
    let without_origin = match target.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |index| &rest[index..]),
        None => target,
    };
    let path = without_origin
        .split(['?', '#'])
        .next()
        .unwrap_or(without_origin);
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}
