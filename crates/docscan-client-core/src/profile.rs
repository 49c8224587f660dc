//! Profile payload and the single rendering routine used by every page.

use serde::Deserialize;

use crate::ports::{ElementKind, PageDocument};

pub const USERNAME_ID: &str = "username";
pub const CREDITS_ID: &str = "credits";
pub const PHONE_ID: &str = "phone";
pub const FIRST_NAME_ID: &str = "first_name";
pub const LAST_NAME_ID: &str = "last_name";
pub const DOB_ID: &str = "dob";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEnvelope {
    pub profile: Profile,
}

impl Profile {
    /// Element id and display value for every rendered field.
    pub fn field_values(&self) -> [(&'static str, String); 6] {
        [
            (USERNAME_ID, self.username.clone()),
            (CREDITS_ID, format_credits(self.credits)),
            (PHONE_ID, self.phone.clone().unwrap_or_default()),
            (FIRST_NAME_ID, self.first_name.clone().unwrap_or_default()),
            (LAST_NAME_ID, self.last_name.clone().unwrap_or_default()),
            (DOB_ID, self.dob.clone().unwrap_or_default()),
        ]
    }
}

/// Whole credit counts render without a decimal point; a missing count renders as `0`.
pub fn format_credits(credits: Option<f64>) -> String {
    match credits {
        Some(value) if value.is_finite() && value.fract() == 0.0 => format!("{}", value as i64),
        Some(value) if value.is_finite() => value.to_string(),
        _ => "0".to_string(),
    }
}

/// Writes `value` into the element with `id`: inputs get their value, anything
/// else its text. Absent elements are skipped. Returns whether an element was
/// written.
pub fn render_field<D: PageDocument + ?Sized>(document: &D, id: &str, value: &str) -> bool {
    match document.element_kind(id) {
        Some(ElementKind::Input) => document.set_value(id, value),
        Some(ElementKind::Text) => document.set_text(id, value),
        None => false,
    }
}

/// Renders every profile field present on the page. Returns how many were written.
pub fn render_profile<D: PageDocument + ?Sized>(document: &D, profile: &Profile) -> usize {
    profile
        .field_values()
        .iter()
        .filter(|(id, value)| render_field(document, id, value))
        .count()
}
