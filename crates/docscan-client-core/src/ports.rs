//! Seams between the page controller and the browser. The web shell implements
//! these with `web-sys`, `gloo-net` and `gloo-timers`; tests use in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::notification::{Notification, NotificationId};
use crate::response::RawResponse;
use crate::submission::{ApiRequest, FormAttributes, FormEntry, FormHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<input>`, `<textarea>` or `<select>`: rendered through its value.
    Input,
    /// Anything else: rendered through its text content.
    Text,
}

/// Heading element used for [`ListItem::title`]; page stylesheets target it.
pub const LIST_TITLE_TAG: &str = "h4";

/// One rendered entry of a list container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub class_name: Option<String>,
    pub title: Option<String>,
    pub lines: Vec<String>,
}

impl ListItem {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            class_name: None,
            title: None,
            lines: vec![text.into()],
        }
    }
}

pub trait PageDocument {
    /// Handle to a file picked in a form, carried opaquely into multipart bodies.
    type File: Clone;

    fn current_path(&self) -> String;
    fn navigate(&self, url: &str);

    fn forms(&self) -> Vec<(FormHandle, FormAttributes)>;
    fn form_entries(&self, form: FormHandle) -> Vec<FormEntry<Self::File>>;

    fn element_kind(&self, id: &str) -> Option<ElementKind>;
    fn set_text(&self, id: &str, text: &str) -> bool;
    fn set_value(&self, id: &str, value: &str) -> bool;
    fn show_element(&self, id: &str) -> bool;
    fn replace_list(&self, id: &str, items: &[ListItem]) -> bool;
    /// Points the image element `id` at a local preview of `file` and shows it.
    fn show_file_preview(&self, id: &str, file: &Self::File) -> bool;

    /// Inserts a notification at the top of the body.
    fn insert_notification(&self, notification: &Notification) -> Option<NotificationId>;
    fn remove_notification(&self, id: NotificationId);
}

#[async_trait(?Send)]
pub trait ApiTransport {
    type File;

    async fn send(&self, request: ApiRequest<Self::File>) -> Result<RawResponse, TransportError>;
}

pub trait Timers {
    /// Runs `task` once after `delay`. Not cancellable.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}
