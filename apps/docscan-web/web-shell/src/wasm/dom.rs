use std::cell::Cell;

use docscan_client_core::{
    ElementKind, FormAttributes, FormEntry, FormHandle, LIST_TITLE_TAG, ListItem, Notification,
    NotificationId, PageDocument,
};
use web_sys::{
    Document, Element, File, FormData, HtmlElement, HtmlFormElement, HtmlImageElement,
    HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Url,
};

use super::*;

/// [`PageDocument`] over the live browser DOM.
pub(super) struct BrowserDocument {
    window: web_sys::Window,
    document: Document,
    next_notification_id: Cell<u64>,
}

impl BrowserDocument {
    pub(super) fn new() -> Result<Self, BootError> {
        let window = web_sys::window().ok_or(BootError::WindowUnavailable)?;
        let document = window.document().ok_or(BootError::DocumentUnavailable)?;
        Ok(Self {
            window,
            document,
            next_notification_id: Cell::new(0),
        })
    }

    pub(super) fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    /// Form handles are positions in `document.forms`, which stay stable for
    /// the lifetime of a page.
    pub(super) fn form_element(&self, handle: FormHandle) -> Option<HtmlFormElement> {
        let index = u32::try_from(handle.0).ok()?;
        self.document
            .forms()
            .item(index)?
            .dyn_into::<HtmlFormElement>()
            .ok()
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        match self.document.create_element(tag) {
            Ok(element) => Some(element),
            Err(error) => {
                tracing::warn!(tag, ?error, "failed to create element");
                None
            }
        }
    }

    fn append_text_child(&self, parent: &Element, tag: &str, text: &str) {
        let Some(child) = self.create_element(tag) else {
            return;
        };
        child.set_text_content(Some(text));
        let _ = parent.append_child(&child);
    }

    fn render_list_item(&self, item: &ListItem) -> Option<Element> {
        let container = self.create_element("div")?;
        if let Some(class_name) = item.class_name.as_deref() {
            container.set_class_name(class_name);
        }
        if let Some(title) = item.title.as_deref() {
            self.append_text_child(&container, LIST_TITLE_TAG, title);
        }
        for line in &item.lines {
            self.append_text_child(&container, "p", line);
        }
        Some(container)
    }
}

fn notification_element_id(id: NotificationId) -> String {
    format!("{NOTIFICATION_ID_PREFIX}{}", id.0)
}

fn form_attributes(form: &HtmlFormElement) -> FormAttributes {
    FormAttributes {
        action: form.get_attribute("action"),
        data_action: form.get_attribute("data-action"),
        data_method: form.get_attribute("data-method"),
        // Reflected property: `get` when the attribute is missing or invalid.
        method: Some(form.method()),
        data_kind: form.get_attribute("data-kind"),
    }
}

/// Reads `[name, value]` pairs from `FormData`; values are either strings or files.
fn form_entries(form: &HtmlFormElement) -> Vec<FormEntry<File>> {
    let data = match FormData::new_with_form(form) {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!(?error, "failed to read form data");
            return Vec::new();
        }
    };
    let Ok(Some(pairs)) = js_sys::try_iter(&data) else {
        return Vec::new();
    };
    pairs
        .filter_map(Result::ok)
        .filter_map(|pair| {
            let pair = pair.dyn_into::<js_sys::Array>().ok()?;
            let name = pair.get(0).as_string()?;
            let value = pair.get(1);
            match value.as_string() {
                Some(text) => Some(FormEntry::text(name, text)),
                None => value
                    .dyn_into::<File>()
                    .ok()
                    .map(|file| FormEntry::file(name, file)),
            }
        })
        .collect()
}

impl PageDocument for BrowserDocument {
    type File = File;

    fn current_path(&self) -> String {
        current_pathname()
    }

    fn navigate(&self, url: &str) {
        if let Err(error) = self.window.location().set_href(url) {
            tracing::warn!(url, ?error, "navigation failed");
        }
    }

    fn forms(&self) -> Vec<(FormHandle, FormAttributes)> {
        let forms = self.document.forms();
        (0..forms.length())
            .filter_map(|index| {
                let form = forms.item(index)?.dyn_into::<HtmlFormElement>().ok()?;
                Some((FormHandle(index as usize), form_attributes(&form)))
            })
            .collect()
    }

    fn form_entries(&self, form: FormHandle) -> Vec<FormEntry<File>> {
        self.form_element(form)
            .map(|form| form_entries(&form))
            .unwrap_or_default()
    }

    fn element_kind(&self, id: &str) -> Option<ElementKind> {
        let element = self.element_by_id(id)?;
        match element.tag_name().to_ascii_uppercase().as_str() {
            "INPUT" | "TEXTAREA" | "SELECT" => Some(ElementKind::Input),
            _ => Some(ElementKind::Text),
        }
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        let Some(element) = self.element_by_id(id) else {
            return false;
        };
        element.set_text_content(Some(text));
        true
    }

    fn set_value(&self, id: &str, value: &str) -> bool {
        let Some(element) = self.element_by_id(id) else {
            return false;
        };
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else {
            element.set_text_content(Some(value));
        }
        true
    }

    fn show_element(&self, id: &str) -> bool {
        self.element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .is_some_and(|element| element.style().set_property("display", "block").is_ok())
    }

    fn show_file_preview(&self, id: &str, file: &File) -> bool {
        let Some(image) = self
            .element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlImageElement>().ok())
        else {
            return false;
        };
        let url = match Url::create_object_url_with_blob(file) {
            Ok(url) => url,
            Err(error) => {
                tracing::warn!(?error, "failed to create preview url");
                return false;
            }
        };
        image.set_src(&url);
        image.style().set_property("display", "block").is_ok()
    }

    fn replace_list(&self, id: &str, items: &[ListItem]) -> bool {
        let Some(container) = self.element_by_id(id) else {
            return false;
        };
        container.set_text_content(None);
        for item in items {
            if let Some(child) = self.render_list_item(item) {
                let _ = container.append_child(&child);
            }
        }
        true
    }

    fn insert_notification(&self, notification: &Notification) -> Option<NotificationId> {
        let body = self.document.body()?;
        let element = self.create_element("div")?;
        let id = NotificationId(self.next_notification_id.get());
        self.next_notification_id.set(id.0 + 1);

        element.set_id(&notification_element_id(id));
        element.set_class_name(notification.severity.css_class());
        element.set_text_content(Some(&notification.message));
        body.prepend_with_node_1(&element).ok()?;
        Some(id)
    }

    fn remove_notification(&self, id: NotificationId) {
        if let Some(element) = self.element_by_id(&notification_element_id(id)) {
            element.remove();
        }
    }
}
