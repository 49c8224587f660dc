//! In-memory ports for tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::notification::{Notification, NotificationId};
use crate::ports::{ApiTransport, ElementKind, ListItem, PageDocument, Timers};
use crate::response::RawResponse;
use crate::session::{SessionMarker, SessionStore};
use crate::submission::{ApiRequest, FormAttributes, FormEntry, FormHandle};

#[derive(Debug, Clone)]
struct FakeElement {
    kind: ElementKind,
    text: String,
    value: String,
    visible: bool,
    items: Vec<ListItem>,
}

impl FakeElement {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            text: String::new(),
            value: String::new(),
            visible: false,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeDocument {
    path: String,
    elements: RefCell<BTreeMap<String, FakeElement>>,
    forms: Vec<(FormHandle, FormAttributes, Vec<FormEntry<String>>)>,
    navigations: RefCell<Vec<String>>,
    visible_notifications: RefCell<Vec<(NotificationId, Notification)>>,
    shown_notifications: RefCell<Vec<Notification>>,
    next_notification_id: Cell<u64>,
}

impl FakeDocument {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn with_input(self, id: &str) -> Self {
        self.elements
            .borrow_mut()
            .insert(id.to_string(), FakeElement::new(ElementKind::Input));
        self
    }

    pub fn with_text(self, id: &str) -> Self {
        self.elements
            .borrow_mut()
            .insert(id.to_string(), FakeElement::new(ElementKind::Text));
        self
    }

    pub fn with_form(
        mut self,
        attributes: FormAttributes,
        entries: Vec<FormEntry<String>>,
    ) -> Self {
        let handle = FormHandle(self.forms.len());
        self.forms.push((handle, attributes, entries));
        self
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.elements.borrow().get(id).map(|element| element.text.clone())
    }

    pub fn value_of(&self, id: &str) -> Option<String> {
        self.elements
            .borrow()
            .get(id)
            .map(|element| element.value.clone())
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.elements
            .borrow()
            .get(id)
            .is_some_and(|element| element.visible)
    }

    pub fn items_of(&self, id: &str) -> Vec<ListItem> {
        self.elements
            .borrow()
            .get(id)
            .map(|element| element.items.clone())
            .unwrap_or_default()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn visible_notifications(&self) -> Vec<Notification> {
        self.visible_notifications
            .borrow()
            .iter()
            .map(|(_, notification)| notification.clone())
            .collect()
    }

    pub fn shown_notifications(&self) -> Vec<Notification> {
        self.shown_notifications.borrow().clone()
    }
}

pub fn form(action: &str, method: &str) -> FormAttributes {
    FormAttributes {
        action: Some(action.to_string()),
        method: Some(method.to_string()),
        ..FormAttributes::default()
    }
}

impl PageDocument for FakeDocument {
    type File = String;

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }

    fn forms(&self) -> Vec<(FormHandle, FormAttributes)> {
        self.forms
            .iter()
            .map(|(handle, attributes, _)| (*handle, attributes.clone()))
            .collect()
    }

    fn form_entries(&self, form: FormHandle) -> Vec<FormEntry<String>> {
        self.forms
            .iter()
            .find(|(handle, _, _)| *handle == form)
            .map(|(_, _, entries)| entries.clone())
            .unwrap_or_default()
    }

    fn element_kind(&self, id: &str) -> Option<ElementKind> {
        self.elements.borrow().get(id).map(|element| element.kind)
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(element) => {
                element.text = text.to_string();
                true
            }
            None => false,
        }
    }

    fn set_value(&self, id: &str, value: &str) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(element) => {
                element.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn show_element(&self, id: &str) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(element) => {
                element.visible = true;
                true
            }
            None => false,
        }
    }

    fn show_file_preview(&self, id: &str, file: &String) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(element) => {
                element.value = file.clone();
                element.visible = true;
                true
            }
            None => false,
        }
    }

    fn replace_list(&self, id: &str, items: &[ListItem]) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(element) => {
                element.items = items.to_vec();
                true
            }
            None => false,
        }
    }

    fn insert_notification(&self, notification: &Notification) -> Option<NotificationId> {
        let id = NotificationId(self.next_notification_id.get());
        self.next_notification_id.set(id.0 + 1);
        self.visible_notifications
            .borrow_mut()
            .insert(0, (id, notification.clone()));
        self.shown_notifications
            .borrow_mut()
            .push(notification.clone());
        Some(id)
    }

    fn remove_notification(&self, id: NotificationId) {
        self.visible_notifications
            .borrow_mut()
            .retain(|(visible_id, _)| *visible_id != id);
    }
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: RefCell<HashMap<String, VecDeque<Result<RawResponse, TransportError>>>>,
    requests: RefCell<Vec<ApiRequest<String>>>,
}

impl FakeTransport {
    pub fn respond(self, url: &str, status: u16, body: serde_json::Value) -> Self {
        self.respond_raw(url, Ok(RawResponse::new(status, body.to_string())))
    }

    pub fn fail(self, url: &str) -> Self {
        self.respond_raw(
            url,
            Err(TransportError::Network("connection refused".to_string())),
        )
    }

    pub fn respond_raw(self, url: &str, response: Result<RawResponse, TransportError>) -> Self {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest<String>> {
        self.requests.borrow().clone()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

#[async_trait(?Send)]
impl ApiTransport for FakeTransport {
    type File = String;

    async fn send(&self, request: ApiRequest<String>) -> Result<RawResponse, TransportError> {
        let url = request.url.clone();
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .get_mut(&url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(TransportError::Network(format!(
                    "no scripted response for {url}"
                )))
            })
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    marker: RefCell<Option<SessionMarker>>,
    failing: bool,
}

impl MemorySessionStore {
    pub fn with_marker(username: &str) -> Self {
        Self {
            marker: RefCell::new(SessionMarker::new(username)),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            marker: RefCell::new(None),
            failing: true,
        }
    }

    pub fn stored(&self) -> Option<SessionMarker> {
        self.marker.borrow().clone()
    }
}

impl SessionStore for MemorySessionStore {
    type Error = String;

    fn load_marker(&self) -> Result<Option<SessionMarker>, String> {
        if self.failing {
            return Err("storage disabled".to_string());
        }
        Ok(self.marker.borrow().clone())
    }

    fn persist_marker(&self, marker: &SessionMarker) -> Result<(), String> {
        if self.failing {
            return Err("storage disabled".to_string());
        }
        *self.marker.borrow_mut() = Some(marker.clone());
        Ok(())
    }

    fn clear_marker(&self) -> Result<(), String> {
        if self.failing {
            return Err("storage disabled".to_string());
        }
        *self.marker.borrow_mut() = None;
        Ok(())
    }
}

type ScheduledTask = (Duration, u64, Box<dyn FnOnce()>);

#[derive(Default)]
struct ClockState {
    now: Cell<Duration>,
    next_sequence: Cell<u64>,
    queue: RefCell<Vec<ScheduledTask>>,
}

/// Timer port driven by [`ManualTimers::advance`] instead of wall-clock time.
#[derive(Clone, Default)]
pub struct ManualTimers {
    state: Rc<ClockState>,
}

impl ManualTimers {
    pub fn now(&self) -> Duration {
        self.state.now.get()
    }

    pub fn pending(&self) -> usize {
        self.state.queue.borrow().len()
    }

    /// Moves the clock forward, running every task that falls due in order.
    pub fn advance(&self, by: Duration) {
        let target = self.state.now.get() + by;
        loop {
            let next = {
                let mut queue = self.state.queue.borrow_mut();
                let position = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, (due, _, _))| *due <= target)
                    .min_by_key(|(_, (due, sequence, _))| (*due, *sequence))
                    .map(|(index, _)| index);
                position.map(|index| queue.remove(index))
            };
            let Some((due, _, task)) = next else {
                break;
            };
            self.state.now.set(due);
            task();
        }
        self.state.now.set(target);
    }
}

impl Timers for ManualTimers {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let sequence = self.state.next_sequence.get();
        self.state.next_sequence.set(sequence + 1);
        let due = self.state.now.get() + delay;
        self.state.queue.borrow_mut().push((due, sequence, task));
    }
}
