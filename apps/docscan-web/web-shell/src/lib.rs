#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use docscan_client_core::{
        ClientConfig, ConfigError, FormSpec, LOGOUT_BUTTON_ID, PageController, Severity,
        SubmissionKind,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    use crate::wasm_constants::*;

    mod dom;
    mod lifecycle;
    mod network;
    mod storage;

    use dom::BrowserDocument;
    use lifecycle::*;
    use network::BrowserTransport;
    use storage::LocalStorageSessionStore;

    type BrowserController =
        PageController<BrowserDocument, BrowserTransport, LocalStorageSessionStore, BrowserTimers>;

    thread_local! {
        static CONTROLLER: RefCell<Option<Rc<BrowserController>>> = const { RefCell::new(None) };
        static FORM_SUBMIT_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static LOGOUT_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static FILE_CHANGE_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
    }

    #[derive(Debug, thiserror::Error)]
    pub(super) enum BootError {
        #[error("window is unavailable")]
        WindowUnavailable,
        #[error("document is unavailable")]
        DocumentUnavailable,
        #[error("runtime config global could not be serialized")]
        UnreadableConfig,
        #[error(transparent)]
        Config(#[from] ConfigError),
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        let (config, config_error) = match load_client_config() {
            Ok(config) => (config, None),
            Err(error) => (ClientConfig::default(), Some(error)),
        };
        init_tracing(&config.log_level);
        if let Some(error) = config_error {
            tracing::warn!(%error, "runtime config rejected; using defaults");
        }

        spawn_local(async move {
            if let Err(error) = boot(config).await {
                tracing::error!(%error, "page controller failed to start");
            }
        });
    }

    async fn boot(config: ClientConfig) -> Result<(), BootError> {
        let document = Rc::new(BrowserDocument::new()?);
        let store = LocalStorageSessionStore::new(&config.session_storage_key);
        let transport = BrowserTransport::new(config.request_timeout);
        let controller = Rc::new(PageController::new(
            config,
            document,
            transport,
            store,
            BrowserTimers,
        ));
        CONTROLLER.with(|slot| {
            *slot.borrow_mut() = Some(Rc::clone(&controller));
        });

        let specs = controller.bind_forms();
        install_upload_previews(&controller, &specs);
        install_form_handlers(&controller, specs);
        install_logout_handler(&controller);
        let outcome = controller.initialize().await;
        tracing::debug!(?outcome, "page controller ready");
        Ok(())
    }

    fn install_form_handlers(controller: &Rc<BrowserController>, specs: Vec<FormSpec>) {
        FORM_SUBMIT_HANDLERS.with(|slot| {
            let mut handlers = slot.borrow_mut();
            if !handlers.is_empty() {
                return;
            }
            for spec in specs {
                let Some(form) = controller.document().form_element(spec.handle) else {
                    continue;
                };
                let controller = Rc::clone(controller);
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(
                    move |event: web_sys::Event| {
                        event.prevent_default();
                        let controller = Rc::clone(&controller);
                        let spec = spec.clone();
                        spawn_local(async move {
                            let outcome = controller.submit(&spec).await;
                            tracing::debug!(
                                form_target = %spec.target,
                                ?outcome,
                                "submission finished"
                            );
                        });
                    },
                ));
                let _ = form.add_event_listener_with_callback(
                    SUBMIT_EVENT,
                    callback.as_ref().unchecked_ref(),
                );
                handlers.push(callback);
            }
        });
    }

    /// File inputs inside upload forms preview the picked file.
    fn install_upload_previews(controller: &Rc<BrowserController>, specs: &[FormSpec]) {
        FILE_CHANGE_HANDLERS.with(|slot| {
            let mut handlers = slot.borrow_mut();
            if !handlers.is_empty() {
                return;
            }
            for spec in specs.iter().filter(|spec| spec.kind == SubmissionKind::Upload) {
                let Some(input) = controller
                    .document()
                    .form_element(spec.handle)
                    .and_then(|form| form.query_selector(FILE_INPUT_SELECTOR).ok().flatten())
                else {
                    continue;
                };
                let controller = Rc::clone(controller);
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(
                    move |event: web_sys::Event| {
                        let file = event
                            .target()
                            .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
                            .and_then(|input| input.files())
                            .and_then(|files| files.get(0));
                        controller.preview_upload(file.as_ref());
                    },
                ));
                let _ = input.add_event_listener_with_callback(
                    CHANGE_EVENT,
                    callback.as_ref().unchecked_ref(),
                );
                handlers.push(callback);
            }
        });
    }

    fn install_logout_handler(controller: &Rc<BrowserController>) {
        let Some(button) = controller.document().element_by_id(LOGOUT_BUTTON_ID) else {
            return;
        };
        LOGOUT_CLICK_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let controller = Rc::clone(controller);
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(
                move |event: web_sys::Event| {
                    event.prevent_default();
                    let controller = Rc::clone(&controller);
                    spawn_local(async move {
                        controller.logout().await;
                    });
                },
            ));
            let _ = button.add_event_listener_with_callback(
                CLICK_EVENT,
                callback.as_ref().unchecked_ref(),
            );
            *slot.borrow_mut() = Some(callback);
        });
    }

    fn current_controller() -> Option<Rc<BrowserController>> {
        CONTROLLER.with(|slot| slot.borrow().clone())
    }

    #[wasm_bindgen]
    pub fn logout() {
        let Some(controller) = current_controller() else {
            tracing::warn!("logout requested before the page controller started");
            return;
        };
        spawn_local(async move {
            controller.logout().await;
        });
    }

    #[wasm_bindgen]
    pub fn show_alert(message: String, kind: String) {
        if let Some(controller) = current_controller() {
            controller.show_alert(&message, Severity::parse(&kind));
        }
    }
}
