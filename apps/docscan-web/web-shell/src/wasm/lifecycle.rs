use std::io;
use std::time::Duration;

use docscan_client_core::{RuntimeOverrides, Timers};
use gloo_timers::callback::Timeout;
use tracing::level_filters::LevelFilter;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

use super::*;

/// Build-time base URL first, then `window.DOCSCAN_CONFIG` on top.
pub(super) fn load_client_config() -> Result<ClientConfig, BootError> {
    let overrides = read_runtime_overrides()?;
    Ok(ClientConfig::resolve(BUILD_API_BASE_URL, overrides)?)
}

fn read_runtime_overrides() -> Result<Option<RuntimeOverrides>, BootError> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_GLOBAL))
        .unwrap_or(JsValue::UNDEFINED);
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let raw = js_sys::JSON::stringify(&value)
        .ok()
        .and_then(|raw| raw.as_string())
        .ok_or(BootError::UnreadableConfig)?;
    Ok(Some(RuntimeOverrides::from_json(&raw)?))
}

pub(super) fn init_tracing(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(filter)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and hands it to the matching `console` method on drop.
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buffer);
        let line = JsValue::from_str(line.trim_end());
        if self.level == Level::ERROR {
            web_sys::console::error_1(&line);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&line);
        } else if self.level == Level::INFO {
            web_sys::console::log_1(&line);
        } else {
            web_sys::console::debug_1(&line);
        }
    }
}

/// `setTimeout`-backed timers. Scheduled tasks always run; nothing cancels them.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct BrowserTimers;

impl Timers for BrowserTimers {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let _ = Timeout::new(millis, task).forget();
    }
}

pub(super) fn current_pathname() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    let Ok(pathname) = window.location().pathname() else {
        return "/".to_string();
    };
    if pathname.trim().is_empty() {
        "/".to_string()
    } else {
        pathname
    }
}
