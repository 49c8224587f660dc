pub(crate) const RUNTIME_CONFIG_GLOBAL: &str = "DOCSCAN_CONFIG";
pub(crate) const BUILD_API_BASE_URL: Option<&str> = option_env!("DOCSCAN_API_BASE_URL");
pub(crate) const NOTIFICATION_ID_PREFIX: &str = "docscan-notification-";
pub(crate) const SUBMIT_EVENT: &str = "submit";
pub(crate) const CLICK_EVENT: &str = "click";
pub(crate) const CHANGE_EVENT: &str = "change";
pub(crate) const FILE_INPUT_SELECTOR: &str = "input[type=file]";
