use env_logger::Env;

const LOG_TARGET: &str = "stable_protocol_api";

/// Thin wrapper over the `log` facade so handlers log through the shared state.
#[derive(Debug, Clone, Default)]
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        // a second init (tests) is not an error
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
        Logger
    }

    pub fn info<S: AsRef<str>>(&self, message: S) {
        log::info!(target: LOG_TARGET, "{}", message.as_ref());
    }

    pub fn warning<S: AsRef<str>>(&self, message: S) {
        log::warn!(target: LOG_TARGET, "{}", message.as_ref());
    }

    pub fn severe<S: AsRef<str>>(&self, message: S) {
        log::error!(target: LOG_TARGET, "{}", message.as_ref());
    }
}
