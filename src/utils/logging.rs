use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    /// Install the global subscriber. `RUST_LOG` overrides the default filter.
    /// Calling it more than once is harmless.
    pub fn init() {
        Self::init_with_default("packcfg=info");
    }

    pub fn init_with_default(default_filter: &str) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }

    pub fn resolution_start(environment: &str, root: &str) {
        info!("🔧 Resolving {} configuration", environment);
        debug!("📁 Project root: {}", root);
    }

    pub fn environment_selected(environment: &str, explicit: bool) {
        if explicit {
            debug!("🎯 Environment: {} (from descriptor)", environment);
        } else {
            debug!("🎯 Environment: {} (default)", environment);
        }
    }

    pub fn plugin_added(position: usize, name: &str) {
        debug!("🔌 Plugin #{}: {}", position, name);
    }

    pub fn rules_assembled(count: usize) {
        debug!("📐 Module rules assembled: {}", count);
    }

    pub fn resolution_complete(environment: &str, plugin_count: usize, devtool: &str) {
        info!(
            "✅ Resolved {} configuration: {} plugins, devtool {}",
            environment, plugin_count, devtool
        );
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
