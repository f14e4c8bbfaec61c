use std::path::PathBuf;
use std::time::Duration;

use watcher_daemon::config::WatchConfig;
use watcher_daemon::exec::CommandSpec;

/// Builder for `WatchConfig` to simplify test setup.
///
/// Unlike the config loader it accepts sub-second frequencies, which keeps
/// loop tests fast.
pub struct WatchConfigBuilder {
    config: WatchConfig,
}

impl WatchConfigBuilder {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            config: WatchConfig {
                base_path: base_path.into(),
                ..WatchConfig::default()
            },
        }
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.config.extension = ext.to_string();
        self
    }

    pub fn exclude(mut self, rule: &str) -> Self {
        self.config.exclusions.push(rule.to_string());
        self
    }

    /// Comma separated rules, as given in `WATCHER_DAEMON_EXCLUDED`.
    pub fn excluded(mut self, csv: &str) -> Self {
        self.config
            .exclusions
            .extend(watcher_daemon::config::parse_exclusion_list(csv));
        self
    }

    pub fn frequency(mut self, frequency: Duration) -> Self {
        self.config.frequency = frequency;
        self
    }

    pub fn command(mut self, cmd: &str) -> Self {
        self.config.command = CommandSpec::parse(cmd, false).expect("valid test command");
        self
    }

    pub fn shell_command(mut self, cmd: &str) -> Self {
        self.config.command = CommandSpec::parse(cmd, true).expect("valid test command");
        self
    }

    pub fn check_delay(mut self, delay: Duration) -> Self {
        self.config.check_delay = delay;
        self
    }

    pub fn build(self) -> WatchConfig {
        self.config
    }
}
