//! CLI module - Command implementations

pub mod commands;
pub mod completions;
pub mod exit_codes;

use anyhow::Result;
use tracing::debug;

use devguard::allowlist::AllowList;
use devguard::config::{BackendKind, DevguardConfig};
use devguard::store::ConfigStore;

use crate::ui::Printer;

/// Output format for CLI commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Store backend selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// Windows registry (HKEY_LOCAL_MACHINE)
    Registry,
    /// JSON files under --store-dir
    File,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Registry => BackendKind::Registry,
            BackendArg::File => BackendKind::File,
        }
    }
}

/// Everything a command needs besides its own arguments
pub struct CommandContext {
    pub config: DevguardConfig,
    pub printer: Printer,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(config: DevguardConfig, printer: Printer, format: OutputFormat) -> Self {
        Self {
            config,
            printer,
            format,
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Open the configured store and bind it to a service
    pub fn open_allowlist(&self, service: Option<&str>) -> Result<AllowList<Box<dyn ConfigStore>>> {
        let allowlist = self.config.allowlist_for(service)?;
        let backend = self.config.store_backend();
        debug!(backend = %backend, service = %allowlist.service, "Opening store");

        let store = backend.open()?;
        Ok(AllowList::new(store, allowlist))
    }
}

#[cfg(test)]
pub(crate) fn test_context(store_dir: &std::path::Path, format: OutputFormat) -> CommandContext {
    use crate::ui::output::OutputMode;

    let mut config = DevguardConfig::default();
    config.apply_overrides(Some(BackendKind::File), Some(store_dir.to_path_buf()));
    CommandContext::new(config, Printer::with_mode(OutputMode::Plain), format)
}
