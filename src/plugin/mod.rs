pub mod host;
pub mod installer;
pub mod replace;

pub use host::HostCli;
pub use installer::{InstallerOptions, Outcome, PluginInstaller};
pub use replace::ExecReplacer;
