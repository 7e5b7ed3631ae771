use std::io;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::model::invocation::PluginName;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    Query {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Result of a single `plugin install` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Succeeded,
    Failed { code: Option<i32> },
}

impl InstallStatus {
    pub fn success(&self) -> bool {
        matches!(self, InstallStatus::Succeeded)
    }
}

impl From<ExitStatus> for InstallStatus {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            InstallStatus::Succeeded
        } else {
            InstallStatus::Failed {
                code: status.code(),
            }
        }
    }
}

/// The external tool that owns the plugin registry.
pub trait HostTool {
    /// Name used to launch the tool, also the re-exec target.
    fn program(&self) -> &str;

    fn has_plugin(&self, name: &PluginName) -> Result<bool, HostError>;

    fn install_plugin(&self, name: &PluginName) -> Result<InstallStatus, HostError>;
}

impl<T: HostTool + ?Sized> HostTool for &T {
    fn program(&self) -> &str {
        (**self).program()
    }

    fn has_plugin(&self, name: &PluginName) -> Result<bool, HostError> {
        (**self).has_plugin(name)
    }

    fn install_plugin(&self, name: &PluginName) -> Result<InstallStatus, HostError> {
        (**self).install_plugin(name)
    }
}

/// Talks to a vagrant-style CLI through `plugin list` / `plugin install`.
#[derive(Debug, Clone)]
pub struct HostCli {
    program: String,
}

impl HostCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn spawn_error(&self, source: io::Error) -> HostError {
        HostError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl HostTool for HostCli {
    fn program(&self) -> &str {
        &self.program
    }

    fn has_plugin(&self, name: &PluginName) -> Result<bool, HostError> {
        let output = Command::new(&self.program)
            .args(["plugin", "list", "--machine-readable"])
            .stdin(Stdio::null())
            .output()
            .map_err(|err| self.spawn_error(err))?;

        if !output.status.success() {
            return Err(HostError::Query {
                command: format!("{} plugin list", self.program),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let found = listed_plugins(&stdout).any(|listed| listed == name.as_str());
        tracing::debug!("host query {name}: installed={found}");
        Ok(found)
    }

    fn install_plugin(&self, name: &PluginName) -> Result<InstallStatus, HostError> {
        // Inherits stdio so the host's own install errors reach the user.
        let status = Command::new(&self.program)
            .args(["plugin", "install", name.as_str()])
            .status()
            .map_err(|err| self.spawn_error(err))?;

        Ok(status.into())
    }
}

/// Plugin names from `plugin list --machine-readable` output.
///
/// Rows look like `timestamp,target,type,data`; only `plugin-name` rows count.
pub fn listed_plugins(output: &str) -> impl Iterator<Item = &str> {
    output.lines().filter_map(|line| {
        let mut fields = line.splitn(4, ',');
        let _timestamp = fields.next()?;
        let _target = fields.next()?;
        let kind = fields.next()?;
        let data = fields.next()?;
        (kind == "plugin-name").then(|| data.trim())
    })
}
