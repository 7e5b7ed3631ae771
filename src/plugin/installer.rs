use std::io;

use thiserror::Error;

use crate::console::Console;
use crate::model::config::{CheckConfig, ReExecMode};
use crate::model::invocation::{InvocationContext, PluginName};
use crate::plugin::host::{HostError, HostTool, InstallStatus};
use crate::plugin::replace::ProcessReplacer;

pub const MISSING_HEADER: &str = "The following required plugins must be installed:";
pub const INSTALL_PROMPT: &str = "Install? [y]/n: ";

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
    #[error("Plugin installation failed, see errors above.")]
    InstallFailed,
    #[error("failed to re-run `{program}`: {source}")]
    ReExec {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// How a run ended without replacing the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The invocation names an exempt command; nothing was checked.
    Exempt,
    /// Every required plugin is already installed.
    Satisfied,
    /// The user answered `n` at the prompt.
    Declined,
}

#[derive(Debug, Clone)]
pub struct InstallerOptions {
    pub check_exemptions: bool,
    pub exempt: Vec<String>,
    pub reexec: ReExecMode,
}

impl Default for InstallerOptions {
    fn default() -> Self {
        Self::from(&CheckConfig::default())
    }
}

impl From<&CheckConfig> for InstallerOptions {
    fn from(check: &CheckConfig) -> Self {
        Self {
            check_exemptions: check.enabled,
            exempt: check.exempt.clone(),
            reexec: check.reexec,
        }
    }
}

/// Makes sure the required plugins are present before the host command runs.
///
/// When anything had to be installed, a successful run never returns: the
/// process is replaced by a fresh host invocation so the new plugins load.
pub struct PluginInstaller<H, C, P> {
    host: H,
    console: C,
    replacer: P,
    options: InstallerOptions,
}

impl<H: HostTool, C: Console, P: ProcessReplacer> PluginInstaller<H, C, P> {
    pub fn new(host: H, console: C, replacer: P, options: InstallerOptions) -> Self {
        Self {
            host,
            console,
            replacer,
            options,
        }
    }

    pub fn should_check(&self, args: &[String]) -> bool {
        if !self.options.check_exemptions {
            return true;
        }
        should_check(args, &self.options.exempt)
    }

    /// Required plugins the host does not report, in input order.
    pub fn find_missing(&self, required: &[PluginName]) -> Result<Vec<PluginName>, HostError> {
        let mut missing = Vec::new();
        for plugin in required {
            if !self.host.has_plugin(plugin)? {
                missing.push(plugin.clone());
            }
        }
        Ok(missing)
    }

    pub fn install_all(
        &mut self,
        required: &[PluginName],
        invocation: &InvocationContext,
    ) -> Result<Outcome, InstallError> {
        if !self.should_check(invocation.args()) {
            match exempt_match(invocation.args(), &self.options.exempt) {
                Some(command) => tracing::info!(
                    "`{command}` is exempt, exiting without checking plugins or running {}",
                    self.host.program()
                ),
                None => tracing::info!("no arguments, exiting without checking plugins"),
            }
            return Ok(Outcome::Exempt);
        }

        let missing = self.find_missing(required)?;
        if missing.is_empty() {
            tracing::info!("all {} required plugins installed", required.len());
            return Ok(Outcome::Satisfied);
        }

        tracing::info!("missing plugins: {}", join_names(&missing, ", "));
        self.console.say(MISSING_HEADER)?;
        self.console
            .say(&format!("'{}'", join_names(&missing, "', '")))?;

        if !self.console.confirm(INSTALL_PROMPT, true)? {
            tracing::info!("plugin install declined");
            return Ok(Outcome::Declined);
        }

        // Only the final install's status decides the outcome.
        let mut last = InstallStatus::Succeeded;
        for plugin in &missing {
            last = self.host.install_plugin(plugin)?;
            match last {
                InstallStatus::Succeeded => tracing::info!("installed plugin {plugin}"),
                InstallStatus::Failed { code } => {
                    tracing::warn!("installing plugin {plugin} failed (exit code {code:?})")
                }
            }
        }

        if !last.success() {
            return Err(InstallError::InstallFailed);
        }

        Err(self.reexec(invocation))
    }

    fn reexec(&self, invocation: &InvocationContext) -> InstallError {
        let program = self.host.program();
        let args = invocation.reexec_args(self.options.reexec);
        tracing::info!("re-running {program} {}", args.join(" "));

        InstallError::ReExec {
            program: program.to_string(),
            source: self.replacer.replace(program, &args),
        }
    }
}

/// False for an empty argument list or one containing any exempt command.
pub fn should_check(args: &[String], exempt: &[String]) -> bool {
    !args.is_empty() && exempt_match(args, exempt).is_none()
}

/// First argument that names an exempt command.
pub fn exempt_match<'a>(args: &'a [String], exempt: &[String]) -> Option<&'a str> {
    args.iter()
        .find(|arg| exempt.contains(arg))
        .map(String::as_str)
}

fn join_names(plugins: &[PluginName], separator: &str) -> String {
    plugins
        .iter()
        .map(PluginName::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
