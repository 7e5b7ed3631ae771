mod console;
mod model;
mod plugin;

use std::process::ExitCode;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use console::TermConsole;
use model::config::AppConfig;
use model::invocation::InvocationContext;
use plugin::replace::ProcessReplacer;
use plugin::{ExecReplacer, HostCli, InstallerOptions, Outcome, PluginInstaller};

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("plugin-guard: logging disabled: {e}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("plugin-guard error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to a file; stdout belongs to the install prompt.
fn init_logging() -> Result<()> {
    let log_dir = directories::ProjectDirs::from("", "", "plugin-guard")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp"));
    std::fs::create_dir_all(&log_dir)?;

    // Blocking writer: a successful run ends in exec(), which never drops a guard.
    let file_appender = tracing_appender::rolling::daily(&log_dir, "plugin-guard.log");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("plugin_guard=info"));
    tracing_subscriber::fmt()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!("{e}"))?;

    Ok(())
}

fn run() -> Result<()> {
    let config = AppConfig::load()?;
    let invocation = InvocationContext::from_env();
    tracing::info!(
        "plugin-guard starting: {} {:?}",
        config.host.program,
        invocation.args()
    );

    let host = HostCli::new(&config.host.program);
    let mut installer = PluginInstaller::new(
        host,
        TermConsole::stdio(),
        ExecReplacer,
        InstallerOptions::from(&config.check),
    );

    let outcome = installer.install_all(&config.plugins.required, &invocation)?;
    finish(outcome, &config.host.program, &invocation, &ExecReplacer)
}

/// Maps an installer outcome onto how the process ends.
fn finish(
    outcome: Outcome,
    program: &str,
    invocation: &InvocationContext,
    replacer: &impl ProcessReplacer,
) -> Result<()> {
    match outcome {
        Outcome::Exempt | Outcome::Declined => Ok(()),
        Outcome::Satisfied => {
            // Nothing to install: hand the invocation to the host unchanged.
            let err = replacer.replace(program, invocation.args());
            Err(anyhow!(err).context(format!("failed to run `{program}`")))
        }
    }
}
