use serde::Deserialize;
use std::fmt;

use crate::model::config::ReExecMode;

/// Name of a plugin as the host tool knows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct PluginName(pub String);

impl PluginName {
    #[allow(dead_code)] // names normally come from config
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arguments the wrapper was started with, minus the program name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    args: Vec<String>,
}

impl InvocationContext {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1).collect())
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments to hand back to the host tool after installing.
    pub fn reexec_args(&self, mode: ReExecMode) -> Vec<String> {
        match mode {
            ReExecMode::FullArgs => self.args.clone(),
            ReExecMode::FirstArgOnly => self.args.iter().take(1).cloned().collect(),
        }
    }
}
