pub mod config;
pub mod invocation;
