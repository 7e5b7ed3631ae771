use std::io;
use std::process::Command;

/// Swaps the running process for another program.
pub trait ProcessReplacer {
    /// Only returns when the replacement could not happen.
    fn replace(&self, program: &str, args: &[String]) -> io::Error;
}

impl<T: ProcessReplacer + ?Sized> ProcessReplacer for &T {
    fn replace(&self, program: &str, args: &[String]) -> io::Error {
        (**self).replace(program, args)
    }
}

#[derive(Debug, Default)]
pub struct ExecReplacer;

impl ProcessReplacer for ExecReplacer {
    #[cfg(unix)]
    fn replace(&self, program: &str, args: &[String]) -> io::Error {
        use std::os::unix::process::CommandExt;

        Command::new(program).args(args).exec()
    }

    // No exec(2): run the program to completion and exit with its code.
    #[cfg(not(unix))]
    fn replace(&self, program: &str, args: &[String]) -> io::Error {
        match Command::new(program).args(args).status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(err) => err,
        }
    }
}
