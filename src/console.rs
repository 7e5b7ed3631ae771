use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Interactive surface used by the installer.
pub trait Console {
    fn say(&mut self, line: &str) -> io::Result<()>;

    /// Shows `prompt` and reads one line. Anything other than the
    /// opposite answer counts as the default.
    fn confirm(&mut self, prompt: &str, default_yes: bool) -> io::Result<bool>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn say(&mut self, line: &str) -> io::Result<()> {
        (**self).say(line)
    }

    fn confirm(&mut self, prompt: &str, default_yes: bool) -> io::Result<bool> {
        (**self).confirm(prompt, default_yes)
    }
}

pub struct TermConsole<R, W> {
    input: R,
    output: W,
}

impl TermConsole<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TermConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for TermConsole<R, W> {
    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    fn confirm(&mut self, prompt: &str, default_yes: bool) -> io::Result<bool> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        // EOF reads as an empty answer.
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let answer = chomp(&line);

        Ok(if default_yes {
            answer != "n"
        } else {
            answer == "y"
        })
    }
}

/// Strips one trailing line terminator and nothing else.
fn chomp(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
