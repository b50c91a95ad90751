//! Command handlers

pub mod generate;
pub mod titles;

/// Where user-facing status lines are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    /// Stdout carries only the report in JSON mode
    pub(crate) fn for_mode(json: bool) -> Self {
        if json {
            Stream::Stderr
        } else {
            Stream::Stdout
        }
    }
}

/// Print a status line on the stream for the current output mode
pub(crate) fn say(json: bool, line: impl std::fmt::Display) {
    match Stream::for_mode(json) {
        Stream::Stdout => println!("{}", line),
        Stream::Stderr => eprintln!("{}", line),
    }
}
