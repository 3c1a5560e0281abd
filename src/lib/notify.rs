use log::{error, info};
use std::io::{BufRead, Write};

/// Toast-style user notifications, fire and forget.
pub trait Notifier {
    fn notify_success(&mut self, message: &str);
    fn notify_error(&mut self, message: &str);
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_success(&mut self, message: &str) {
        info!("{}", message);
    }

    fn notify_error(&mut self, message: &str) {
        error!("{}", message);
    }
}

/// Yes/no question before committing a submission.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Asks on a terminal-like reader/writer pair.
pub struct TerminalConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalConfirm { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{} [y/N] ", prompt).is_err() || self.output.flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
