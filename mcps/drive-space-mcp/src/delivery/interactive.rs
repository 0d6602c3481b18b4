//! Interactive results dialog

use std::io::{BufRead, BufReader, Write};

use crate::error::{ReporterError, ReporterResult};
use crate::types::Log;

const DIALOG_TITLE: &str = "Disk Space Results";
const MIN_WIDTH: usize = 30;
const CLOSE_PROMPT: &str = "[ Close ]  press Enter to close";

/// Shows the run log in a framed dialog and waits for it to be closed
pub struct InteractiveDelivery {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

impl InteractiveDelivery {
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self { input, output }
    }

    /// Dialog on the terminal
    pub fn stdio() -> Self {
        Self::new(
            Box::new(BufReader::new(std::io::stdin())),
            Box::new(std::io::stdout()),
        )
    }

    /// Render the log, then block until the close line is entered
    ///
    /// Returns the number of log lines shown. End of input before the close
    /// line means the user went away and fails the run.
    pub fn deliver(mut self, log: Log) -> ReporterResult<usize> {
        let lines = log.lines().len();
        self.output.write_all(render_dialog(&log).as_bytes())?;
        self.output.flush()?;
        drop(log);

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(ReporterError::UserDetached);
        }

        tracing::debug!(lines, "results dialog closed");
        Ok(lines)
    }
}

/// The dialog as text: a titled box around the log plus the close control
pub fn render_dialog(log: &Log) -> String {
    let width = log
        .lines()
        .iter()
        .map(|line| line.chars().count())
        .chain([DIALOG_TITLE.chars().count(), MIN_WIDTH])
        .max()
        .unwrap_or(MIN_WIDTH);

    let border = format!("+{}+\n", "-".repeat(width + 2));
    let mut out = String::new();

    out.push_str(&border);
    out.push_str(&format!("| {:<width$} |\n", DIALOG_TITLE));
    out.push_str(&border);
    for line in log.lines() {
        out.push_str(&format!("| {:<width$} |\n", line));
    }
    out.push_str(&border);
    out.push_str(CLOSE_PROMPT);
    out.push('\n');
    out
}
