//! Line and table rendering for the CLI.
//!
//! An `Output` either writes straight to the terminal or, in capture mode,
//! keeps the rendered lines so tests can inspect them.

use std::io::{self, Write};

/// Output sink for command results.
#[derive(Debug, Default)]
pub struct Output {
    capture: bool,
    lines: Vec<String>,
}

impl Output {
    /// Writes to stdout (errors go to stderr).
    pub fn stdout() -> Self {
        Self::default()
    }

    /// Stores rendered lines instead of writing them.
    pub fn capture() -> Self {
        Self {
            capture: true,
            lines: Vec::new(),
        }
    }

    pub fn line(&mut self, message: impl AsRef<str>) {
        self.write(message.as_ref().to_string(), false);
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.write(format!("[INFO] {}", message.as_ref()), false);
    }

    pub fn success(&mut self, message: impl AsRef<str>) {
        self.write(format!("[OK] {}", message.as_ref()), false);
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.write(format!("[ERROR] {}", message.as_ref()), true);
    }

    /// Renders an aligned table: header, dashed rule, then one line per row.
    ///
    /// Column width is the widest cell in that column, header included.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let header = format_row(headers, &widths);
        self.write(header, false);
        self.write(format_row(&rule, &widths), false);
        for row in rows {
            self.write(format_row(row, &widths), false);
        }
    }

    /// Captured lines (empty unless in capture mode).
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Captured lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn write(&mut self, message: String, is_error: bool) {
        if self.capture {
            self.lines.push(message);
            return;
        }

        // A closed pipe is not worth failing the command over.
        let _ = if is_error {
            writeln!(io::stderr().lock(), "{}", message)
        } else {
            writeln!(io::stdout().lock(), "{}", message)
        };
    }
}

fn format_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_message_kinds() {
        let mut output = Output::capture();
        output.line("plain");
        output.info("note");
        output.success("done");
        output.error("broken");

        assert_eq!(
            output.lines(),
            &["plain", "[INFO] note", "[OK] done", "[ERROR] broken"]
        );
    }

    #[test]
    fn table_widths_follow_widest_cell() {
        let mut output = Output::capture();
        output.table(
            &["ID", "Name"],
            &[
                vec!["1".to_string(), "Spring".to_string()],
                vec!["10".to_string(), "Fall".to_string()],
            ],
        );

        assert_eq!(
            output.lines(),
            &["ID | Name", "-- | ------", "1  | Spring", "10 | Fall"]
        );
    }

    #[test]
    fn header_can_be_widest() {
        let mut output = Output::capture();
        output.table(&["Milestones", "X"], &[vec!["2".to_string(), "y".to_string()]]);

        assert_eq!(output.lines()[0], "Milestones | X");
        assert_eq!(output.lines()[2], "2          | y");
    }

    #[test]
    fn widths_count_characters_not_bytes() {
        let mut output = Output::capture();
        output.table(&["Owner", "N"], &[vec!["Zoë".to_string(), "1".to_string()]]);

        assert_eq!(output.lines()[2], "Zoë   | 1");
    }

    #[test]
    fn empty_table_still_has_header() {
        let mut output = Output::capture();
        output.table(&["ID"], &[]);
        assert_eq!(output.lines(), &["ID", "--"]);
    }
}
