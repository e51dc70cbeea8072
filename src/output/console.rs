use crate::output::traits::{Emitter, Tag};
use colored::{ColoredString, Colorize};
use std::io::Write;

/// Writes `[tag] value` lines to standard output
///
/// Standard output carries nothing but discovered items, so the stream can
/// be piped into other tools. Logs go to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEmitter {
    color: bool,
    silent: bool,
}

impl ConsoleEmitter {
    /// Creates a console emitter
    ///
    /// # Arguments
    ///
    /// * `color` - Colorize the tag
    /// * `silent` - Suppress all output
    pub fn new(color: bool, silent: bool) -> Self {
        Self { color, silent }
    }

    /// Formats one output line, without the trailing newline
    pub fn format_line(&self, tag: Tag, value: &str) -> String {
        if self.color {
            format!("{} {}", colorize(tag), value)
        } else {
            format!("{} {}", tag, value)
        }
    }
}

fn colorize(tag: Tag) -> ColoredString {
    let label = tag.to_string();
    match tag {
        Tag::Url => label.green(),
        Tag::Javascript => label.yellow(),
        Tag::Linkfinder => label.cyan(),
        Tag::S3 => label.red().bold(),
    }
}

impl Emitter for ConsoleEmitter {
    fn emit(&self, tag: Tag, value: &str) {
        if self.silent {
            return;
        }

        let line = self.format_line(tag, value);
        let mut stdout = std::io::stdout().lock();
        // A closed pipe must not bring the crawl down.
        let _ = writeln!(stdout, "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line() {
        let emitter = ConsoleEmitter::new(false, false);
        assert_eq!(
            emitter.format_line(Tag::Url, "https://example.com/a"),
            "[url] https://example.com/a"
        );
        assert_eq!(
            emitter.format_line(Tag::S3, "b.s3.amazonaws.com"),
            "[s3] b.s3.amazonaws.com"
        );
    }

    #[test]
    fn test_colored_line_keeps_text() {
        colored::control::set_override(true);
        let emitter = ConsoleEmitter::new(true, false);
        let line = emitter.format_line(Tag::Linkfinder, "https://example.com/api");
        colored::control::unset_override();

        assert!(line.contains("[linkfinder]"));
        assert!(line.ends_with(" https://example.com/api"));
        assert!(line.contains('\u{1b}'));
    }
}
