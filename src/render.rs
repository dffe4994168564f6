//! Output rendering for the chat shell.
//!
//! This module provides the renderer trait and a plain-text implementation
//! that writes chunked replies, notices, and profile summaries to stdout
//! with optional ANSI styling.

use std::io::{self, Stdout, Write};

use crate::format::MessageChunk;
use crate::profile::{MISSING_VALUE, StudentProfile};
use crate::types::PENDING_TEXT;

/// ANSI escape code for dim text (used for the pending placeholder).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for the pending placeholder).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for headings).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for notices).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Shown when no profile document exists for the signed-in student.
const NO_PROFILE_TEXT: &str = "We have not received additional profile info yet.";

////////////////////////////////////////////// Renderer //////////////////////////////////////////

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - TUI rendering
pub trait Renderer: Send {
    /// Print the pending placeholder shown while a reply is in flight.
    fn print_pending(&mut self);

    /// Print a resolved reply as display chunks.
    ///
    /// Paragraphs are separated by blank lines; list items are bulleted.
    fn print_reply(&mut self, chunks: &[MessageChunk]);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print the generic failure notice.
    fn print_notice(&mut self, notice: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a profile summary, or the absence message when no document
    /// exists. `name_hint` fills in for a profile without a usable name.
    fn print_profile(&mut self, profile: Option<&StudentProfile>, name_hint: Option<&str>);
}

/////////////////////////////////////// PlainTextRenderer ////////////////////////////////////////

/// Plain text renderer with optional ANSI styling.
///
/// This renderer outputs text directly to stdout with optional
/// ANSI escape codes for styling the placeholder, notices, and errors.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
        }
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn print_styled(&mut self, style: &str, text: &str) {
        if self.use_color {
            println!("{style}{text}{ANSI_RESET}");
        } else {
            println!("{text}");
        }
        self.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_pending(&mut self) {
        if self.use_color {
            println!("{ANSI_DIM}{ANSI_ITALIC}{PENDING_TEXT}{ANSI_RESET}");
        } else {
            println!("{PENDING_TEXT}");
        }
        self.flush();
    }

    fn print_reply(&mut self, chunks: &[MessageChunk]) {
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                println!();
            }
            match chunk {
                MessageChunk::Paragraph { text } => println!("{text}"),
                MessageChunk::List { items } => {
                    for item in items {
                        println!("  • {item}");
                    }
                }
            }
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.flush();
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_notice(&mut self, notice: &str) {
        self.print_styled(ANSI_YELLOW, notice);
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    fn print_profile(&mut self, profile: Option<&StudentProfile>, name_hint: Option<&str>) {
        let Some(profile) = profile else {
            self.print_info(NO_PROFILE_TEXT);
            return;
        };
        let lines = profile_lines(profile, name_hint);
        self.print_styled(ANSI_CYAN, &lines[0]);
        for line in &lines[1..] {
            println!("{line}");
        }
        self.flush();
    }
}

/// Renders a profile as display lines: a heading followed by label/value
/// pairs, with the missing-value placeholder standing in for absent fields.
fn profile_lines(profile: &StudentProfile, name_hint: Option<&str>) -> Vec<String> {
    fn pair(label: &str, value: Option<&str>) -> String {
        format!("  {label}: {}", value.unwrap_or(MISSING_VALUE))
    }

    let name = profile
        .full_name()
        .or_else(|| name_hint.map(|name| name.to_string()))
        .unwrap_or_else(|| "Prospective student".to_string());

    let mut lines = vec![name];
    lines.push(pair("Email", profile.email.as_deref()));
    lines.push(pair("Phone", profile.phone_number.as_deref()));
    lines.push(pair("Study level", profile.study_level.as_deref()));
    lines.push(pair("Source", profile.source.as_deref()));

    if let Some(preferences) = &profile.preferences {
        let budget = preferences
            .budget
            .as_ref()
            .map(|budget| budget.display())
            .unwrap_or_else(|| MISSING_VALUE.to_string());
        lines.push(format!("  Budget: {budget}"));

        let destinations = preferences
            .destination_countries
            .as_deref()
            .filter(|countries| !countries.is_empty())
            .map(|countries| countries.join(", "))
            .unwrap_or_else(|| MISSING_VALUE.to_string());
        lines.push(format!("  Destinations: {destinations}"));

        let field = preferences
            .field_of_study
            .as_ref()
            .map(|field| field.display())
            .unwrap_or_else(|| MISSING_VALUE.to_string());
        lines.push(format!("  Field of study: {field}"));

        let intake = preferences
            .intake
            .as_ref()
            .map(|intake| intake.display())
            .unwrap_or_else(|| MISSING_VALUE.to_string());
        lines.push(format!("  Intake: {intake}"));
    }

    let updated = profile
        .last_updated()
        .map(|timestamp| timestamp.display())
        .unwrap_or_else(|| MISSING_VALUE.to_string());
    lines.push(format!("  Updated: {updated}"));

    lines
}
