use colored::{ColoredString, Colorize};
use plankit::{SynthesizedLine, Tone, synthesize::SEPARATOR};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Log Lines
// ============================================================================

/// Width of the line number gutter
const GUTTER: usize = 5;

/// Color text with a tone
pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Positive => text.green(),
        Tone::Info => text.cyan(),
        Tone::Caution => text.yellow(),
        Tone::Alert => text.red(),
        Tone::Plain => text.normal(),
    }
}

/// Format an original log line with its number
pub fn log_line(index: u64, text: &str) -> String {
    format!("{} {}", format!("{index:>width$}", width = GUTTER).dimmed(), text)
}

/// Format a synthesized line for the terminal
pub fn plan_line(line: &SynthesizedLine) -> String {
    let mut body = String::new();
    if let Some(indent) = line.indent {
        body.push_str(&paint(&indent.glyph.to_string(), indent.tone).to_string());
        body.push(' ');
    }

    let text = paint(&line.text, line.tone);
    if line.tone == Tone::Plain {
        body.push_str(&text.to_string());
    } else {
        body.push_str(&text.bold().to_string());
    }

    if line.trailing_separator {
        body.push_str(SEPARATOR);
    }

    log_line(line.index, &body)
}

// ============================================================================
// Tests
// ============================================================================
