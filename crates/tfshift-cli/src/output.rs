use std::io::{self, Write};
use std::sync::OnceLock;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Clone, Copy)]
struct Mode {
    json: bool,
    color: ColorChoice,
}

static MODE: OnceLock<Mode> = OnceLock::new();

pub fn init(json: bool, no_color: bool) {
    let color = if no_color { ColorChoice::Never } else { ColorChoice::Auto };
    let _ = MODE.set(Mode { json, color });
}

fn mode() -> Mode {
    MODE.get().copied().unwrap_or(Mode {
        json: false,
        color: ColorChoice::Auto,
    })
}

pub fn is_json() -> bool {
    mode().json
}

pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

/// Report a fatal error on stderr.
pub fn fatal(msg: &str) {
    let mut err = StandardStream::stderr(mode().color);
    let _ = err.set_color(ColorSpec::new().set_fg(Some(FATAL)).set_bold(true));
    let _ = write!(err, "error:");
    let _ = err.reset();
    let _ = writeln!(err, " {msg}");
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(mode().color)
}

/// Azure-side actions.
pub const AZURE: Color = Color::Cyan;
/// Terraform-side actions and success.
pub const GOOD: Color = Color::Green;
pub const WARN: Color = Color::Yellow;
pub const FATAL: Color = Color::Red;

/// Write `text` in bold `color`, without a trailing newline.
pub fn colored(color: Color, text: &str) -> io::Result<()> {
    let mut out = stdout();
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{text}")?;
    out.reset()?;
    out.flush()
}

pub fn heading(color: Color, text: &str) -> io::Result<()> {
    println!();
    colored(color, text)?;
    println!();
    Ok(())
}

pub fn bullet(text: &str) {
    println!(" - {text}");
}

pub fn list(color: Color, title: &str, items: &[String]) -> io::Result<()> {
    heading(color, title)?;
    for item in items {
        bullet(item);
    }
    Ok(())
}
