//! Terminal preferences for table and board output, resolved once at startup.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

/// Narrowest `COLUMNS` value honored. The board draws four status columns
/// side by side; below this each one would be too thin to read a title.
const MIN_TERM_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    pub table_color: bool,
    pub term_width: Option<usize>,
}

/// What the environment says about the terminal we print to.
#[derive(Debug, Default)]
struct Terminal {
    stdout_tty: bool,
    no_color: bool,
    force_color: bool,
    columns: Option<String>,
}

impl Terminal {
    fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            no_color: std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            force_color: std::env::var_os("CLICOLOR_FORCE").is_some_and(|v| v != "0"),
            columns: std::env::var("COLUMNS").ok(),
        }
    }
}

impl UiPrefs {
    fn resolve(flags: &GlobalFlags, terminal: &Terminal) -> Self {
        // JSON and raw output stay byte-for-byte parseable.
        let table = flags.format == OutputFormat::Table;
        let table_color = table
            && match flags.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => {
                    !flags.quiet
                        && !terminal.no_color
                        && (terminal.stdout_tty || terminal.force_color)
                }
            };

        let term_width = terminal
            .columns
            .as_deref()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|width| *width >= MIN_TERM_WIDTH);

        Self {
            table_color,
            term_width,
        }
    }
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let prefs = UiPrefs::resolve(flags, &Terminal::detect());
    tracing::debug!(?prefs, "terminal preferences");
    let _ = UI_PREFS.set(prefs);
}

/// Preferences set by [`init`], or plain uncolored output before that.
#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}
