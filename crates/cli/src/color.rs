// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use std::io::IsTerminal;

/// ANSI-256 palette used by the output decorations.
pub mod codes {
    /// Action start markers: magenta
    pub const START: u8 = 170;
    /// Action completion markers: green
    pub const DONE: u8 = 78;
    /// Failures: red
    pub const ERROR: u8 = 196;
    /// Log lines and informational banners: blue
    pub const INFO: u8 = 75;
    /// Skipped actions: grey
    pub const MUTED: u8 = 245;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Determine if color output should be enabled.
///
/// Priority: `--color` always/never → `NO_COLOR=1` disables → TTY check.
pub fn should_colorize(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
                return false;
            }
            std::io::stderr().is_terminal()
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Wrap `text` in an ANSI-256 foreground color when `colorize` is set.
pub fn paint(colorize: bool, code: u8, text: &str) -> String {
    if colorize {
        format!("\x1b[38;5;{code}m{text}{RESET}")
    } else {
        text.to_string()
    }
}
