//! General message formatting functions for prettifying the CLI.
//! Includes basic utility functions such as:
//!
//! - Highlight Text (make the text the theme color but not bold)
//! - System message formatting functions that produce the same
//! format messages.

use colored::{Color, Colorize};

use crate::cli::colors::{REPORT_AMBER, REPORT_TEAL};

pub fn highlight_argument(argument: &str) -> String {
    //! Highlight a piece of text in the theme color to make it obvious.
    //!
    //! Returns a formatted string.

    format!("{}", argument.color(REPORT_TEAL))
}

pub fn system_message(source_name: &str, message: String) -> String {
    //! Format a status line on the command line according to the theme.
    //!
    //! Takes in a source name (like 'gather') and the message as a
    //! formatted text; output of [`format!`].

    tagged_message(source_name, message, REPORT_TEAL)
}

pub fn warning_message(source_name: &str, message: String) -> String {
    tagged_message(source_name, message, REPORT_AMBER)
}

fn tagged_message(source_name: &str, message: String, color: Color) -> String {
    let source_formatted = format!("{:6}", source_name.color(color).bold());
    format!("[{}] {}", source_formatted, message)
}
