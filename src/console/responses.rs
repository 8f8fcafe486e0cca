//! Console response handling
//!
//! Responses are one line: `<code> <text>`.

/// Format a console response line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\n", code, message)
}
