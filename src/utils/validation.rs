//! Input validation utilities
//!
//! Provides input sanitation for console lines.

/// Validate that input is not empty, within `max_length`, and free of control line breaks
pub fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Sanitize user input
pub fn sanitize_input(input: &str) -> String {
    input.trim().to_string()
}
