//! Console command parsing
//!
//! Turns one input line into a [`Command`]. Verbs are case-insensitive;
//! a known verb with missing arguments parses as `Unknown`.

#[derive(Debug, PartialEq)]
pub enum Command {
    Signup { email: String, password: String },
    Signin { email: String, password: String },
    Post(String),
    Get(String),
    List,
    Quit,
    Unknown(String),
}

/// Parse raw command string into Command enum
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "QUIT" | "Q" => Command::Quit,
        "LIST" => Command::List,
        "SIGNUP" | "SIGNIN" => match parse_credentials(arg) {
            Some((email, password)) if cmd == "SIGNUP" => Command::Signup { email, password },
            Some((email, password)) => Command::Signin { email, password },
            None => Command::Unknown(trimmed.to_string()),
        },
        "POST" if !arg.is_empty() => Command::Post(arg.to_string()),
        "GET" if !arg.is_empty() => Command::Get(arg.to_string()),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// Split `<email> <password>`; the password may not contain whitespace
fn parse_credentials(arg: &str) -> Option<(String, String)> {
    let mut parts = arg.split_whitespace();
    let email = parts.next()?;
    let password = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((email.to_string(), password.to_string()))
}
