//! Console session loop
//!
//! Reads command lines from any async reader, dispatches them, and writes
//! response lines to any async writer.

use log::{error, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::console::commands::parse_command;
use crate::console::handler::{CommandStatus, Services, handle_command};
use crate::console::responses::format_response;
use crate::error::handlers::codes;
use crate::utils::validation::{is_valid_input, sanitize_input};

/// Runs a session until `QUIT` or end of input.
///
/// - Lines longer than `max_input_length` are refused with `500 Command too long`.
/// - Blank lines are ignored; other malformed lines, including non UTF-8
///   ones, get `501 Malformed input` and the session carries on.
pub async fn run_session<R, W>(
    mut reader: R,
    mut writer: W,
    services: &Services,
    max_input_length: usize,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) => {
                info!("Console input closed");
                break;
            }
            Ok(_) => {
                let Ok(line) = std::str::from_utf8(&buffer) else {
                    warn!("Rejected console line that is not valid UTF-8");
                    respond(&mut writer, codes::MALFORMED, "Malformed input").await?;
                    continue;
                };
                let raw = line.trim_end_matches(['\r', '\n']);

                if raw.len() > max_input_length {
                    respond(&mut writer, codes::BAD_SYNTAX, "Command too long").await?;
                    continue;
                }

                if raw.trim().is_empty() {
                    continue;
                }

                if !is_valid_input(raw, max_input_length) {
                    respond(&mut writer, codes::MALFORMED, "Malformed input").await?;
                    continue;
                }

                let command = parse_command(&sanitize_input(raw));
                let result = handle_command(services, &command).await;

                writer.write_all(result.message.as_bytes()).await?;
                writer.flush().await?;

                if result.status == CommandStatus::CloseConnection {
                    info!("Console session ended by QUIT");
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read console input: {}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}

async fn respond<W>(writer: &mut W, code: u16, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(format_response(code, text).as_bytes()).await?;
    writer.flush().await
}
