//! Console command handlers
//!
//! Dispatches parsed commands to the authenticator and the messages service
//! and renders the outcome as a response line.

use log::info;
use serde::Serialize;

use crate::auth::CredentialAuthenticator;
use crate::console::commands::Command;
use crate::console::responses::format_response;
use crate::error::{AppError, MessageError};
use crate::error::handlers::{codes, error_to_status_code, handle_error, is_internal};
use crate::messages::MessagesService;

/// The services a console session drives
pub struct Services {
    pub authenticator: CredentialAuthenticator,
    pub messages: MessagesService,
}

impl Services {
    pub fn new(authenticator: CredentialAuthenticator, messages: MessagesService) -> Self {
        Self {
            authenticator,
            messages,
        }
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(u16),
    CloseConnection,
}

/// Full result of a command execution
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: String,
}

impl CommandResult {
    fn success(code: u16, text: &str) -> Self {
        Self {
            status: CommandStatus::Success,
            message: format_response(code, text),
        }
    }

    fn failure(code: u16, text: &str) -> Self {
        Self {
            status: CommandStatus::Failure(code),
            message: format_response(code, text),
        }
    }

    fn from_error(err: impl Into<AppError>) -> Self {
        let err = err.into();
        if is_internal(&err) {
            handle_error(&err);
        }
        Self::failure(error_to_status_code(&err), &err.to_string())
    }

    fn json<T: Serialize>(code: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::success(code, &body),
            Err(e) => Self::from_error(MessageError::from(e)),
        }
    }
}

/// Dispatches a parsed command to its handler
pub async fn handle_command(services: &Services, command: &Command) -> CommandResult {
    match command {
        Command::Signup { email, password } => handle_cmd_signup(services, email, password).await,
        Command::Signin { email, password } => handle_cmd_signin(services, email, password).await,
        Command::Post(content) => handle_cmd_post(services, content).await,
        Command::Get(id) => handle_cmd_get(services, id).await,
        Command::List => handle_cmd_list(services).await,
        Command::Quit => handle_cmd_quit(),
        Command::Unknown(_) => handle_cmd_unknown(),
    }
}

async fn handle_cmd_signup(services: &Services, email: &str, password: &str) -> CommandResult {
    match services.authenticator.signup(email, password).await {
        Ok(identity) => CommandResult::json(codes::CREATED, &identity),
        Err(e) => CommandResult::from_error(e),
    }
}

async fn handle_cmd_signin(services: &Services, email: &str, password: &str) -> CommandResult {
    match services.authenticator.signin(email, password).await {
        Ok(identity) => CommandResult::json(codes::OK, &identity),
        Err(e) => CommandResult::from_error(e),
    }
}

async fn handle_cmd_post(services: &Services, content: &str) -> CommandResult {
    match services.messages.create(content).await {
        Ok(message) => {
            info!("Created message {}", message.id);
            CommandResult::json(codes::CREATED, &message)
        }
        Err(e) => CommandResult::from_error(e),
    }
}

async fn handle_cmd_get(services: &Services, id: &str) -> CommandResult {
    match services.messages.find_one(id).await {
        Ok(Some(message)) => CommandResult::json(codes::OK, &message),
        Ok(None) => CommandResult::failure(codes::NOT_FOUND, "Message not found"),
        Err(e) => CommandResult::from_error(e),
    }
}

async fn handle_cmd_list(services: &Services) -> CommandResult {
    match services.messages.find_all().await {
        Ok(messages) => CommandResult::json(codes::OK, &messages),
        Err(e) => CommandResult::from_error(e),
    }
}

fn handle_cmd_quit() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: format_response(codes::GOODBYE, "Goodbye"),
    }
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult::failure(codes::BAD_SYNTAX, "Unknown command")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{InMemoryUserDirectory, SecretHasher};
    use crate::config::HashingConfig;
    use crate::messages::{Message, MessageRepository};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Repository fake holding a single message with id "1"
    struct SingleMessageRepository;

    #[async_trait]
    impl MessageRepository for SingleMessageRepository {
        async fn find_one(&self, id: &str) -> Result<Option<Message>, MessageError> {
            Ok((id == "1").then(|| Message {
                id: "1".into(),
                content: "first".into(),
            }))
        }

        async fn find_all(&self) -> Result<Vec<Message>, MessageError> {
            Ok(vec![Message {
                id: "1".into(),
                content: "first".into(),
            }])
        }

        async fn create(&self, content: &str) -> Result<Message, MessageError> {
            Ok(Message {
                id: "2".into(),
                content: content.to_string(),
            })
        }
    }

    fn services() -> Services {
        let hasher = SecretHasher::new(&HashingConfig {
            kdf_memory_kib: 256,
            kdf_iterations: 1,
            kdf_parallelism: 1,
        })
        .unwrap();

        Services::new(
            CredentialAuthenticator::new(Arc::new(InMemoryUserDirectory::new()), hasher),
            MessagesService::new(Arc::new(SingleMessageRepository)),
        )
    }

    fn signup(email: &str, password: &str) -> Command {
        Command::Signup {
            email: email.into(),
            password: password.into(),
        }
    }

    fn signin(email: &str, password: &str) -> Command {
        Command::Signin {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_signup_and_signin_responses() {
        let services = services();

        let result = handle_command(&services, &signup("abcd@gmail.com", "1234")).await;
        assert_eq!(result.status, CommandStatus::Success);
        assert_eq!(result.message, "201 {\"id\":1,\"email\":\"abcd@gmail.com\"}\n");

        let result = handle_command(&services, &signin("abcd@gmail.com", "1234")).await;
        assert_eq!(result.message, "200 {\"id\":1,\"email\":\"abcd@gmail.com\"}\n");
    }

    #[tokio::test]
    async fn test_auth_failures_use_distinct_codes() {
        let services = services();
        handle_command(&services, &signup("abcd@gmail.com", "1234")).await;

        let duplicate = handle_command(&services, &signup("abcd@gmail.com", "1234")).await;
        assert_eq!(duplicate.status, CommandStatus::Failure(409));

        let wrong = handle_command(&services, &signin("abcd@gmail.com", "wrong")).await;
        assert_eq!(wrong.status, CommandStatus::Failure(401));
        assert!(!wrong.message.contains("wrong"));

        let unknown = handle_command(&services, &signin("nobody@x.com", "x")).await;
        assert_eq!(unknown.status, CommandStatus::Failure(404));
    }

    #[tokio::test]
    async fn test_message_commands() {
        let services = services();

        let result = handle_command(&services, &Command::Post("hi".into())).await;
        assert_eq!(result.message, "201 {\"id\":\"2\",\"content\":\"hi\"}\n");

        let result = handle_command(&services, &Command::Get("1".into())).await;
        assert_eq!(result.message, "200 {\"id\":\"1\",\"content\":\"first\"}\n");

        let result = handle_command(&services, &Command::Get("9".into())).await;
        assert_eq!(result.status, CommandStatus::Failure(404));

        let result = handle_command(&services, &Command::List).await;
        assert_eq!(result.message, "200 [{\"id\":\"1\",\"content\":\"first\"}]\n");
    }

    #[tokio::test]
    async fn test_quit_and_unknown() {
        let services = services();

        let result = handle_command(&services, &Command::Quit).await;
        assert_eq!(result.status, CommandStatus::CloseConnection);
        assert_eq!(result.message, "221 Goodbye\n");

        let result = handle_command(&services, &Command::Unknown("FOO".into())).await;
        assert_eq!(result.status, CommandStatus::Failure(500));
    }
}
