pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod messages;
pub mod utils;

pub use auth::{CredentialAuthenticator, Identity, InMemoryUserDirectory, UserDirectory};
pub use messages::{JsonFileMessageRepository, MessagesService};
