//! Messages
//!
//! A pass-through service over a message repository, and a JSON file backed
//! repository implementation.

pub mod file_store;
pub mod repository;
pub mod service;

pub use file_store::JsonFileMessageRepository;
pub use repository::{DynMessageRepository, Message, MessageRepository};
pub use service::MessagesService;
