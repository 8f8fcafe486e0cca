//! Message repository contract
//!
//! Defines the message record and the storage capability behind the
//! messages service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::MessageError;

/// A stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn find_one(&self, id: &str) -> Result<Option<Message>, MessageError>;

    async fn find_all(&self) -> Result<Vec<Message>, MessageError>;

    async fn create(&self, content: &str) -> Result<Message, MessageError>;
}

pub type DynMessageRepository = Arc<dyn MessageRepository>;
