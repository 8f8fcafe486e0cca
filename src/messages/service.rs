//! Messages service
//!
//! Forwards every call to the injected repository unchanged.

use crate::error::MessageError;
use crate::messages::repository::{DynMessageRepository, Message};

pub struct MessagesService {
    repository: DynMessageRepository,
}

impl MessagesService {
    pub fn new(repository: DynMessageRepository) -> Self {
        Self { repository }
    }

    pub async fn find_one(&self, id: &str) -> Result<Option<Message>, MessageError> {
        self.repository.find_one(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<Message>, MessageError> {
        self.repository.find_all().await
    }

    pub async fn create(&self, content: &str) -> Result<Message, MessageError> {
        self.repository.create(content).await
    }
}
