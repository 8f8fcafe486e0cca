//! JSON file message store
//!
//! Persists messages as one JSON object keyed by message id:
//! `{ "12": { "id": "12", "content": "hi" } }`. A missing file reads as an
//! empty store.

use async_trait::async_trait;
use log::debug;
use rand::Rng;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::MessageError;
use crate::messages::repository::{Message, MessageRepository};

/// Message ids are drawn uniformly from `0..MESSAGE_ID_SPACE`;
/// `find_all` lists them in numeric order
pub const MESSAGE_ID_SPACE: u32 = 1_000_000;

type MessageMap = BTreeMap<String, Message>;

pub struct JsonFileMessageRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles in `create`
    write_lock: Mutex<()>,
}

impl JsonFileMessageRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<MessageMap, MessageError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(MessageMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(MessageMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temp file so readers never observe a partial document
    async fn save(&self, messages: &MessageMap) -> Result<(), MessageError> {
        let contents = serde_json::to_string_pretty(messages)?;
        let temp_path = self.path.with_extension("json.tmp");

        fs::write(&temp_path, contents).await?;
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

fn unused_id(messages: &MessageMap) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let id = rng.gen_range(0..MESSAGE_ID_SPACE).to_string();
        if !messages.contains_key(&id) {
            return id;
        }
    }
}

// Ids that are not numbers (hand-edited files) sort after numeric ones
fn numeric_id(message: &Message) -> u64 {
    message.id.parse().unwrap_or(u64::MAX)
}

#[async_trait]
impl MessageRepository for JsonFileMessageRepository {
    async fn find_one(&self, id: &str) -> Result<Option<Message>, MessageError> {
        let mut messages = self.load().await?;
        Ok(messages.remove(id))
    }

    async fn find_all(&self) -> Result<Vec<Message>, MessageError> {
        let mut messages: Vec<Message> = self.load().await?.into_values().collect();
        messages.sort_by(|a, b| {
            numeric_id(a)
                .cmp(&numeric_id(b))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(messages)
    }

    async fn create(&self, content: &str) -> Result<Message, MessageError> {
        let _guard = self.write_lock.lock().await;

        let mut messages = self.load().await?;
        let message = Message {
            id: unused_id(&messages),
            content: content.to_string(),
        };
        messages.insert(message.id.clone(), message.clone());
        self.save(&messages).await?;

        debug!(
            "Stored message {} in {}",
            message.id,
            self.path.display()
        );
        Ok(message)
    }
}
