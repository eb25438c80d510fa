use affilink::channels::{Channel, ChannelMessage};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory channel that records every outbound call.
#[derive(Default)]
pub struct FakeChannel {
    pub sent: Mutex<Vec<(String, String)>>,
    pub deleted: Mutex<Vec<(String, String)>>,
    pub fail_deletes: bool,
}

impl FakeChannel {
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn deleted_messages(&self) -> Vec<(String, String)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for FakeChannel {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send(&self, message: &str, recipient: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), message.to_string()));
        Ok(())
    }

    async fn listen(
        &self,
        _tx: tokio::sync::mpsc::Sender<ChannelMessage>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn delete_message(&self, chat_id: &str, message_id: &str) -> anyhow::Result<()> {
        if self.fail_deletes {
            anyhow::bail!("insufficient rights to delete the message")
        }
        self.deleted
            .lock()
            .unwrap()
            .push((chat_id.to_string(), message_id.to_string()));
        Ok(())
    }
}
