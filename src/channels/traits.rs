use async_trait::async_trait;

/// A text message received from a channel.
///
/// `sender` is the reply target (e.g. Telegram chat ID); `message_id`
/// identifies the message within that chat so it can be deleted.
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    pub sender: String,
    pub content: String,
    pub channel: String,
    pub message_id: Option<String>,
}

/// Core channel trait — implement for any messaging platform
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name
    fn name(&self) -> &str;

    /// Send a message through this channel
    async fn send(&self, message: &str, recipient: &str) -> anyhow::Result<()>;

    /// Start listening for incoming messages (long-running)
    async fn listen(&self, tx: tokio::sync::mpsc::Sender<ChannelMessage>) -> anyhow::Result<()>;

    /// Delete a previously received message.
    async fn delete_message(&self, _chat_id: &str, _message_id: &str) -> anyhow::Result<()> {
        anyhow::bail!("message deletion not supported by this channel")
    }

    /// Check if channel is healthy
    async fn health_check(&self) -> bool {
        true
    }

    fn max_message_length(&self) -> usize {
        usize::MAX
    }

    /// Send a message, splitting it when it exceeds the platform cap.
    async fn send_chunked(&self, message: &str, recipient: &str) -> anyhow::Result<()> {
        for chunk in super::chunker::chunk_message(message, self.max_message_length()) {
            self.send(&chunk, recipient).await?;
        }
        Ok(())
    }
}
