use super::TelegramChannel;
use crate::channels::traits::{Channel, ChannelMessage};
use crate::error::TransportError;
use anyhow::Context;
use async_trait::async_trait;

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn max_message_length(&self) -> usize {
        4096
    }

    async fn send(&self, message: &str, chat_id: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": message,
        });

        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(TransportError::Send {
                channel: "telegram".into(),
                message: format!("({status}): {err}"),
            }
            .into());
        }

        Ok(())
    }

    async fn delete_message(&self, chat_id: &str, message_id: &str) -> anyhow::Result<()> {
        let message_id: i64 = message_id
            .parse()
            .context("telegram message_id must be numeric")?;
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });

        let resp = self
            .client
            .post(self.api_url("deleteMessage"))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(TransportError::Delete {
                channel: "telegram".into(),
                message: format!("({status}): {err}"),
            }
            .into());
        }

        Ok(())
    }

    async fn listen(&self, tx: tokio::sync::mpsc::Sender<ChannelMessage>) -> anyhow::Result<()> {
        let mut offset: i64 = 0;

        tracing::info!("Telegram channel listening for messages...");

        loop {
            let body = serde_json::json!({
                "offset": offset,
                "timeout": 30,
                "allowed_updates": ["message"]
            });

            let resp = match self
                .client
                .post(self.api_url("getUpdates"))
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Telegram poll error: {e}");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }
            };

            let data: serde_json::Value = match resp.json().await {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Telegram parse error: {e}");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }
            };

            let Some(results) = data.get("result").and_then(serde_json::Value::as_array) else {
                continue;
            };

            for update in results {
                // Advance offset past this update
                if let Some(uid) = update.get("update_id").and_then(serde_json::Value::as_i64) {
                    offset = uid + 1;
                }

                let Some(message) = update.get("message") else {
                    continue;
                };

                // Photos, stickers and other non-text updates are skipped.
                let Some(text) = message.get("text").and_then(serde_json::Value::as_str) else {
                    continue;
                };

                let username = message
                    .get("from")
                    .and_then(|f| f.get("username"))
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("unknown");

                let user_id = message
                    .get("from")
                    .and_then(|f| f.get("id"))
                    .and_then(serde_json::Value::as_i64)
                    .map(|id| id.to_string());

                let mut identities = vec![username];
                if let Some(ref id) = user_id {
                    identities.push(id.as_str());
                }

                if !self.is_any_user_allowed(identities.iter().copied()) {
                    tracing::warn!(
                        username,
                        user_id = user_id.as_deref().unwrap_or("unknown"),
                        "Telegram: ignoring message from unauthorized user"
                    );
                    continue;
                }

                let chat_id = message
                    .get("chat")
                    .and_then(|c| c.get("id"))
                    .and_then(serde_json::Value::as_i64)
                    .map(|id| id.to_string())
                    .unwrap_or_default();

                let message_id = message
                    .get("message_id")
                    .and_then(serde_json::Value::as_i64)
                    .map(|id| id.to_string());

                let msg = ChannelMessage {
                    sender: chat_id,
                    content: text.to_string(),
                    channel: "telegram".to_string(),
                    message_id,
                };

                if tx.send(msg).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    async fn health_check(&self) -> bool {
        self.client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
