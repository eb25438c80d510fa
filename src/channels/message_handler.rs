use super::traits::{Channel, ChannelMessage};
use crate::links::pipeline::{self, MessageReport};
use crate::links::resolver::Resolver;
use crate::links::types::LinkRules;
use std::sync::Arc;

/// Reply for failures outside the per-link scope. The handling path must
/// always answer and must never take the listener down with it.
pub const UNEXPECTED_ERROR_REPLY: &str = "❌ An error occurred while processing the message";

/// Handle one inbound message end to end: run the pipeline, then perform
/// the effectful reduction (eager per-link failure replies, best-effort
/// deletion of the original, one consolidated success reply).
pub async fn handle_channel_message(
    channel: Arc<dyn Channel>,
    rules: Arc<LinkRules>,
    resolver: Arc<Resolver>,
    msg: ChannelMessage,
) {
    let report = pipeline::process(&msg.content, &rules, &resolver).await;

    if let Err(e) = deliver(channel.as_ref(), &msg, &report).await {
        tracing::error!(channel = %msg.channel, sender = %msg.sender, error = %e, "message handling failed");
        if let Err(e) = channel.send(UNEXPECTED_ERROR_REPLY, &msg.sender).await {
            tracing::error!(error = %e, "failed to send the error reply");
        }
    }
}

pub async fn deliver(
    channel: &dyn Channel,
    msg: &ChannelMessage,
    report: &MessageReport,
) -> anyhow::Result<()> {
    for line in &report.immediate_replies {
        channel.send_chunked(line, &msg.sender).await?;
    }

    let Some(summary) = &report.summary else {
        return Ok(());
    };

    // Deletion comes first so the rewritten links replace the original in
    // the chat; a failed delete (e.g. missing admin rights) is logged and
    // ignored, it must not block the reply.
    if report.delete_original {
        if let Some(message_id) = &msg.message_id {
            if let Err(e) = channel.delete_message(&msg.sender, message_id).await {
                tracing::warn!(error = %e, "could not delete original message");
            }
        }
    }

    channel.send_chunked(summary, &msg.sender).await
}
