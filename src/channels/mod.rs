pub mod chunker;
pub mod message_handler;
pub mod telegram;
pub mod traits;

pub use telegram::TelegramChannel;
pub use traits::{Channel, ChannelMessage};

use crate::config::Config;
use crate::links::resolver::Resolver;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

const CHANNEL_INITIAL_BACKOFF_SECS: u64 = 2;
const CHANNEL_MAX_BACKOFF_SECS: u64 = 60;

/// Build every channel the config enables.
pub fn build_channels(config: &Config) -> Vec<Arc<dyn Channel>> {
    let mut channels: Vec<Arc<dyn Channel>> = Vec::new();

    if let Some(tg) = &config.channels.telegram {
        channels.push(Arc::new(TelegramChannel::new(
            tg.bot_token.clone(),
            tg.allowed_users.clone(),
        )));
    }

    channels
}

/// Start all configured channels and dispatch one handling task per
/// inbound message. Messages from different chats are handled
/// concurrently; links within one message stay sequential. Runs until
/// ctrl-c.
pub async fn start_channels(config: &Config) -> Result<()> {
    let channels = build_channels(config);
    if channels.is_empty() {
        anyhow::bail!("no channels configured, add a [channels.telegram] section to the config");
    }

    let rules = Arc::new(config.link_rules());
    let resolver = Arc::new(Resolver::new(&rules)?);

    let (tx, mut rx) = tokio::sync::mpsc::channel::<ChannelMessage>(100);

    let listeners: Vec<_> = channels
        .iter()
        .map(|ch| spawn_supervised_listener(Arc::clone(ch), tx.clone()))
        .collect();
    drop(tx);

    tracing::info!("bot started, waiting for messages");

    loop {
        tokio::select! {
            maybe_msg = rx.recv() => {
                let Some(msg) = maybe_msg else { break };
                let Some(origin) = channels
                    .iter()
                    .find(|ch| ch.name() == msg.channel)
                    .map(Arc::clone)
                else {
                    tracing::warn!(channel = %msg.channel, "message from unknown channel dropped");
                    continue;
                };
                tokio::spawn(message_handler::handle_channel_message(
                    origin,
                    Arc::clone(&rules),
                    Arc::clone(&resolver),
                    msg,
                ));
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    for handle in listeners {
        handle.abort();
    }
    Ok(())
}

/// Keep a channel listener alive, restarting it with capped exponential
/// backoff when it exits.
fn spawn_supervised_listener(
    ch: Arc<dyn Channel>,
    tx: tokio::sync::mpsc::Sender<ChannelMessage>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut backoff = CHANNEL_INITIAL_BACKOFF_SECS;

        loop {
            tracing::debug!(channel = ch.name(), "channel listener starting");
            let result = ch.listen(tx.clone()).await;

            if tx.is_closed() {
                break;
            }

            match result {
                Ok(()) => {
                    tracing::warn!("Channel {} exited unexpectedly; restarting", ch.name());
                    // Clean exit -- reset backoff since the listener ran successfully
                    backoff = CHANNEL_INITIAL_BACKOFF_SECS;
                }
                Err(e) => {
                    tracing::error!("Channel {} error: {e}; restarting", ch.name());
                }
            }

            tokio::time::sleep(Duration::from_secs(backoff)).await;
            // Double backoff AFTER sleeping so the first error uses the initial value
            backoff = backoff.saturating_mul(2).min(CHANNEL_MAX_BACKOFF_SECS);
        }
    })
}

/// Health-check every configured channel, with a bounded wait per check.
pub async fn doctor_channels(config: &Config) -> Result<()> {
    let channels = build_channels(config);

    if channels.is_empty() {
        println!("No channels configured.");
        return Ok(());
    }

    for ch in channels {
        let result = tokio::time::timeout(Duration::from_secs(10), ch.health_check()).await;
        match result {
            Ok(true) => println!("  ✓ {:<9} healthy", ch.name()),
            Ok(false) => println!("  ✗ {:<9} unhealthy (check the bot token)", ch.name()),
            Err(_) => println!("  ! {:<9} health check timed out", ch.name()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChannelsConfig, TelegramConfig};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AlwaysFailChannel {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Channel for AlwaysFailChannel {
        fn name(&self) -> &str {
            "always-fail"
        }

        async fn send(&self, _message: &str, _recipient: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn listen(
            &self,
            _tx: tokio::sync::mpsc::Sender<ChannelMessage>,
        ) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("listen boom")
        }
    }

    #[tokio::test]
    async fn supervised_listener_restarts_on_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let channel: Arc<dyn Channel> = Arc::new(AlwaysFailChannel {
            calls: Arc::clone(&calls),
        });

        let (tx, rx) = tokio::sync::mpsc::channel::<ChannelMessage>(1);
        let handle = spawn_supervised_listener(channel, tx);

        tokio::time::sleep(Duration::from_millis(80)).await;
        drop(rx);
        handle.abort();
        let _ = handle.await;

        assert!(calls.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn build_channels_empty_without_config() {
        let config = Config::default();
        assert!(build_channels(&config).is_empty());
    }

    #[test]
    fn build_channels_with_telegram() {
        let config = Config {
            channels: ChannelsConfig {
                telegram: Some(TelegramConfig {
                    bot_token: "123:ABC".into(),
                    allowed_users: vec!["*".into()],
                }),
            },
            ..Config::default()
        };
        let channels = build_channels(&config);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name(), "telegram");
    }
}
