use crate::broker::{CheckDelivery, DelayedRedeliveryChannel, DelayedRedeliveryConsumer};
use crate::error::ChannelError;
use crate::messaging::contracts::{
    DeadLetterRecord, StatusCheckMessage, HEADER_DELAY, HEADER_FINAL_STATUS, HEADER_ORIGINAL_QUEUE,
    HEADER_RETRY_COUNT,
};
use chrono::Utc;
use redis::streams::StreamReadReply;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Durable delayed redelivery over Redis: published checks wait in a sorted
/// set scored by their visible-at time; a relay tick moves due entries into
/// a consumer-group stream. Pending entries survive process restarts.
pub struct RedisDelayedChannel {
    pub client: redis::Client,
    pub delayed_set: String,
    pub ready_stream: String,
    pub dead_letter_stream: String,
}

#[derive(Serialize, Deserialize)]
struct DelayedEntry {
    // Unique per publish so identical retries never collapse into one
    // sorted-set member.
    id: Uuid,
    message: StatusCheckMessage,
    retry_count: u32,
    delay_ms: u64,
}

impl RedisDelayedChannel {
    pub async fn run_relay(self: Arc<Self>) {
        loop {
            if let Err(err) = self.tick().await {
                tracing::error!("delayed relay error: {}", err);
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    }

    async fn tick(&self) -> Result<(), ChannelError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let now = Utc::now().timestamp_millis();

        let due: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(&self.delayed_set)
            .arg("-inf")
            .arg(now)
            .arg("LIMIT")
            .arg(0)
            .arg(100)
            .query_async(&mut conn)
            .await?;

        for member in due {
            let entry: DelayedEntry = serde_json::from_str(&member)?;
            let payload = serde_json::to_string(&entry.message)?;

            let _: String = redis::cmd("XADD")
                .arg(&self.ready_stream)
                .arg("*")
                .arg("key")
                .arg(entry.message.payment_id.to_string())
                .arg("payload")
                .arg(payload)
                .arg(HEADER_RETRY_COUNT)
                .arg(entry.retry_count)
                .arg(HEADER_DELAY)
                .arg(entry.delay_ms)
                .query_async(&mut conn)
                .await?;

            let _: i64 = redis::cmd("ZREM")
                .arg(&self.delayed_set)
                .arg(&member)
                .query_async(&mut conn)
                .await?;
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl DelayedRedeliveryChannel for RedisDelayedChannel {
    async fn publish(
        &self,
        message: StatusCheckMessage,
        retry_count: u32,
        delay: Duration,
    ) -> Result<(), ChannelError> {
        let entry = DelayedEntry {
            id: Uuid::new_v4(),
            message,
            retry_count,
            delay_ms: delay.as_millis() as u64,
        };
        let member = serde_json::to_string(&entry)?;
        let visible_at = Utc::now().timestamp_millis() + delay.as_millis() as i64;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = redis::cmd("ZADD")
            .arg(&self.delayed_set)
            .arg(visible_at)
            .arg(member)
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn publish_dead_letter(&self, record: DeadLetterRecord) -> Result<(), ChannelError> {
        let payload = serde_json::to_string(&record.check)?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("XADD")
            .arg(&self.dead_letter_stream)
            .arg("*")
            .arg("payload")
            .arg(payload)
            .arg(HEADER_RETRY_COUNT)
            .arg(record.retry_count)
            .arg(HEADER_FINAL_STATUS)
            .arg(record.final_status.as_str())
            .arg(HEADER_ORIGINAL_QUEUE)
            .arg(&record.origin_queue)
            .query_async(&mut conn)
            .await?;

        Ok(())
    }
}

pub struct RedisDelayedConsumer {
    conn: redis::aio::MultiplexedConnection,
    ready_stream: String,
    group: String,
    consumer_name: String,
}

impl RedisDelayedConsumer {
    pub async fn connect(
        client: &redis::Client,
        ready_stream: &str,
        group: &str,
        consumer_name: &str,
    ) -> Result<Self, ChannelError> {
        let mut conn = client.get_multiplexed_async_connection().await?;

        // BUSYGROUP on re-creation is fine.
        let _: redis::RedisResult<String> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(ready_stream)
            .arg(group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        Ok(Self {
            conn,
            ready_stream: ready_stream.to_string(),
            group: group.to_string(),
            consumer_name: consumer_name.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl DelayedRedeliveryConsumer for RedisDelayedConsumer {
    async fn next(&mut self) -> Result<Option<CheckDelivery>, ChannelError> {
        loop {
            let reply: StreamReadReply = redis::cmd("XREADGROUP")
                .arg("GROUP")
                .arg(&self.group)
                .arg(&self.consumer_name)
                .arg("COUNT")
                .arg(1)
                .arg("BLOCK")
                .arg(2000)
                .arg("STREAMS")
                .arg(&self.ready_stream)
                .arg(">")
                .query_async(&mut self.conn)
                .await?;

            for key in reply.keys {
                for entry in key.ids {
                    let Some(payload) = entry.get::<String>("payload") else {
                        tracing::warn!(entry = %entry.id, "dropping malformed delivery without payload");
                        let _: i64 = redis::cmd("XACK")
                            .arg(&self.ready_stream)
                            .arg(&self.group)
                            .arg(&entry.id)
                            .query_async(&mut self.conn)
                            .await?;
                        continue;
                    };
                    let message: StatusCheckMessage = serde_json::from_str(&payload)?;
                    let retry_count: u32 = entry.get(HEADER_RETRY_COUNT).unwrap_or(1);

                    return Ok(Some(CheckDelivery {
                        message,
                        retry_count,
                        delivery_id: entry.id.clone(),
                    }));
                }
            }
        }
    }

    async fn ack(&mut self, delivery: &CheckDelivery) -> Result<(), ChannelError> {
        let _: i64 = redis::cmd("XACK")
            .arg(&self.ready_stream)
            .arg(&self.group)
            .arg(&delivery.delivery_id)
            .query_async(&mut self.conn)
            .await?;
        Ok(())
    }
}
