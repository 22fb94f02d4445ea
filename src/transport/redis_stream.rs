use crate::error::{AdapterError, ChannelError};
use crate::messaging::{AsyncListener, AsyncSender, Message};
use redis::streams::StreamReadReply;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Publishes messages onto a Redis stream. The message id doubles as the
/// correlation key and is written as its own field so consumers can key
/// ordering on it.
pub struct RedisStreamSender {
    conn: redis::aio::MultiplexedConnection,
    stream_key: String,
}

impl RedisStreamSender {
    pub async fn connect(client: &redis::Client, stream_key: &str) -> Result<Self, ChannelError> {
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            stream_key: stream_key.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl<M> AsyncSender<M> for RedisStreamSender
where
    M: Message + Serialize + 'static,
{
    async fn send(&self, message: M) -> Result<(), AdapterError> {
        let payload = serde_json::to_string(&message).map_err(ChannelError::from)?;

        let mut conn = self.conn.clone();
        let add_res: redis::RedisResult<String> = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("*")
            .arg("key")
            .arg(message.message_id().to_string())
            .arg("payload")
            .arg(payload)
            .query_async(&mut conn)
            .await;
        add_res.map_err(ChannelError::from)?;

        Ok(())
    }
}

/// Consumer-group loop for one stream: decode, hand to the listener, ack on
/// success. A handler failure leaves the entry pending for redelivery;
/// undecodable entries are acked away as poison.
pub async fn run_stream_listener<M, L>(
    client: redis::Client,
    stream_key: String,
    group: String,
    consumer_name: String,
    listener: L,
) -> anyhow::Result<()>
where
    M: Message + DeserializeOwned,
    L: AsyncListener<M>,
{
    let mut conn = client.get_multiplexed_async_connection().await?;

    let _: redis::RedisResult<String> = redis::cmd("XGROUP")
        .arg("CREATE")
        .arg(&stream_key)
        .arg(&group)
        .arg("0")
        .arg("MKSTREAM")
        .query_async(&mut conn)
        .await;

    loop {
        let reply: StreamReadReply = match redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&group)
            .arg(&consumer_name)
            .arg("COUNT")
            .arg(100)
            .arg("BLOCK")
            .arg(2000)
            .arg("STREAMS")
            .arg(&stream_key)
            .arg(">")
            .query_async(&mut conn)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!("stream read error on {}: {}", stream_key, err);
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        for key in reply.keys {
            for entry in key.ids {
                let mut ack = true;

                match entry.get::<String>("payload") {
                    Some(payload) => match serde_json::from_str::<M>(&payload) {
                        Ok(message) => {
                            if let Err(err) = listener.on_message(message).await {
                                tracing::error!(
                                    entry = %entry.id,
                                    "message failed, left unacked: {}",
                                    err
                                );
                                ack = false;
                            }
                        }
                        Err(err) => {
                            tracing::warn!(entry = %entry.id, "dropping undecodable entry: {}", err)
                        }
                    },
                    None => {
                        tracing::warn!(entry = %entry.id, "dropping entry without payload")
                    }
                }

                if ack {
                    let ack_res: redis::RedisResult<i64> = redis::cmd("XACK")
                        .arg(&stream_key)
                        .arg(&group)
                        .arg(&entry.id)
                        .query_async(&mut conn)
                        .await;
                    if let Err(err) = ack_res {
                        tracing::error!(entry = %entry.id, "ack failed: {}", err);
                    }
                }
            }
        }
    }
}
