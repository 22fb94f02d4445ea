use crate::broker::{CheckDelivery, DelayedRedeliveryChannel, DelayedRedeliveryConsumer};
use crate::error::ChannelError;
use crate::messaging::contracts::{DeadLetterRecord, StatusCheckMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// In-process stand-in for broker-native delayed redelivery: a tokio timer
/// per publish. Not durable across restarts; never wired on the production
/// path.
pub struct TimerDelayedChannel {
    ready_tx: mpsc::UnboundedSender<CheckDelivery>,
    dead_tx: mpsc::UnboundedSender<DeadLetterRecord>,
    tasks: Mutex<JoinSet<()>>,
}

impl TimerDelayedChannel {
    pub fn new() -> (
        Arc<Self>,
        TimerDelayedConsumer,
        mpsc::UnboundedReceiver<DeadLetterRecord>,
    ) {
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();

        let channel = Arc::new(Self {
            ready_tx,
            dead_tx,
            tasks: Mutex::new(JoinSet::new()),
        });
        (channel, TimerDelayedConsumer { rx: ready_rx }, dead_rx)
    }

    /// Cancels timers that have not fired yet.
    pub async fn shutdown(&self) {
        self.tasks.lock().await.abort_all();
    }
}

#[async_trait::async_trait]
impl DelayedRedeliveryChannel for TimerDelayedChannel {
    async fn publish(
        &self,
        message: StatusCheckMessage,
        retry_count: u32,
        delay: Duration,
    ) -> Result<(), ChannelError> {
        let tx = self.ready_tx.clone();
        self.tasks.lock().await.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(CheckDelivery {
                message,
                retry_count,
                delivery_id: String::new(),
            });
        });
        Ok(())
    }

    async fn publish_dead_letter(&self, record: DeadLetterRecord) -> Result<(), ChannelError> {
        self.dead_tx.send(record).map_err(|_| ChannelError::Closed)
    }
}

pub struct TimerDelayedConsumer {
    rx: mpsc::UnboundedReceiver<CheckDelivery>,
}

#[async_trait::async_trait]
impl DelayedRedeliveryConsumer for TimerDelayedConsumer {
    async fn next(&mut self) -> Result<Option<CheckDelivery>, ChannelError> {
        Ok(self.rx.recv().await)
    }

    async fn ack(&mut self, _delivery: &CheckDelivery) -> Result<(), ChannelError> {
        // Receiving already removed the delivery from the queue.
        Ok(())
    }
}
