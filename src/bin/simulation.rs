//! End-to-end demo of the charge pipeline with no live gateway and no
//! broker: the simulated event stream drives response ingestion directly,
//! and a mock gateway plus the timer-backed channel exercise the dispatch
//! and status-poll path.

use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use xpayment_adapter::broker::timer::TimerDelayedChannel;
use xpayment_adapter::checkstate::handler::StatusCheckHandler;
use xpayment_adapter::checkstate::listener::{run_status_check_consumer, StatusCheckListener};
use xpayment_adapter::checkstate::registrar::StatusCheckRegistrar;
use xpayment_adapter::domain::charge::ChargeStatus;
use xpayment_adapter::domain::payment::Payment;
use xpayment_adapter::error::AdapterError;
use xpayment_adapter::gateways::mock::{MockBehavior, MockGateway};
use xpayment_adapter::messaging::contracts::{ChargeRequestMessage, ChargeResponseMessage};
use xpayment_adapter::messaging::{AsyncListener, AsyncSender, MessageHandler};
use xpayment_adapter::service::charge_dispatch::ChargeRequestHandler;
use xpayment_adapter::service::response_ingest::{ChargeResponseHandler, ChargeResponseListener};
use xpayment_adapter::simulator::{EmissionSchedule, SimulatedXPaymentBroker};
use xpayment_adapter::store::{InMemoryPaymentStore, PaymentStore};

type Ingestion = ChargeResponseListener<ChargeResponseHandler<InMemoryPaymentStore>>;

/// Feeds responses straight into ingestion, standing in for the response
/// stream.
struct LocalResponseSender {
    ingestion: Arc<Ingestion>,
}

#[async_trait::async_trait]
impl AsyncSender<ChargeResponseMessage> for LocalResponseSender {
    async fn send(&self, message: ChargeResponseMessage) -> Result<(), AdapterError> {
        self.ingestion.on_message(message).await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = Arc::new(InMemoryPaymentStore::new());
    let ingestion = Arc::new(ChargeResponseListener {
        handler: ChargeResponseHandler {
            store: Arc::clone(&store),
        },
    });

    // Part 1: the simulated gateway event stream. Even integral amount
    // settles, odd cancels.
    let even_payment = Uuid::new_v4();
    let odd_payment = Uuid::new_v4();
    store
        .put(Payment::processing(even_payment, dec!(10.00), "USD"))
        .await;
    store
        .put(Payment::processing(odd_payment, dec!(11.00), "USD"))
        .await;

    let broker = SimulatedXPaymentBroker::new(
        Arc::clone(&ingestion),
        EmissionSchedule {
            first: Duration::ZERO,
            second: Duration::from_millis(500),
            terminal: Duration::from_secs(1),
        },
    );
    broker
        .send(ChargeRequestMessage::new(even_payment, dec!(10.00), "USD"))
        .await?;
    broker
        .send(ChargeRequestMessage::new(odd_payment, dec!(11.00), "USD"))
        .await?;

    tokio::time::sleep(Duration::from_millis(1500)).await;
    broker.shutdown().await;
    report(&store, even_payment, "even amount").await?;
    report(&store, odd_payment, "odd amount").await?;

    // Part 2: dispatch against a slow mock gateway, resolved by the status
    // poll loop over the timer-backed channel.
    let polled_payment = Uuid::new_v4();
    store
        .put(Payment::processing(polled_payment, dec!(42.00), "EUR"))
        .await;

    let gateway = Arc::new(MockGateway::new(MockBehavior::ProcessingThen {
        polls_until_terminal: 2,
        terminal: ChargeStatus::Succeeded,
    }));
    let responses = Arc::new(LocalResponseSender {
        ingestion: Arc::clone(&ingestion),
    });
    let (channel, consumer, mut dead_letters) = TimerDelayedChannel::new();
    let interval = Duration::from_millis(200);

    let dispatch = ChargeRequestHandler {
        gateway: Arc::clone(&gateway),
        responses: Arc::clone(&responses),
        registrar: StatusCheckRegistrar {
            channel: Arc::clone(&channel),
            interval,
        },
    };
    let poll_loop = tokio::spawn(run_status_check_consumer(
        StatusCheckListener {
            handler: StatusCheckHandler { gateway, responses },
            channel: Arc::clone(&channel),
            max_retries: 10,
            interval,
            queue_name: "simulation.checks".to_string(),
        },
        consumer,
    ));

    dispatch
        .handle(ChargeRequestMessage::new(polled_payment, dec!(42.00), "EUR"))
        .await?;

    tokio::time::sleep(Duration::from_secs(1)).await;
    poll_loop.abort();
    channel.shutdown().await;

    if let Ok(record) = dead_letters.try_recv() {
        tracing::warn!(?record, "unexpected dead letter");
    }
    report(&store, polled_payment, "polled charge").await?;

    Ok(())
}

async fn report(
    store: &InMemoryPaymentStore,
    payment_id: Uuid,
    label: &str,
) -> anyhow::Result<()> {
    match store.find_by_id(payment_id).await? {
        Some(payment) => tracing::info!(
            %payment_id,
            status = ?payment.status,
            transaction_ref = ?payment.transaction_ref,
            "{label} final state"
        ),
        None => tracing::warn!(%payment_id, "{label} missing from store"),
    }
    Ok(())
}
