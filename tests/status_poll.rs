mod common;

use common::RecordingSender;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;
use xpayment_adapter::broker::timer::{TimerDelayedChannel, TimerDelayedConsumer};
use xpayment_adapter::broker::{CheckDelivery, DelayedRedeliveryConsumer};
use xpayment_adapter::checkstate::handler::StatusCheckHandler;
use xpayment_adapter::checkstate::listener::{run_status_check_consumer, StatusCheckListener};
use xpayment_adapter::checkstate::registrar::StatusCheckRegistrar;
use xpayment_adapter::domain::charge::{ChargeStatus, CreateCharge};
use xpayment_adapter::gateways::mock::{MockBehavior, MockGateway};
use xpayment_adapter::gateways::ChargeGateway;
use xpayment_adapter::messaging::contracts::{DeadLetterRecord, FinalStatus, StatusCheckMessage};

const QUEUE: &str = "xpayment.checks";
const MAX_RETRIES: u32 = 3;

struct Fixture {
    gateway: Arc<MockGateway>,
    responses: Arc<RecordingSender>,
    listener: StatusCheckListener<MockGateway, RecordingSender, TimerDelayedChannel>,
    checks: TimerDelayedConsumer,
    dead_letters: UnboundedReceiver<DeadLetterRecord>,
}

fn fixture(behavior: MockBehavior) -> Fixture {
    let gateway = Arc::new(MockGateway::new(behavior));
    let responses = Arc::new(RecordingSender::default());
    let (channel, checks, dead_letters) = TimerDelayedChannel::new();

    let listener = StatusCheckListener {
        handler: StatusCheckHandler {
            gateway: Arc::clone(&gateway),
            responses: Arc::clone(&responses),
        },
        channel,
        max_retries: MAX_RETRIES,
        interval: Duration::ZERO,
        queue_name: QUEUE.to_string(),
    };
    Fixture {
        gateway,
        responses,
        listener,
        checks,
        dead_letters,
    }
}

/// Creates a charge on the mock gateway and the matching check message.
async fn open_charge(gateway: &MockGateway) -> StatusCheckMessage {
    let payment_id = Uuid::new_v4();
    let snapshot = gateway
        .create_charge(CreateCharge {
            amount: common::amount("17.00"),
            currency: "USD".to_string(),
            order_id: payment_id,
        })
        .await
        .expect("mock create");

    StatusCheckMessage {
        charge_ref: snapshot.charge_id,
        payment_id,
        amount: snapshot.amount,
        currency: snapshot.currency,
    }
}

fn delivery(message: StatusCheckMessage, retry_count: u32) -> CheckDelivery {
    CheckDelivery {
        message,
        retry_count,
        delivery_id: String::new(),
    }
}

async fn no_check_scheduled(checks: &mut TimerDelayedConsumer) {
    let pending = tokio::time::timeout(Duration::from_millis(50), checks.next()).await;
    assert!(pending.is_err(), "no further status check expected");
}

#[tokio::test(start_paused = true)]
async fn still_processing_reschedules_with_incremented_retry() {
    let mut fx = fixture(MockBehavior::ProcessingThen {
        polls_until_terminal: 5,
        terminal: ChargeStatus::Succeeded,
    });
    let message = open_charge(&fx.gateway).await;

    fx.listener
        .on_delivery(&delivery(message.clone(), 1))
        .await
        .unwrap();

    let next = fx.checks.next().await.unwrap().expect("rescheduled check");
    assert_eq!(next.retry_count, 2);
    assert_eq!(next.message, message);
    assert!(fx.responses.taken().is_empty());
    assert!(fx.dead_letters.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn resolution_publishes_response_and_stops() {
    let mut fx = fixture(MockBehavior::ProcessingThen {
        polls_until_terminal: 1,
        terminal: ChargeStatus::Succeeded,
    });
    let message = open_charge(&fx.gateway).await;

    fx.listener
        .on_delivery(&delivery(message.clone(), 2))
        .await
        .unwrap();

    let sent = fx.responses.taken();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].payment_id, message.payment_id);
    assert_eq!(sent[0].status, ChargeStatus::Succeeded);
    assert_eq!(sent[0].transaction_ref, Some(message.charge_ref));

    no_check_scheduled(&mut fx.checks).await;
    assert!(fx.dead_letters.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn exhausted_budget_dead_letters_with_timeout() {
    let mut fx = fixture(MockBehavior::ProcessingThen {
        polls_until_terminal: u32::MAX,
        terminal: ChargeStatus::Succeeded,
    });
    let message = open_charge(&fx.gateway).await;

    fx.listener
        .on_delivery(&delivery(message.clone(), MAX_RETRIES))
        .await
        .unwrap();

    let record = fx.dead_letters.try_recv().expect("dead letter");
    assert_eq!(record.final_status, FinalStatus::Timeout);
    assert_eq!(record.retry_count, MAX_RETRIES);
    assert_eq!(record.origin_queue, QUEUE);
    assert_eq!(record.check, message);

    assert!(fx.responses.taken().is_empty());
    no_check_scheduled(&mut fx.checks).await;
}

#[tokio::test(start_paused = true)]
async fn transport_error_dead_letters_immediately() {
    let mut fx = fixture(MockBehavior::Unreachable);
    let message = StatusCheckMessage {
        charge_ref: Uuid::new_v4(),
        payment_id: Uuid::new_v4(),
        amount: common::amount("17.00"),
        currency: "USD".to_string(),
    };

    // Plenty of budget left; the error escalates anyway.
    fx.listener
        .on_delivery(&delivery(message.clone(), 1))
        .await
        .unwrap();

    let record = fx.dead_letters.try_recv().expect("dead letter");
    assert_eq!(record.final_status, FinalStatus::Error);
    assert_eq!(record.retry_count, 1);
    assert_eq!(record.check, message);

    assert!(fx.responses.taken().is_empty());
    no_check_scheduled(&mut fx.checks).await;
}

#[tokio::test(start_paused = true)]
async fn consumer_loop_polls_until_resolution() {
    let gateway = Arc::new(MockGateway::new(MockBehavior::ProcessingThen {
        polls_until_terminal: 3,
        terminal: ChargeStatus::Succeeded,
    }));
    let responses = Arc::new(RecordingSender::default());
    let (channel, checks, mut dead_letters) = TimerDelayedChannel::new();
    let interval = Duration::from_millis(100);

    let message = open_charge(&gateway).await;
    let registrar = StatusCheckRegistrar {
        channel: Arc::clone(&channel),
        interval,
    };
    registrar
        .register(
            message.charge_ref,
            message.payment_id,
            message.amount,
            &message.currency,
        )
        .await
        .unwrap();

    let poll_loop = tokio::spawn(run_status_check_consumer(
        StatusCheckListener {
            handler: StatusCheckHandler {
                gateway: Arc::clone(&gateway),
                responses: Arc::clone(&responses),
            },
            channel: Arc::clone(&channel),
            max_retries: 10,
            interval,
            queue_name: QUEUE.to_string(),
        },
        checks,
    ));

    let mut resolved = false;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if !responses.taken().is_empty() {
            resolved = true;
            break;
        }
    }
    poll_loop.abort();
    channel.shutdown().await;

    assert!(resolved, "poll loop should resolve the charge");
    assert_eq!(gateway.retrieve_calls(), 3);
    let sent = responses.taken();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].status, ChargeStatus::Succeeded);
    assert!(dead_letters.try_recv().is_err());
}
