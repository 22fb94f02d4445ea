mod common;

use common::CollectingListener;
use std::sync::Arc;
use std::time::Duration;
use xpayment_adapter::domain::charge::ChargeStatus;
use xpayment_adapter::messaging::AsyncSender;
use xpayment_adapter::simulator::{EmissionSchedule, SimulatedXPaymentBroker};

fn broker(listener: Arc<CollectingListener>) -> SimulatedXPaymentBroker<CollectingListener> {
    SimulatedXPaymentBroker::new(listener, EmissionSchedule::default())
}

#[tokio::test(start_paused = true)]
async fn even_amount_emits_processing_processing_succeeded() {
    let listener = Arc::new(CollectingListener::default());
    let broker = broker(Arc::clone(&listener));

    let request = common::charge_request("10.00", "USD");
    broker.send(request.clone()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(21)).await;

    let seen = listener.taken();
    let statuses: Vec<ChargeStatus> = seen.iter().map(|m| m.status).collect();
    assert_eq!(
        statuses,
        vec![
            ChargeStatus::Processing,
            ChargeStatus::Processing,
            ChargeStatus::Succeeded
        ]
    );

    // One transaction ref, minted once per request.
    let refs: Vec<_> = seen.iter().map(|m| m.transaction_ref).collect();
    assert!(refs[0].is_some());
    assert!(refs.iter().all(|r| *r == refs[0]));
    assert!(seen.iter().all(|m| m.payment_id == request.payment_id));
}

#[tokio::test(start_paused = true)]
async fn odd_amount_terminates_canceled() {
    let listener = Arc::new(CollectingListener::default());
    let broker = broker(Arc::clone(&listener));

    broker
        .send(common::charge_request("11.00", "USD"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(21)).await;

    let seen = listener.taken();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[2].status, ChargeStatus::Canceled);
}

#[test]
fn terminal_rule_uses_integral_part() {
    assert_eq!(
        SimulatedXPaymentBroker::<CollectingListener>::terminal_status(common::amount("10.99")),
        ChargeStatus::Succeeded
    );
    assert_eq!(
        SimulatedXPaymentBroker::<CollectingListener>::terminal_status(common::amount("11.00")),
        ChargeStatus::Canceled
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_emissions() {
    let listener = Arc::new(CollectingListener::default());
    let broker = broker(Arc::clone(&listener));

    broker
        .send(common::charge_request("10.00", "USD"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    broker.shutdown().await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    // Only the immediate emission fired.
    assert_eq!(listener.taken().len(), 1);
}
