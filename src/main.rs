use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use xpayment_adapter::broker::redis_delayed::{RedisDelayedChannel, RedisDelayedConsumer};
use xpayment_adapter::checkstate::handler::StatusCheckHandler;
use xpayment_adapter::checkstate::listener::{run_status_check_consumer, StatusCheckListener};
use xpayment_adapter::checkstate::registrar::StatusCheckRegistrar;
use xpayment_adapter::config::AppConfig;
use xpayment_adapter::gateways::xpayment::XPaymentGateway;
use xpayment_adapter::messaging::contracts::ChargeRequestMessage;
use xpayment_adapter::service::charge_dispatch::{ChargeRequestHandler, ChargeRequestListener};
use xpayment_adapter::transport::redis_stream::{run_stream_listener, RedisStreamSender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let consumer_name =
        std::env::var("CONSUMER_NAME").unwrap_or_else(|_| "xpayment-adapter-1".to_string());
    let interval = Duration::from_millis(cfg.interval_ms);

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;

    let gateway = Arc::new(XPaymentGateway {
        base_url: cfg.gateway_base_url.clone(),
        api_key: cfg.gateway_api_key.clone(),
        timeout_ms: cfg.gateway_timeout_ms,
        client: reqwest::Client::new(),
    });

    let channel = Arc::new(RedisDelayedChannel {
        client: redis_client.clone(),
        delayed_set: cfg.check_delayed_set.clone(),
        ready_stream: cfg.check_ready_stream.clone(),
        dead_letter_stream: cfg.dead_letter_stream.clone(),
    });
    tokio::spawn(Arc::clone(&channel).run_relay());

    let responses = Arc::new(RedisStreamSender::connect(&redis_client, &cfg.response_stream).await?);

    let dispatch = ChargeRequestListener {
        handler: ChargeRequestHandler {
            gateway: Arc::clone(&gateway),
            responses: Arc::clone(&responses),
            registrar: StatusCheckRegistrar {
                channel: Arc::clone(&channel),
                interval,
            },
        },
    };
    {
        let client = redis_client.clone();
        let stream = cfg.request_stream.clone();
        let group = cfg.request_group.clone();
        let name = consumer_name.clone();
        tokio::spawn(async move {
            if let Err(err) =
                run_stream_listener::<ChargeRequestMessage, _>(client, stream, group, name, dispatch)
                    .await
            {
                tracing::error!("request listener stopped: {}", err);
            }
        });
    }

    let check_listener = StatusCheckListener {
        handler: StatusCheckHandler {
            gateway,
            responses,
        },
        channel: Arc::clone(&channel),
        max_retries: cfg.max_retries,
        interval,
        queue_name: cfg.check_queue_name.clone(),
    };
    let check_consumer = RedisDelayedConsumer::connect(
        &redis_client,
        &cfg.check_ready_stream,
        &cfg.check_group,
        &consumer_name,
    )
    .await?;
    tokio::spawn(run_status_check_consumer(check_listener, check_consumer));

    tracing::info!("xpayment adapter running");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    Ok(())
}
