pub mod broker;
pub mod checkstate {
    pub mod handler;
    pub mod listener;
    pub mod registrar;
}
pub mod config;
pub mod domain {
    pub mod charge;
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod messaging;
pub mod service {
    pub mod charge_dispatch;
    pub mod response_ingest;
}
pub mod simulator;
pub mod store;
pub mod transport {
    pub mod redis_stream;
}
