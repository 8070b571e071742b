pub mod ports;
pub mod event_bus;
pub mod codec;
pub mod retry;
pub mod client;
pub mod history;
pub mod inspire;
pub mod session;
