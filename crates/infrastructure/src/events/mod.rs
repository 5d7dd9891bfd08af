pub mod bus;
pub mod log_bridge;
pub mod relay;

pub use bus::{EventBus, ListenerHandle};
pub use log_bridge::EventBusLayer;
pub use relay::ClusterRelay;
