pub mod gate;
pub mod server;

pub use gate::GateConfig;
pub use server::{LogFormat, ServerConfig};
