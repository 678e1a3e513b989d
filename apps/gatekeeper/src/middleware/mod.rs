pub mod access_gate;
pub mod request_trace;
pub mod structured_logger;

pub use access_gate::AccessGate;
pub use request_trace::RequestTrace;
pub use structured_logger::StructuredLogger;
