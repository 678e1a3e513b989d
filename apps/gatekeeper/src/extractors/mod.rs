pub mod identity;

pub use identity::{CurrentIdentity, OptionalIdentity};
