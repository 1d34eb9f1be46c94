//! Small helpers shared by the domain types

pub mod redact;
pub mod serde;
