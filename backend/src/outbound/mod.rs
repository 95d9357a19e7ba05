//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations; they contain no business logic:
//!
//! - **memory**: in-process store backing every repository port
//! - **whatsapp**: Twilio-backed order confirmation sender

pub mod memory;
pub mod whatsapp;
