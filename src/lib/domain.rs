//! Domain model for outbound e-mail

pub mod messages;
