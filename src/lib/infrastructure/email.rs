//! E-mail delivery infrastructure

pub mod mailgun;
