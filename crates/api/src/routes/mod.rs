//! Route handlers

pub mod channels;
pub mod notifications;
pub mod sensors;
