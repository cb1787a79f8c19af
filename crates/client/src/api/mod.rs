//! Typed endpoint methods, grouped per server router

pub mod appointments;
pub mod conversations;
