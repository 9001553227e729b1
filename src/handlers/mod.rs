//! HTTP handlers

pub mod health;
pub mod result;
pub mod status;
pub mod upload;
