//! HTTP route handlers

pub mod board;
pub mod frame;
pub mod replay;
pub mod status;
