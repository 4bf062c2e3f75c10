//! padpoll - frame-based gamepad polling with edge detection

pub mod config;
pub mod input;
