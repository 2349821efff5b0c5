//! Shared utilities: aligned buffers, zero detection, timing

pub mod buffer;
pub mod time;
pub mod zero;
