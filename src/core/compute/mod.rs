//! Low-level sequence representation shared by every pipeline stage.

pub mod encoding;
