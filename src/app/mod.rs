//! Application glue: state, terminal events and input handling.

pub mod event;
pub mod handler;
pub mod state;
