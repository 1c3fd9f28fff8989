//! The engine: parallax geometry, the shared video surface and its two hosts,
//! plus the transition coordinator that moves the surface between them.
//!
//! Nothing in this module depends on any TUI or rendering crate.  All state
//! changes happen through explicit calls from a single thread.

pub mod fullscreen_host;
pub mod geometry;
pub mod inline_host;
pub mod spring;
pub mod stage;
pub mod surface;
pub mod transition;
