//! Rendering layer. Everything that touches ratatui widgets lives here.
//!
//! This layer reads the engine's state and turns it into cells on the
//! terminal.  It never mutates the engine.

pub mod canvas;
pub mod grid;
pub mod layout;
pub mod smooth_scroll;
pub mod theme;
pub mod video;
