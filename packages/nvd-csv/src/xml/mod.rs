//! Streaming XML event source.
//!
//! Turns a byte stream into case-folded start, end and text callbacks on an
//! [`EventHandler`].

mod dispatcher;
mod handler;
mod lines;

pub use dispatcher::EventDispatcher;
pub use handler::{Attributes, EventHandler};
pub use lines::LineCounter;
