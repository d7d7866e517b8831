//! Kula persona prompt and the reply generator.
//!
//! The reply generator is the single path from user input to model output:
//! both the text endpoint and the voice pipeline go through it.

pub mod prompt;
pub mod reply;

pub use reply::ReplyGenerator;
