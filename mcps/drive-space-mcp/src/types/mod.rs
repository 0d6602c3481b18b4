//! Data types for samples, reports and consumer messages

mod message;
mod report;
mod sample;

pub use message::*;
pub use report::*;
pub use sample::*;
