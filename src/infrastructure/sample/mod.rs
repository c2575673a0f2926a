//! AI sample adapters

mod echo;

pub use echo::{EchoSampleGenerator, ECHO_DELAY};
