//! Speech recognition adapters

mod mock;

pub use mock::{MockTranscriber, MOCK_TRANSCRIPT};
