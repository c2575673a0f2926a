//! SpeakPrep - speaking practice recorder
//!
//! This crate records a spoken answer from the microphone, runs it through
//! a (mocked) evaluation pipeline, and plays it back next to a sample
//! answer.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recording session state machine, audio artifacts, scores, config
//! - **Application**: The recording controller, the practice use case, and port traits
//! - **Infrastructure**: Adapter implementations (cpal, rodio, local storage, mocks)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod logging;
