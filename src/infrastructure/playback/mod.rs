//! Playback adapters

mod rodio;
mod temp_file;

pub use self::rodio::RodioPlayer;
pub use temp_file::TempFilePlaybackHost;
