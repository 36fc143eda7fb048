// riffkit library
// RIFF chunk codec, chunk type registry and PCM to mu-law transcoding

pub mod cli;
pub mod config;
pub mod logging;
pub mod riff;
pub mod sound;

pub use cli::Cli;
pub use config::Options;
pub use logging::LogLevel;
