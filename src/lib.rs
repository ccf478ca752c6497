//! Fast linear-PCM WAV decoding.
//!
//! The header is always parsed first; the data chunk is then brought into
//! memory by one of four [`ReadMode`]s, all yielding identical bytes:
//!
//! ```no_run
//! use fastwave::{read, ReadMode};
//!
//! let audio = read("take.wav", ReadMode::Threads, 1 << 17, 8)?;
//! println!("{} Hz, {} ch, {:.2}s", audio.info.sample_rate, audio.info.num_channels, audio.info.duration);
//! let left_first: Vec<i16> = audio.data.samples().step_by(audio.info.num_channels as usize).collect();
//! # Ok::<(), fastwave::Error>(())
//! ```

pub mod buffer;
pub mod chunk;
pub mod chunker;
pub mod convert;
pub mod engine;
pub mod error;
pub mod format;

pub use buffer::{AudioData, SampleBuffer};
pub use engine::{info, read, read_with, ReadMode, ReadOptions, DEFAULT_CACHE_SIZE, DEFAULT_NUM_THREADS};
pub use error::{ConfigError, Error, FormatError, Result, Stage};
pub use format::AudioInfo;
