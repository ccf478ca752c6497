use std::{io, path::{Path, PathBuf}};

use crate::{chunk::WalkError, engine::ReadMode};

/// Rejected caller parameters. Raised before the filesystem is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	#[error("cache_size must be more than 0!")]
	CacheSize,

	#[error("num_threads must be more than 0!")]
	NumThreads,
}

/// Malformed, missing or unsupported RIFF/WAVE structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
	#[error("invalid container magic {0:?}, expected 'RIFF'")]
	NotRiff([u8; 4]),

	#[error("invalid form type {0:?}, expected 'WAVE'")]
	NotWave([u8; 4]),

	#[error("missing 'fmt ' chunk")]
	MissingFmt,

	#[error("more than one 'fmt ' chunk")]
	DuplicateFmt,

	#[error("malformed 'fmt ' chunk: {0}")]
	MalformedFmt(&'static str),

	#[error("unsupported format tag 0x{0:04x}, only integer PCM (0x0001) is supported")]
	UnsupportedFormat(u16),

	#[error("unsupported bit depth {0}, only 16 bit PCM is supported")]
	UnsupportedBitDepth(u16),

	#[error("missing 'data' chunk")]
	MissingData,

	#[error("more than one 'data' chunk")]
	DuplicateData,

	#[error("data chunk length {len} is not a multiple of the {block_align} byte frame size")]
	PartialFrame { len: u64, block_align: u16 },

	#[error("data chunk declares {len} bytes at offset {offset} but file is only {file_len} bytes")]
	Truncated { offset: u64, len: u64, file_len: u64 },
}

/// Where an I/O failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Stage {
	#[display(fmt = "header")]
	Header,

	#[display(fmt = "{} read", _0)]
	Read(ReadMode),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("file not found: {}", .0.display())]
	NotFound(PathBuf),

	#[error("permission denied: {}", .0.display())]
	PermissionDenied(PathBuf),

	#[error(transparent)]
	Format(#[from] FormatError),

	#[error("{stage} failed: {source}")]
	Io {
		stage: Stage,
		#[source]
		source: io::Error,
	},
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// map a failed `File::open` into the taxonomy, keeping the path around
	pub(crate) fn open(path: &Path, err: io::Error) -> Self {
		match err.kind() {
			io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
			io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
			_ => Error::Io { stage: Stage::Header, source: err },
		}
	}

	pub(crate) fn io(stage: Stage) -> impl FnOnce(io::Error) -> Self {
		move |source| Error::Io { stage, source }
	}
}

impl From<WalkError> for Error {
	fn from(err: WalkError) -> Self {
		match err {
			WalkError::Format(e) => Error::Format(e),
			WalkError::Io(source) => Error::Io { stage: Stage::Header, source },
		}
	}
}
