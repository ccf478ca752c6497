use std::{fs::File, io::{self, BufReader, ErrorKind, Read, Seek, SeekFrom}, path::Path};

use memmap2::MmapOptions;
use rayon::prelude::*;

use crate::{
	buffer::{AudioData, SampleBuffer},
	chunker,
	error::{ConfigError, Error, Result, Stage},
	format::{self, AudioInfo, DataRange, WaveHeader},
};

pub const DEFAULT_CACHE_SIZE: usize = 131072;
pub const DEFAULT_NUM_THREADS: usize = 8;

/// header reads are tiny, keep the buffer close to a page
const HEADER_BUF: usize = 4096;

/// How the data chunk is brought into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReadMode {
	/// one sequential read into a fresh buffer
	#[default]
	#[display(fmt = "default")]
	Default,

	/// positioned reads of cache sized windows on a worker pool
	#[display(fmt = "threads")]
	Threads,

	/// copy-on-write mapping of the data chunk
	#[display(fmt = "mmap-private")]
	MmapPrivate,

	/// shared mapping of the data chunk, read-only all the same
	#[display(fmt = "mmap-shared")]
	MmapShared,
}

impl ReadMode {
	pub const ALL: [ReadMode; 4] = [ReadMode::Default, ReadMode::Threads, ReadMode::MmapPrivate, ReadMode::MmapShared];
}

impl std::str::FromStr for ReadMode {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_ascii_lowercase().replace('_', "-").as_str() {
			"default" => Ok(ReadMode::Default),
			"threads" => Ok(ReadMode::Threads),
			"mmap-private" => Ok(ReadMode::MmapPrivate),
			"mmap-shared" => Ok(ReadMode::MmapShared),
			_ => Err(format!("unknown read mode '{s}'")),
		}
	}
}

/// Parameters of one [`read_with`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
	pub mode: ReadMode,
	/// window size in bytes for [`ReadMode::Threads`]
	pub cache_size: usize,
	/// worker count for [`ReadMode::Threads`]
	pub num_threads: usize,
}

impl Default for ReadOptions {
	fn default() -> Self {
		ReadOptions {
			mode: ReadMode::Default,
			cache_size: DEFAULT_CACHE_SIZE,
			num_threads: DEFAULT_NUM_THREADS,
		}
	}
}

impl ReadOptions {
	pub fn new(mode: ReadMode) -> Self {
		ReadOptions { mode, ..Default::default() }
	}

	pub fn cache_size(mut self, cache_size: usize) -> Self {
		self.cache_size = cache_size;
		self
	}

	pub fn num_threads(mut self, num_threads: usize) -> Self {
		self.num_threads = num_threads;
		self
	}

	/// Both knobs are checked whatever the mode, and before any I/O.
	pub fn validate(&self) -> std::result::Result<(), ConfigError> {
		if self.cache_size < 1 {
			return Err(ConfigError::CacheSize);
		}
		if self.num_threads < 1 {
			return Err(ConfigError::NumThreads);
		}
		Ok(())
	}
}

/// Header-only query: nothing past the data chunk header is read.
pub fn info(path: impl AsRef<Path>) -> Result<AudioInfo> {
	let (_, header) = open_header(path.as_ref())?;
	Ok(header.info)
}

/// Decode `path` fully into memory using `mode`.
pub fn read(path: impl AsRef<Path>, mode: ReadMode, cache_size: usize, num_threads: usize) -> Result<AudioData> {
	read_with(path, &ReadOptions { mode, cache_size, num_threads })
}

pub fn read_with(path: impl AsRef<Path>, opts: &ReadOptions) -> Result<AudioData> {
	opts.validate()?;

	let path = path.as_ref();
	let (file, header) = open_header(path)?;
	tracing::debug!(
		path = %path.display(),
		mode = %opts.mode,
		offset = header.data.offset,
		len = header.data.len,
		"reading data chunk"
	);

	let data = match opts.mode {
		ReadMode::Default => read_sequential(file, header.data),
		ReadMode::Threads => read_threaded(&file, header.data, opts.cache_size, opts.num_threads),
		ReadMode::MmapPrivate => map_data(&file, header.data, Mapping::Private),
		ReadMode::MmapShared => map_data(&file, header.data, Mapping::Shared),
	}
	.map_err(Error::io(Stage::Read(opts.mode)))?;

	Ok(AudioData::new(header.info, data))
}

fn open_header(path: &Path) -> Result<(File, WaveHeader)> {
	let file = File::open(path).map_err(|e| Error::open(path, e))?;
	let file_len = file.metadata().map_err(Error::io(Stage::Header))?.len();
	let header = format::parse_header(BufReader::with_capacity(HEADER_BUF, &file), Some(file_len))?;
	Ok((file, header))
}

fn read_sequential(mut file: File, range: DataRange) -> io::Result<SampleBuffer> {
	let mut buffer = vec![0u8; range.len as usize];
	file.seek(SeekFrom::Start(range.offset))?;
	file.read_exact(&mut buffer)?;
	Ok(SampleBuffer::owned(buffer))
}

/// Every window owns a disjoint `chunks_mut` slice of one buffer, so workers
/// write without locking. Layout depends only on window offsets.
fn read_threaded(file: &File, range: DataRange, cache_size: usize, num_threads: usize) -> io::Result<SampleBuffer> {
	let len = range.len as usize;
	let windows = chunker::windows(len, cache_size).map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;
	let pool = rayon::ThreadPoolBuilder::new()
		.num_threads(num_threads.min(windows.len()).max(1))
		.thread_name(|i| format!("fastwave-read-{i}"))
		.build()
		.map_err(|e| io::Error::new(ErrorKind::Other, e))?;
	tracing::debug!(windows = windows.len(), workers = pool.current_num_threads(), cache_size, "threaded read");

	let mut buffer = vec![0u8; len];
	// try_for_each stops handing out windows after the first failure
	pool.install(|| {
		windows
			.par_iter()
			.zip(buffer.par_chunks_mut(cache_size))
			.try_for_each(|(window, slice)| {
				debug_assert_eq!(window.len, slice.len());
				read_exact_at(file, slice, range.offset + window.offset as u64)
			})
	})?;

	Ok(SampleBuffer::owned(buffer))
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
	use std::os::unix::fs::FileExt;
	file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
	use std::os::windows::fs::FileExt;
	while !buf.is_empty() {
		match file.seek_read(buf, offset) {
			Ok(0) => return Err(ErrorKind::UnexpectedEof.into()),
			Ok(n) => {
				let rest = buf;
				buf = &mut rest[n..];
				offset += n as u64;
			},
			Err(e) if e.kind() == ErrorKind::Interrupted => {},
			Err(e) => return Err(e),
		}
	}
	Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Mapping {
	Private,
	Shared,
}

fn map_data(file: &File, range: DataRange, mapping: Mapping) -> io::Result<SampleBuffer> {
	// zero length mappings are rejected by the OS
	if range.len == 0 {
		return Ok(SampleBuffer::owned(Vec::new()));
	}

	let mut opts = MmapOptions::new();
	opts.offset(range.offset).len(range.len as usize).populate();

	// SAFETY: the mapping is read-only and owned by the returned buffer.
	// Truncating or rewriting the file while it is mapped is undefined
	// behaviour, same as for any other file mapping.
	let map = unsafe {
		match mapping {
			Mapping::Private => opts.map_copy_read_only(file)?,
			Mapping::Shared => opts.map(file)?,
		}
	};
	tracing::debug!(?mapping, len = map.len(), "mapped data chunk");

	Ok(SampleBuffer::mapped(map))
}
