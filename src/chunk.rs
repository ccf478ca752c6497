use std::io::{self, Read, Seek, SeekFrom};

use crate::error::FormatError;

pub const RIFF: [u8; 4] = *b"RIFF";
pub const WAVE: [u8; 4] = *b"WAVE";

/// size of the outer `RIFF <len> WAVE` preamble
pub const PREAMBLE_LEN: u64 = 12;
/// size of every chunk header: 4 byte id plus 4 byte little endian length
pub const HEADER_LEN: u64 = 8;

/// Location of one RIFF chunk. Payload bytes are never copied here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
	pub id: [u8; 4],
	/// declared payload length, without the pad byte
	pub len: u32,
	/// absolute offset of the first payload byte
	pub offset: u64,
}

impl ChunkHeader {
	pub fn is(&self, id: &[u8; 4]) -> bool {
		&self.id == id
	}

	/// offset of the next chunk header, payload padded to an even boundary
	pub fn next_offset(&self) -> u64 {
		let len = self.len as u64;
		self.offset + len + (len & 1)
	}

	pub fn id_str(&self) -> String {
		String::from_utf8_lossy(&self.id).into_owned()
	}
}

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
	#[error(transparent)]
	Format(#[from] FormatError),

	#[error(transparent)]
	Io(#[from] io::Error),
}

/// Iterates the chunks of a RIFF/WAVE byte source by declared length.
///
/// The walker seeks past every payload on its own, so callers may read as
/// much or as little of a chunk as they like between calls to `next_chunk`.
pub struct ChunkWalker<R> {
	source: R,
	next: u64,
	/// the previous chunk had an odd length and so expects a pad byte
	padded: bool,
}

/// read until `buf` is full or the source runs dry
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
	let mut filled = 0;
	while filled < buf.len() {
		match source.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		}
	}
	Ok(filled)
}

impl<R: Read + Seek> ChunkWalker<R> {
	/// checks the outer container magic and positions before the first chunk
	pub fn new(mut source: R) -> Result<Self, WalkError> {
		source.seek(SeekFrom::Start(0))?;
		let mut preamble = [0u8; PREAMBLE_LEN as usize];
		let got = read_full(&mut source, &mut preamble)?;

		let riff: [u8; 4] = [preamble[0], preamble[1], preamble[2], preamble[3]];
		if got < 4 || riff != RIFF {
			return Err(FormatError::NotRiff(riff).into());
		}
		let wave: [u8; 4] = [preamble[8], preamble[9], preamble[10], preamble[11]];
		if got < preamble.len() || wave != WAVE {
			return Err(FormatError::NotWave(wave).into());
		}

		Ok(ChunkWalker { source, next: PREAMBLE_LEN, padded: false })
	}

	/// Returns the next chunk header, or `None` once the source runs out.
	/// A header cut short by end of file also ends the walk.
	pub fn next_chunk(&mut self) -> Result<Option<ChunkHeader>, WalkError> {
		self.source.seek(SeekFrom::Start(self.next))?;
		let mut header = [0u8; HEADER_LEN as usize];
		let got = read_full(&mut self.source, &mut header)?;
		if got < header.len() {
			if got > 0 {
				tracing::warn!(offset = self.next, bytes = got, "ignoring truncated chunk header at end of file");
			} else if self.padded && self.source.seek(SeekFrom::End(0))? + 1 == self.next {
				tracing::warn!(offset = self.next - 1, "last chunk has odd length and no pad byte");
			}
			return Ok(None);
		}

		let chunk = ChunkHeader {
			id: [header[0], header[1], header[2], header[3]],
			len: u32::from_le_bytes([header[4], header[5], header[6], header[7]]),
			offset: self.next + HEADER_LEN,
		};
		tracing::trace!(id = %chunk.id_str(), len = chunk.len, offset = chunk.offset, "riff chunk");
		self.next = chunk.next_offset();
		self.padded = chunk.len % 2 == 1;
		Ok(Some(chunk))
	}

	/// Reads up to `buf.len()` bytes of `chunk`'s payload from its start.
	/// Returns how many bytes were available.
	pub fn read_payload(&mut self, chunk: &ChunkHeader, buf: &mut [u8]) -> Result<usize, WalkError> {
		let want = buf.len().min(chunk.len as usize);
		self.source.seek(SeekFrom::Start(chunk.offset))?;
		Ok(read_full(&mut self.source, &mut buf[..want])?)
	}

	pub fn into_inner(self) -> R {
		self.source
	}
}
