use std::io::{Read, Seek};

use crate::{chunk::{ChunkHeader, ChunkWalker, WalkError}, error::FormatError};

pub const FMT: [u8; 4] = *b"fmt ";
pub const DATA: [u8; 4] = *b"data";

pub const FORMAT_PCM: u16 = 0x0001;
pub const SUPPORTED_BIT_DEPTH: u16 = 16;

/// minimum `fmt ` payload: tag, channels, rate, byte rate, block align, bits
const FMT_MIN_LEN: usize = 16;

/// Immutable description of a PCM stream, built once from the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
	pub sample_rate: u32,
	pub num_channels: u16,
	pub bit_depth: u16,
	/// frames per channel
	pub num_samples: u64,
	/// seconds, `num_samples / sample_rate`
	pub duration: f64,
}

impl AudioInfo {
	pub fn bytes_per_sample(&self) -> usize {
		(self.bit_depth / 8) as usize
	}

	/// bytes per interleaved frame
	pub fn block_align(&self) -> usize {
		self.bytes_per_sample() * self.num_channels as usize
	}

	/// length of the decoded payload in bytes
	pub fn data_len(&self) -> u64 {
		self.num_samples * self.block_align() as u64
	}
}

/// Byte range of the data chunk payload inside the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRange {
	pub offset: u64,
	pub len: u64,
}

/// Everything the read strategies need from the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveHeader {
	pub info: AudioInfo,
	pub data: DataRange,
}

#[derive(Debug, Clone, Copy)]
struct FmtChunk {
	channels: u16,
	sample_rate: u32,
	block_align: u16,
	bit_depth: u16,
}

impl FmtChunk {
	fn parse(payload: &[u8]) -> Result<Self, FormatError> {
		if payload.len() < FMT_MIN_LEN {
			return Err(FormatError::MalformedFmt("payload shorter than 16 bytes"));
		}
		let u16_at = |i: usize| u16::from_le_bytes([payload[i], payload[i + 1]]);
		let u32_at = |i: usize| u32::from_le_bytes([payload[i], payload[i + 1], payload[i + 2], payload[i + 3]]);

		let tag = u16_at(0);
		if tag != FORMAT_PCM {
			return Err(FormatError::UnsupportedFormat(tag));
		}
		let fmt = FmtChunk {
			channels: u16_at(2),
			sample_rate: u32_at(4),
			// byte rate at 8 is derived, not trusted
			block_align: u16_at(12),
			bit_depth: u16_at(14),
		};

		if fmt.channels == 0 {
			return Err(FormatError::MalformedFmt("zero channels"));
		}
		if fmt.sample_rate == 0 {
			return Err(FormatError::MalformedFmt("zero sample rate"));
		}
		if fmt.bit_depth != SUPPORTED_BIT_DEPTH {
			return Err(FormatError::UnsupportedBitDepth(fmt.bit_depth));
		}
		if fmt.block_align as u32 != fmt.channels as u32 * (fmt.bit_depth / 8) as u32 {
			return Err(FormatError::MalformedFmt("block alignment does not match channels and bit depth"));
		}
		Ok(fmt)
	}
}

/// Locates the format and data chunks and derives [`AudioInfo`].
///
/// Every chunk header up to the end of the source is visited so a repeated
/// `fmt ` or `data` chunk is caught wherever it sits. Payloads are skipped
/// by seeking, only the `fmt ` payload is read. Unknown chunks are skipped
/// by their declared length.
/// `file_len`, when known, bounds the data chunk.
pub fn parse_header<R: Read + Seek>(source: R, file_len: Option<u64>) -> Result<WaveHeader, WalkError> {
	let mut walker = ChunkWalker::new(source)?;
	let mut fmt: Option<FmtChunk> = None;
	let mut data: Option<ChunkHeader> = None;

	while let Some(chunk) = walker.next_chunk()? {
		if chunk.is(&FMT) {
			if fmt.is_some() {
				return Err(FormatError::DuplicateFmt.into());
			}
			let mut payload = [0u8; FMT_MIN_LEN];
			let got = walker.read_payload(&chunk, &mut payload)?;
			fmt = Some(FmtChunk::parse(&payload[..got])?);
		} else if chunk.is(&DATA) {
			if data.is_some() {
				return Err(FormatError::DuplicateData.into());
			}
			data = Some(chunk);
		} else {
			tracing::debug!(id = %chunk.id_str(), len = chunk.len, "skipping chunk");
		}
	}

	let fmt = fmt.ok_or(FormatError::MissingFmt)?;
	let data = data.ok_or(FormatError::MissingData)?;

	let range = DataRange { offset: data.offset, len: data.len as u64 };
	if let Some(file_len) = file_len {
		if range.offset + range.len > file_len {
			return Err(FormatError::Truncated { offset: range.offset, len: range.len, file_len }.into());
		}
	}
	if range.len % fmt.block_align as u64 != 0 {
		return Err(FormatError::PartialFrame { len: range.len, block_align: fmt.block_align }.into());
	}

	let num_samples = range.len / fmt.block_align as u64;
	let info = AudioInfo {
		sample_rate: fmt.sample_rate,
		num_channels: fmt.channels,
		bit_depth: fmt.bit_depth,
		num_samples,
		duration: num_samples as f64 / fmt.sample_rate as f64,
	};
	debug_assert_eq!(info.data_len(), range.len);

	Ok(WaveHeader { info, data: range })
}
