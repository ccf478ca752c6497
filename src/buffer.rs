use std::ops::Deref;

use memmap2::Mmap;

use crate::format::AudioInfo;

enum Storage {
	Owned(Box<[u8]>),
	/// read-only view over the data chunk; unmapped when dropped
	Mapped(Mmap),
}

/// Owned, immutable PCM payload in file-native interleaved layout.
///
/// Mapped buffers own their mapping outright. The type is deliberately not
/// `Clone`, so a mapping can never outlive or be shared beyond its buffer.
pub struct SampleBuffer {
	storage: Storage,
}

impl SampleBuffer {
	pub(crate) fn owned(bytes: Vec<u8>) -> Self {
		SampleBuffer { storage: Storage::Owned(bytes.into_boxed_slice()) }
	}

	pub(crate) fn mapped(map: Mmap) -> Self {
		SampleBuffer { storage: Storage::Mapped(map) }
	}

	pub fn as_bytes(&self) -> &[u8] {
		match &self.storage {
			Storage::Owned(b) => &b[..],
			Storage::Mapped(m) => &m[..],
		}
	}

	pub fn len(&self) -> usize {
		self.as_bytes().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// true if the bytes live in a file mapping rather than on the heap
	pub fn is_mapped(&self) -> bool {
		matches!(self.storage, Storage::Mapped(_))
	}

	/// decode little endian 16 bit samples, interleaved
	pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
		self.as_bytes()
			.chunks_exact(2)
			.map(|c| i16::from_le_bytes([c[0], c[1]]))
	}

	/// copy out the bytes into heap memory, dropping any mapping
	pub fn into_vec(self) -> Vec<u8> {
		match self.storage {
			Storage::Owned(b) => b.into_vec(),
			Storage::Mapped(m) => m.to_vec(),
		}
	}
}

impl Deref for SampleBuffer {
	type Target = [u8];

	fn deref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl AsRef<[u8]> for SampleBuffer {
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl std::fmt::Debug for SampleBuffer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SampleBuffer")
			.field("len", &self.len())
			.field("mapped", &self.is_mapped())
			.finish()
	}
}

/// A fully decoded file: header info plus its sample payload.
#[derive(Debug)]
pub struct AudioData {
	pub info: AudioInfo,
	pub data: SampleBuffer,
}

impl AudioData {
	pub(crate) fn new(info: AudioInfo, data: SampleBuffer) -> Self {
		debug_assert_eq!(info.data_len(), data.len() as u64);
		AudioData { info, data }
	}

	/// interleaved frames, one slice of `num_channels` samples each
	pub fn frames(&self) -> impl Iterator<Item = Vec<i16>> + '_ {
		let channels = self.info.num_channels as usize;
		self.data
			.as_bytes()
			.chunks_exact(self.info.block_align())
			.map(move |frame| {
				let mut out = Vec::with_capacity(channels);
				out.extend(frame.chunks_exact(2).map(|c| i16::from_le_bytes([c[0], c[1]])));
				out
			})
	}

	pub fn into_parts(self) -> (AudioInfo, SampleBuffer) {
		(self.info, self.data)
	}
}
