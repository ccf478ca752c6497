//! WAV fixtures written with `hound`, which doubles as the reference decoder.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tempfile::TempDir;

pub struct Fixture {
	pub dir: TempDir,
	pub path: PathBuf,
	pub channels: u16,
	pub sample_rate: u32,
	pub frames: usize,
}

/// deterministic noise covering the full i16 range
pub fn noise(len: usize, seed: u32) -> Vec<i16> {
	let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
	(0..len)
		.map(|_| {
			// xorshift32
			state ^= state << 13;
			state ^= state >> 17;
			state ^= state << 5;
			(state >> 16) as u16 as i16
		})
		.collect()
}

pub fn write_wav(path: &Path, channels: u16, sample_rate: u32, samples: &[i16]) {
	let spec = WavSpec {
		channels,
		sample_rate,
		bits_per_sample: 16,
		sample_format: SampleFormat::Int,
	};
	let mut writer = WavWriter::create(path, spec).expect("create wav");
	for s in samples {
		writer.write_sample(*s).expect("write sample");
	}
	writer.finalize().expect("finalize wav");
}

pub fn fixture(channels: u16, sample_rate: u32, frames: usize) -> Fixture {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join(format!("noise_{channels}ch_{sample_rate}_{frames}.wav"));
	write_wav(&path, channels, sample_rate, &noise(frames * channels as usize, frames as u32 ^ channels as u32));
	Fixture { dir, path, channels, sample_rate, frames }
}

pub fn reference_samples(path: &Path) -> Vec<i16> {
	WavReader::open(path)
		.expect("open reference")
		.into_samples::<i16>()
		.collect::<Result<_, _>>()
		.expect("decode reference")
}

pub fn to_bytes(samples: &[i16]) -> Vec<u8> {
	samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Insert an extra chunk right before the `data` chunk and fix the RIFF size.
pub fn splice_chunk(path: &Path, id: &[u8; 4], payload: &[u8]) {
	let mut bytes = std::fs::read(path).expect("read fixture");
	let data_at = bytes
		.windows(4)
		.skip(12)
		.position(|w| w == b"data")
		.map(|p| p + 12)
		.expect("data chunk");

	let mut chunk = id.to_vec();
	chunk.extend_from_slice(&(payload.len() as u32).to_le_bytes());
	chunk.extend_from_slice(payload);
	if payload.len() % 2 == 1 {
		chunk.push(0);
	}
	bytes.splice(data_at..data_at, chunk);

	let riff_len = (bytes.len() - 8) as u32;
	bytes[4..8].copy_from_slice(&riff_len.to_le_bytes());
	std::fs::write(path, bytes).expect("write fixture");
}
