//! Post-read helpers working on decoded 16 bit samples.
//!
//! None of this runs inside the read engine, which always hands back the
//! file-native integer payload untouched.

use crate::buffer::AudioData;

/// full scale used when normalising to float
pub const I16_SCALE: f32 = 32767.0;

/// What to turn an [`AudioData`] into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conversion {
	/// interleaved samples, unchanged
	#[default]
	Int16,
	/// interleaved samples scaled by [`I16_SCALE`]
	Float32,
	/// one sample per frame, the exact mean of the channels, unscaled
	Mono,
	/// one sample per frame, channel mean after scaling
	MonoFloat32,
}

/// Output of [`convert`].
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
	Int16(Vec<i16>),
	Float32(Vec<f32>),
}

impl Samples {
	pub fn len(&self) -> usize {
		match self {
			Samples::Int16(s) => s.len(),
			Samples::Float32(s) => s.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

pub fn to_f32(samples: &[i16]) -> Vec<f32> {
	samples.iter().map(|s| *s as f32 / I16_SCALE).collect()
}

/// Average interleaved frames down to one channel without rounding to an
/// integer, so `[1, 2]` becomes `1.5`. Mono input is widened unchanged.
pub fn to_mono(samples: &[i16], channels: usize) -> Vec<f32> {
	let channels = channels.max(1);
	samples
		.chunks_exact(channels)
		.map(|frame| frame.iter().map(|s| *s as i32).sum::<i32>() as f32 / channels as f32)
		.collect()
}

pub fn to_mono_f32(samples: &[i16], channels: usize) -> Vec<f32> {
	let channels = channels.max(1);
	samples
		.chunks_exact(channels)
		.map(|frame| frame.iter().map(|s| *s as f32 / I16_SCALE).sum::<f32>() / channels as f32)
		.collect()
}

pub fn convert(audio: &AudioData, conversion: Conversion) -> Samples {
	let samples: Vec<i16> = audio.data.samples().collect();
	let channels = audio.info.num_channels as usize;
	match conversion {
		Conversion::Int16 => Samples::Int16(samples),
		Conversion::Float32 => Samples::Float32(to_f32(&samples)),
		Conversion::Mono => Samples::Float32(to_mono(&samples, channels)),
		Conversion::MonoFloat32 => Samples::Float32(to_mono_f32(&samples, channels)),
	}
}
