use crate::error::ConfigError;

/// One contiguous window of a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	pub offset: usize,
	pub len: usize,
}

impl Window {
	pub fn end(&self) -> usize {
		self.offset + self.len
	}
}

impl From<(usize, usize)> for Window {
	fn from((offset, len): (usize, usize)) -> Self {
		Window { offset, len }
	}
}

/// Splits `[0, total)` into ordered, disjoint windows of `size` bytes, the
/// last one holding the remainder. An empty range yields no windows; a zero
/// `size` is rejected like a zero `cache_size`.
pub fn windows(total: usize, size: usize) -> Result<Vec<Window>, ConfigError> {
	if size == 0 {
		return Err(ConfigError::CacheSize);
	}
	Ok(
		(0..total)
			.step_by(size)
			.map(|offset| Window { offset, len: size.min(total - offset) })
			.collect()
	)
}
