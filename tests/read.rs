mod common;

use std::path::PathBuf;

use common::{fixture, reference_samples, splice_chunk, to_bytes, write_wav};
use fastwave::{read, read_with, ConfigError, Error, FormatError, ReadMode, ReadOptions};

#[test]
fn default_matches_reference_decoder() {
	for (channels, frames) in [(1, 4410), (2, 4410), (2, 1), (1, 0)] {
		let fx = fixture(channels, 44100, frames);
		let audio = read_with(&fx.path, &ReadOptions::default()).unwrap();
		let reference = reference_samples(&fx.path);

		assert_eq!(audio.data.samples().collect::<Vec<_>>(), reference);
		assert_eq!(audio.data.as_bytes(), to_bytes(&reference).as_slice());
	}
}

#[test]
fn every_mode_matches_default() {
	for (channels, frames) in [(1, 12345), (2, 12345), (2, 1), (2, 0)] {
		let fx = fixture(channels, 48000, frames);
		let baseline = read_with(&fx.path, &ReadOptions::default()).unwrap();

		for mode in ReadMode::ALL {
			let audio = read_with(&fx.path, &ReadOptions::new(mode)).unwrap();
			assert_eq!(audio.info, baseline.info, "{mode} info");
			assert_eq!(audio.data.as_bytes(), baseline.data.as_bytes(), "{mode} payload");
		}
	}
}

#[test]
fn threaded_sweep_matches_default() {
	let fx = fixture(2, 44100, 1000);
	let baseline = read_with(&fx.path, &ReadOptions::default()).unwrap();
	let data_len = baseline.data.len();
	assert_eq!(data_len, 4000);

	for cache_size in [1, 21, 420, 512, 2137, 3999, data_len, 8192, 131072] {
		for num_threads in 1..=32 {
			let audio = read(&fx.path, ReadMode::Threads, cache_size, num_threads).unwrap();
			assert_eq!(
				audio.data.as_bytes(),
				baseline.data.as_bytes(),
				"cache_size={cache_size} num_threads={num_threads}"
			);
		}
	}
}

#[test]
fn mmap_modes_own_their_mapping() {
	let fx = fixture(2, 44100, 2048);
	let reference = to_bytes(&reference_samples(&fx.path));

	for mode in [ReadMode::MmapPrivate, ReadMode::MmapShared] {
		let audio = read_with(&fx.path, &ReadOptions::new(mode)).unwrap();
		assert!(audio.data.is_mapped(), "{mode} should be mapped");
		assert_eq!(&audio.data[..], reference.as_slice());

		// the mapping outlives the file handle it was created from
		let (_, data) = audio.into_parts();
		assert_eq!(data.len(), reference.len());
		drop(data);
	}

	let audio = read_with(&fx.path, &ReadOptions::new(ReadMode::Default)).unwrap();
	assert!(!audio.data.is_mapped());
}

#[test]
fn buffer_lengths_and_interleaving() {
	let dir = tempfile::tempdir().unwrap();

	let stereo_path = dir.path().join("ramp_stereo.wav");
	let frames = 500i16;
	let interleaved: Vec<i16> = (0..frames).flat_map(|i| [i, -i]).collect();
	write_wav(&stereo_path, 2, 22050, &interleaved);

	let mono_path = dir.path().join("ramp_mono.wav");
	write_wav(&mono_path, 1, 22050, &(0..frames).collect::<Vec<_>>());

	for mode in ReadMode::ALL {
		let stereo = read_with(&stereo_path, &ReadOptions::new(mode).cache_size(6)).unwrap();
		assert_eq!(stereo.data.len(), 500 * 2 * 2);
		for (i, frame) in stereo.frames().enumerate() {
			assert_eq!(frame, vec![i as i16, -(i as i16)], "{mode} frame {i}");
		}

		let mono = read_with(&mono_path, &ReadOptions::new(mode).cache_size(6)).unwrap();
		assert_eq!(mono.data.len(), 500 * 2);
		assert_eq!(mono.data.samples().collect::<Vec<_>>(), (0..frames).collect::<Vec<_>>());
	}
}

#[test]
fn extra_chunks_are_skipped() {
	let fx = fixture(2, 44100, 777);
	let reference = to_bytes(&reference_samples(&fx.path));
	splice_chunk(&fx.path, b"LIST", b"INFOISFT\x05\x00\x00\x00test\x00");
	splice_chunk(&fx.path, b"JUNK", &[0u8; 27]);

	for mode in ReadMode::ALL {
		let audio = read_with(&fx.path, &ReadOptions::new(mode).cache_size(1000)).unwrap();
		assert_eq!(audio.info.num_samples, 777);
		assert_eq!(audio.data.as_bytes(), reference.as_slice(), "{mode}");
	}
}

#[test]
fn config_is_checked_before_io() {
	let missing = PathBuf::from("/definitely/not/here.wav");

	for mode in ReadMode::ALL {
		match read(&missing, mode, 0, 8) {
			Err(Error::Config(ConfigError::CacheSize)) => {},
			other => panic!("{mode}: expected cache_size error, got {other:?}"),
		}
		let err = read(&missing, mode, 131072, 0).unwrap_err();
		assert!(matches!(err, Error::Config(ConfigError::NumThreads)), "{mode}: {err:?}");
		assert_eq!(err.to_string(), "num_threads must be more than 0!");
	}

	let err = read(&missing, ReadMode::Threads, 0, 0).unwrap_err();
	assert_eq!(err.to_string(), "cache_size must be more than 0!");
}

#[test]
fn missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nope.wav");
	for mode in ReadMode::ALL {
		match read_with(&path, &ReadOptions::new(mode)) {
			Err(Error::NotFound(p)) => assert_eq!(p, path),
			other => panic!("{mode}: expected not found, got {other:?}"),
		}
	}
}

#[test]
fn malformed_files_are_format_errors() {
	let dir = tempfile::tempdir().unwrap();

	let garbage = dir.path().join("garbage.wav");
	std::fs::write(&garbage, b"this is not a wave file at all").unwrap();
	for mode in ReadMode::ALL {
		assert!(
			matches!(read_with(&garbage, &ReadOptions::new(mode)), Err(Error::Format(FormatError::NotRiff(_)))),
			"{mode}",
		);
	}

	// data chunk claims more bytes than the file holds
	let fx = fixture(2, 44100, 100);
	let mut bytes = std::fs::read(&fx.path).unwrap();
	bytes.truncate(bytes.len() - 10);
	let truncated = dir.path().join("truncated.wav");
	std::fs::write(&truncated, bytes).unwrap();
	for mode in ReadMode::ALL {
		assert!(
			matches!(read_with(&truncated, &ReadOptions::new(mode)), Err(Error::Format(FormatError::Truncated { .. }))),
			"{mode}",
		);
	}
}

#[test]
fn concurrent_calls_are_independent() {
	let fx = fixture(2, 44100, 5000);
	let reference = to_bytes(&reference_samples(&fx.path));

	std::thread::scope(|s| {
		let handles: Vec<_> = ReadMode::ALL
			.iter()
			.cycle()
			.take(12)
			.map(|mode| {
				let (mode, path) = (*mode, &fx.path);
				s.spawn(move || read_with(path, &ReadOptions::new(mode).cache_size(333).num_threads(3)))
			})
			.collect();

		for handle in handles {
			let audio = handle.join().unwrap().unwrap();
			assert_eq!(audio.data.as_bytes(), reference.as_slice());
		}
	});
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_permission_denied() {
	use std::os::unix::fs::PermissionsExt;

	let fx = fixture(1, 8000, 16);
	std::fs::set_permissions(&fx.path, std::fs::Permissions::from_mode(0o000)).unwrap();
	if std::fs::File::open(&fx.path).is_ok() {
		// privileged users bypass file modes
		return;
	}

	for mode in ReadMode::ALL {
		match read_with(&fx.path, &ReadOptions::new(mode)) {
			Err(Error::PermissionDenied(p)) => assert_eq!(p, fx.path),
			other => panic!("{mode}: expected permission denied, got {other:?}"),
		}
	}
	assert!(matches!(fastwave::info(&fx.path), Err(Error::PermissionDenied(_))));
}
