mod cfg;

use std::{path::Path, process::ExitCode, time::Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fastwave::{convert, ReadOptions};

use crate::cfg::{PostArgs, WaveArgs, WaveCommand};

fn main() -> ExitCode {
	let args = WaveArgs::parse();

	let level = match args.verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
		.with_writer(std::io::stderr)
		.init();

	let mut failed = false;
	match &args.command {
		WaveCommand::Info { paths } => {
			for path in paths {
				if let Err(e) = print_info(path) {
					eprintln!("[!] {}: {}", path.display(), e);
					failed = true;
				}
			}
		},
		WaveCommand::Read { paths, opts, post } => {
			let opts = ReadOptions::from(opts);
			for path in paths {
				if let Err(e) = decode(path, &opts, post) {
					eprintln!("[!] {}: {}", path.display(), e);
					failed = true;
				}
			}
		},
	}

	if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn print_info(path: &Path) -> Result<(), fastwave::Error> {
	let info = fastwave::info(path)?;
	println!(
		"{}  --  {} Hz  --  {} ch  --  {} bit  --  {} samples  --  {:.3}s",
		path.display(), info.sample_rate, info.num_channels, info.bit_depth, info.num_samples, info.duration,
	);
	Ok(())
}

fn decode(path: &Path, opts: &ReadOptions, post: &PostArgs) -> Result<(), fastwave::Error> {
	let start = Instant::now();
	let audio = fastwave::read_with(path, opts)?;
	let elapsed = start.elapsed();

	let bytes = audio.data.len();
	let mib_per_sec = bytes as f64 / (1024.0 * 1024.0) / elapsed.as_secs_f64().max(f64::EPSILON);
	println!(
		"{}  --  {} mode  --  {} bytes{}  --  {:.3} ms  --  {:.1} MiB/s",
		path.display(), opts.mode, bytes,
		if audio.data.is_mapped() { " (mapped)" } else { "" },
		elapsed.as_secs_f64() * 1000.0, mib_per_sec,
	);

	if let Some(conversion) = post.conversion() {
		let start = Instant::now();
		let samples = convert::convert(&audio, conversion);
		println!("  {:?}  --  {} samples  --  {:.3} ms", conversion, samples.len(), start.elapsed().as_secs_f64() * 1000.0);
	}

	Ok(())
}
