use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fastwave::{ReadMode, ReadOptions, DEFAULT_CACHE_SIZE, DEFAULT_NUM_THREADS};

const HELP_TEMPLATE : &str = "{before-help}\
{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}
";

/// fast linear PCM wav decoding
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, help_template = HELP_TEMPLATE)]
pub struct WaveArgs {
	#[clap(subcommand)]
	pub command: WaveCommand,

	/// increase log verbosity, repeat for more (RUST_LOG takes precedence)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	pub verbose: u8,
}

#[derive(Debug, Clone, Subcommand)]
pub enum WaveCommand {
	/// print header information without touching the payload
	Info {
		/// wav files to inspect
		#[arg(required = true)]
		paths: Vec<PathBuf>,
	},

	/// decode files fully into memory and report throughput
	Read {
		/// wav files to decode
		#[arg(required = true)]
		paths: Vec<PathBuf>,

		#[command(flatten)]
		opts: ReadArgs,

		#[command(flatten)]
		post: PostArgs,
	},
}

#[derive(Debug, Clone, Parser)]
pub struct ReadArgs {
	/// file access strategy
	#[arg(short, long, value_enum, default_value_t = ReadMode::Default)]
	pub mode: ReadMode,

	/// window size in bytes for threaded reads
	#[arg(short, long, value_name = "BYTES", default_value_t = DEFAULT_CACHE_SIZE)]
	pub cache_size: usize,

	/// worker threads for threaded reads
	#[arg(short = 't', long = "threads", value_name = "N", default_value_t = DEFAULT_NUM_THREADS)]
	pub num_threads: usize,
}

impl From<&ReadArgs> for ReadOptions {
	fn from(args: &ReadArgs) -> Self {
		ReadOptions::new(args.mode)
			.cache_size(args.cache_size)
			.num_threads(args.num_threads)
	}
}

#[derive(Debug, Clone, Parser)]
pub struct PostArgs {
	/// average channels down to mono after decoding
	#[arg(long, default_value_t = false)]
	pub mono: bool,

	/// normalise samples to float after decoding
	#[arg(long, default_value_t = false)]
	pub float: bool,
}

impl PostArgs {
	pub fn conversion(&self) -> Option<fastwave::convert::Conversion> {
		use fastwave::convert::Conversion;
		match (self.mono, self.float) {
			(false, false) => None,
			(false, true) => Some(Conversion::Float32),
			(true, false) => Some(Conversion::Mono),
			(true, true) => Some(Conversion::MonoFloat32),
		}
	}
}
