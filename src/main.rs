use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

mod report;

#[derive(Debug, Parser)]
#[command(version, about = "Shows what every byte of a java class file means")]
struct Cli {
	/// The class file to decode.
	path: PathBuf,

	/// What to show.
	#[arg(long, value_enum, default_value_t)]
	view: View,

	#[arg(long, value_enum, default_value_t)]
	format: Format,

	/// Indent JSON output.
	#[arg(long)]
	pretty: bool,

	/// Be verbose. Give it twice for debug output, three times for everything.
	#[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
	verbose: u8,

	/// Also write the log to this file.
	#[arg(long)]
	log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum View {
	/// The tree of labeled byte ranges, together with the hex tokens.
	#[default]
	Provenance,
	/// The decoded class: names, fields, methods and their code.
	Model,
	/// Only the hex tokens.
	Hex,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
	#[default]
	Json,
	Text,
}

fn level_filter(verbose: u8) -> LevelFilter {
	match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	}
}

fn setup_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
	let mut dispatch = fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level_filter(verbose))
		.chain(std::io::stderr());

	if let Some(path) = log_file {
		let file = fern::log_file(path)
			.with_context(|| anyhow!("failed to open log file {path:?}"))?;
		dispatch = dispatch.chain(file);
	}

	dispatch.apply()
		.context("failed to set up logging")
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_logging(cli.verbose, cli.log_file.as_deref())?;

	let bytes = std::fs::read(&cli.path)
		.with_context(|| anyhow!("failed to read class file {:?}", cli.path))?;
	info!("read {} bytes from {:?}", bytes.len(), cli.path);

	let (output, error) = match cli.view {
		View::Provenance => {
			let inspection = classlens::inspect(&bytes);
			let output = match cli.format {
				Format::Json => report::to_json(&inspection, cli.pretty)?,
				Format::Text => report::provenance_text(&inspection),
			};
			(output, inspection.error)
		},
		View::Model => {
			let layout = classlens::read_layout(&bytes)
				.with_context(|| anyhow!("failed to decode {:?}", cli.path))?;
			let model = layout.model();
			let error = layout.failure().map(ToString::to_string);
			let output = match cli.format {
				Format::Json => report::to_json(&report::ModelReport::new(&model, error.clone()), cli.pretty)?,
				Format::Text => report::model_text(&model),
			};
			(output, error)
		},
		View::Hex => {
			let hex = classlens::hex_tokens::hex_tokens(&bytes);
			let output = match cli.format {
				Format::Json => report::to_json(&hex, cli.pretty)?,
				Format::Text => report::hex_text(&hex),
			};
			(output, None)
		},
	};

	let mut stdout = std::io::stdout().lock();
	writeln!(stdout, "{output}")
		.context("failed to write output")?;

	if let Some(error) = error {
		bail!("decoding of {:?} stopped early: {error}", cli.path);
	}
	Ok(())
}
