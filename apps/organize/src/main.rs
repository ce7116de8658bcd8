//! Sorts a directory's files into `YYYY-MM-DD` folders named after
//! each file's modification time. One shot: scan, move, report.

use clap::Parser;
use skiff_organizer::Organizer;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
	name = "skiff-organize",
	about = "Sort a directory's files into date-named folders"
)]
struct Args {
	/// Directory to organize; defaults to the current directory
	#[arg(default_value = ".")]
	dir: PathBuf,

	/// Extensions to organize instead of the built-in set
	#[arg(long, value_delimiter = ',')]
	extensions: Option<Vec<String>>,
}

fn init_tracing() {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(fmt::layer().with_target(false))
		.init();
}

fn main() -> anyhow::Result<()> {
	init_tracing();

	let args = Args::parse();

	let mut organizer = Organizer::new(&args.dir)?;
	if let Some(extensions) = args.extensions {
		organizer = organizer.with_extensions(extensions);
	}

	let report = organizer.organize()?;

	info!(
		moved = report.moved.len(),
		skipped = report.skipped,
		failed = report.failed,
		"Organize run finished"
	);

	if report.failed > 0 {
		anyhow::bail!("{} file(s) could not be organized", report.failed);
	}

	Ok(())
}
