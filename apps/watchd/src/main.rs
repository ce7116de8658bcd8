//! Watches a directory and ships changed files to object storage as
//! zip bundles on a fixed interval. Configuration comes from flags or
//! the environment (a `.env` file is honored); a missing watch root or
//! incomplete storage settings abort startup before the loop begins.

use anyhow::Context;
use clap::Parser;
use skiff_batcher::{ChangeBatcher, ChangeBatcherService};
use skiff_storage::{ObjectStore, StorageConfig};
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "skiff-watchd", about = "Watch a directory and upload change bundles")]
struct Args {
	/// Directory tree to watch for changes
	#[arg(long, env = "WATCH_DIR")]
	watch_dir: PathBuf,

	/// Key prefix for uploaded bundles
	#[arg(long, env = "UPLOAD_PREFIX", default_value = "uploads")]
	upload_prefix: String,

	/// File name of the uploaded bundle
	#[arg(long, env = "BUNDLE_NAME", default_value = "upload_bundle.zip")]
	bundle_name: String,

	/// Seconds between flush cycles
	#[arg(long, env = "FLUSH_INTERVAL_SECS", default_value_t = 10)]
	flush_interval_secs: u64,

	/// Seconds before an upload attempt is abandoned, so shutdown
	/// latency stays bounded
	#[arg(long, env = "UPLOAD_TIMEOUT_SECS", default_value_t = 60)]
	upload_timeout_secs: u64,
}

fn init_tracing() {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(fmt::layer().with_target(true))
		.init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	dotenvy::dotenv().ok();
	init_tracing();

	let args = Args::parse();

	if !args.watch_dir.is_dir() {
		anyhow::bail!(
			"watch directory '{}' does not exist or is not a directory",
			args.watch_dir.display()
		);
	}

	let storage_config = StorageConfig::from_env().context("loading storage configuration")?;
	let store = ObjectStore::new(&storage_config)?;

	// Reachability is not a startup requirement; a flaky bucket just
	// means uploads get retried each cycle
	if let Err(e) = store.check().await {
		warn!(?e, "Bucket not reachable at startup; uploads will be retried each cycle;");
	}

	let batcher = ChangeBatcher::new(
		&args.watch_dir,
		store,
		&args.upload_prefix,
		&args.bundle_name,
	)
	.with_upload_timeout(Duration::from_secs(args.upload_timeout_secs));

	let service =
		ChangeBatcherService::start(batcher, Duration::from_secs(args.flush_interval_secs))?;

	shutdown_signal().await;
	info!("Shutdown signal received, stopping watcher");
	service.stop().await;

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {}
		_ = terminate => {}
	}
}
