//! Main entry point for the catshop order desk service.
//!
//! Runs a single order desk shared by every cashier, packer and collection
//! terminal, and serves it over HTTP until interrupted.

use catshop_archive::ArchiveFactory;
use catshop_config::Config;
use catshop_orders::{DeskBuilder, OrderDesk, OrderProcessing};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

mod event_bus;
mod notify;
mod server;

use event_bus::EventBus;
use notify::NotifyingDesk;

/// Command-line arguments for the order desk service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/demo.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the order desk service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the desk with its archive
/// 5. Serves the API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started order desk");

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.desk.id);

	let desk = build_desk(config.clone())?;
	let events = EventBus::new(config.desk.event_capacity);
	let terminal_log = tokio::spawn(log_events(events.clone()));
	let desk: Arc<dyn OrderProcessing> = Arc::new(NotifyingDesk::new(desk, events));

	tokio::select! {
		result = server::start_server(config.api.clone(), desk) => {
			tracing::info!("API server finished");
			result?;
		}
		result = tokio::signal::ctrl_c() => {
			tracing::info!("Shutdown requested");
			result?;
		}
	}

	terminal_log.abort();
	tracing::info!("Stopped order desk");
	Ok(())
}

/// Builds the order desk with every registered archive implementation.
fn build_desk(config: Config) -> Result<OrderDesk, Box<dyn std::error::Error>> {
	let factories: HashMap<String, ArchiveFactory> = catshop_archive::get_all_implementations()
		.into_iter()
		.map(|(name, factory)| (name.to_string(), factory))
		.collect();

	Ok(DeskBuilder::new(config).build(&factories)?)
}

/// Logs every order event so terminal activity shows up in the desk log.
async fn log_events(events: EventBus) {
	let mut receiver = events.subscribe();
	loop {
		match receiver.recv().await {
			Ok(event) => {
				tracing::info!(
					order_number = %event.order_number(),
					event = ?event,
					"Terminal refresh"
				);
			},
			Err(RecvError::Lagged(missed)) => {
				tracing::warn!(missed, "Event log fell behind");
			},
			Err(RecvError::Closed) => break,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use catshop_config::builders::config::ConfigBuilder;
	use tempfile::tempdir;

	#[test]
	fn test_args_defaults() {
		let args = Args::parse_from(["catshop"]);
		assert_eq!(args.config, PathBuf::from("config/demo.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::parse_from(["catshop", "--config", "desk.toml", "-l", "debug"]);
		assert_eq!(args.config, PathBuf::from("desk.toml"));
		assert_eq!(args.log_level, "debug");
	}

	#[tokio::test]
	async fn test_build_desk_with_minimal_config() {
		let desk = build_desk(ConfigBuilder::new().build()).unwrap();
		assert_eq!(desk.id(), "test-desk");
		assert_eq!(desk.new_order(Default::default()).await.unwrap().get(), 1);
	}

	#[tokio::test]
	async fn test_build_desk_from_file() {
		let temp_dir = tempdir().unwrap();
		let config_path = temp_dir.path().join("desk.toml");
		std::fs::write(
			&config_path,
			r#"
[desk]
id = "file-desk"

[orders]
first_number = 100

[archive]
primary = "memory"

[archive.implementations.memory]
capacity = 10
"#,
		)
		.unwrap();

		let config = Config::from_file(&config_path).await.unwrap();
		let desk = build_desk(config).unwrap();
		assert_eq!(desk.id(), "file-desk");
		assert_eq!(desk.next_order_number().await.unwrap().get(), 100);
	}

	#[tokio::test]
	async fn test_shipped_demo_config_builds() {
		let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/demo.toml");
		let config = Config::from_file(path).await.unwrap();
		assert!(build_desk(config).is_ok());
	}
}
