use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use constellation::Constellation;
use constellation::config::{DependencyDirs, ProcessEnv, Profile, Resolver, SearchPath};

/// Environment variable holding dependency roots for `--load-from-dependency-dirs`.
const DEPENDENCY_PATH_VAR: &str = "CONSTELLATION_DEPENDENCY_PATH";

/// Environment variable holding a `tracing` filter directive.
const LOG_VAR: &str = "CONSTELLATION_LOG";

#[derive(Parser)]
#[command(name = "constellation")]
#[command(
	author,
	version,
	about = "Resolve layered settings from explicit values, environment variables and config files"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Config file searched for in the current, home and dependency directories
	#[arg(short = 'f', long, global = true, value_name = "PATH")]
	config_file: Option<PathBuf>,

	/// Map a setting to an environment variable
	#[arg(short, long = "env", global = true, value_name = "KEY=VAR", value_parser = parse_pair)]
	env_params: Vec<(String, String)>,

	/// Set a value explicitly (highest precedence)
	#[arg(short, long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_pair)]
	set: Vec<(String, String)>,

	/// Search this dependency directory (repeatable, first wins)
	#[arg(short, long = "dependency-dir", global = true, value_name = "DIR")]
	dependency_dirs: Vec<PathBuf>,

	/// Search dependency directories listed in CONSTELLATION_DEPENDENCY_PATH
	#[arg(long, global = true)]
	load_from_dependency_dirs: bool,

	/// Increase log verbosity (-v, -vv, -vvv)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Display every resolved setting
	Show {
		/// Print the settings as a JSON object
		#[arg(long)]
		json: bool,
	},
	/// Print a single resolved setting
	Get {
		/// Setting name
		key: String,
	},
	/// List candidate config files in precedence order
	Sources {
		/// Print the candidates as a JSON array
		#[arg(long)]
		json: bool,
	},
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn parse_pair(raw: &str) -> std::result::Result<(String, String), String> {
	match raw.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got `{raw}`")),
	}
}

fn run(cli: Cli) -> Result<ExitCode> {
	let mut profile = Profile::new()
		.env_params(cli.env_params.iter().cloned())
		.load_from_dependency_dirs(cli.load_from_dependency_dirs || !cli.dependency_dirs.is_empty());
	if let Some(ref path) = cli.config_file {
		profile = profile.config_file(path);
	}

	let dependencies: Box<dyn DependencyDirs> = if cli.dependency_dirs.is_empty() {
		Box::new(SearchPath::from_env(&ProcessEnv, DEPENDENCY_PATH_VAR))
	} else {
		Box::new(cli.dependency_dirs.clone())
	};
	let resolver = Resolver::new(&profile).with_dependency_dirs(move || dependencies.dependency_dirs());

	match cli.command {
		Commands::Show { json } => handle_show(&resolver, &cli.set, json),
		Commands::Get { ref key } => handle_get(&resolver, &cli.set, key),
		Commands::Sources { json } => handle_sources(&resolver, json),
	}
}

fn resolve(resolver: &Resolver<'_>, set: &[(String, String)]) -> Result<Constellation> {
	let explicit = set
		.iter()
		.map(|(key, value)| (key.as_str(), Value::String(value.clone())));
	Constellation::resolve_with(resolver, explicit).context("Failed to resolve settings")
}

fn handle_show(resolver: &Resolver<'_>, set: &[(String, String)], json: bool) -> Result<ExitCode> {
	let settings = resolve(resolver, set)?;

	if json {
		let output = serde_json::to_string_pretty(&settings.snapshot())
			.context("Failed to serialize settings")?;
		println!("{}", output);
		return Ok(ExitCode::SUCCESS);
	}

	if settings.settings().is_empty() {
		println!("No settings resolved.");
		return Ok(ExitCode::SUCCESS);
	}

	for (key, value) in settings.iter() {
		println!("{} = {}", key, display_value(value));
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_get(resolver: &Resolver<'_>, set: &[(String, String)], key: &str) -> Result<ExitCode> {
	let settings = resolve(resolver, set)?;

	match settings.get(key) {
		Some(value) => {
			println!("{}", display_value(value));
			Ok(ExitCode::SUCCESS)
		}
		None => {
			eprintln!("Setting not found: {}", key);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_sources(resolver: &Resolver<'_>, json: bool) -> Result<ExitCode> {
	let candidates = resolver.candidate_files();

	if json {
		let output = serde_json::to_string_pretty(&candidates)
			.context("Failed to serialize candidate files")?;
		println!("{}", output);
		return Ok(ExitCode::SUCCESS);
	}

	if candidates.is_empty() {
		println!("No config file configured.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Config files (in precedence order):\n");
	for candidate in &candidates {
		let status = if candidate.path.exists() {
			"(exists)"
		} else {
			"(not found)"
		};
		println!("  [{}] {} {}", candidate.kind, candidate.path.display(), status);
	}

	Ok(ExitCode::SUCCESS)
}

/// Strings print raw, everything else as compact JSON.
fn display_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
