use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cfgfile::format::JsonFormat;
use cfgfile::{Document, FileConfig, Format, FormatKind};

#[derive(Parser)]
#[command(name = "cfgfile")]
#[command(
	author,
	version,
	about = "Load, save and incrementally update JSON, YAML and TOML configuration files"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Format to use instead of routing by file extension
	#[arg(long, global = true, value_enum)]
	format: Option<FormatArg>,

	/// Log debug output to stderr (overrides CFGFILE_LOG)
	#[arg(long, short, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Print a config file, resolving ${placeholders} if a context is given
	Show {
		path: PathBuf,

		/// Config file whose values resolve placeholders
		#[arg(long, value_name = "FILE")]
		context: Option<PathBuf>,
	},
	/// Merge an inline JSON object into a config file
	Set {
		path: PathBuf,

		/// JSON object holding only the keys to change
		#[arg(value_name = "PARTIAL_JSON")]
		partial: String,
	},
	/// Merge the content of a reference file into a config file
	Merge { path: PathBuf, reference: PathBuf },
	/// Print the file extension used by a format
	Extension {
		#[arg(value_enum)]
		format: FormatArg,
	},
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
	Json,
	Yaml,
	Toml,
}

impl From<FormatArg> for FormatKind {
	fn from(arg: FormatArg) -> Self {
		match arg {
			FormatArg::Json => FormatKind::Json,
			FormatArg::Yaml => FormatKind::Yaml,
			FormatArg::Toml => FormatKind::Toml,
		}
	}
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

fn init_logging(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_env("CFGFILE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	let format = cli.format.map(FormatKind::from);
	match cli.command {
		Commands::Show { path, context } => handle_show(&path, context.as_deref(), format),
		Commands::Set { path, partial } => handle_set(&path, &partial, format),
		Commands::Merge { path, reference } => handle_merge(&path, &reference, format),
		Commands::Extension { format } => {
			println!("{}", FormatKind::from(format).extension());
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn handle_show(path: &Path, context: Option<&Path>, format: Option<FormatKind>) -> Result<ExitCode> {
	let kind = resolve_format(path, format)?;
	let config = FileConfig::new(kind);

	let doc = match context {
		Some(context_path) => {
			let context_kind = resolve_format(context_path, format)?;
			let context_doc = FileConfig::new(context_kind)
				.load(context_path)
				.with_context(|| format!("Failed to load context {}", context_path.display()))?;
			config.load_with_resolve_placeholder(path, &context_doc)
		}
		None => config.load(path),
	}
	.with_context(|| format!("Failed to load {}", path.display()))?;

	print_document(kind, &doc)?;
	Ok(ExitCode::SUCCESS)
}

fn handle_set(path: &Path, partial: &str, format: Option<FormatKind>) -> Result<ExitCode> {
	let kind = resolve_format(path, format)?;
	let partial: Document =
		serde_json::from_str(partial).context("PARTIAL_JSON is not valid JSON")?;

	let merged = FileConfig::new(kind)
		.update(path, &partial)
		.with_context(|| format!("Failed to update {}", path.display()))?;

	print_document(kind, &merged)?;
	Ok(ExitCode::SUCCESS)
}

fn handle_merge(path: &Path, reference: &Path, format: Option<FormatKind>) -> Result<ExitCode> {
	let kind = resolve_format(path, format)?;
	let reference_kind = resolve_format(reference, format)?;
	let config = FileConfig::new(kind);

	let merged = if kind == reference_kind {
		config.update_by_file(path, reference)
	} else {
		let partial = FileConfig::new(reference_kind)
			.load(reference)
			.with_context(|| format!("Failed to load reference {}", reference.display()))?;
		config.update(path, &partial)
	}
	.with_context(|| format!("Failed to update {}", path.display()))?;

	print_document(kind, &merged)?;
	Ok(ExitCode::SUCCESS)
}

fn resolve_format(path: &Path, format: Option<FormatKind>) -> Result<FormatKind> {
	format
		.or_else(|| FormatKind::from_path(path))
		.ok_or_else(|| {
			anyhow::anyhow!(
				"Cannot tell the format of {}; pass --format",
				path.display()
			)
		})
}

fn print_document(kind: FormatKind, doc: &Document) -> Result<()> {
	let text = match kind {
		FormatKind::Json => JsonFormat::pretty().serialize(doc),
		other => other.serialize(doc),
	}
	.map_err(|e| anyhow::anyhow!(e))
	.context("Failed to render document")?;

	println!("{}", text.trim_end());
	Ok(())
}
