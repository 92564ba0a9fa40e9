use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cmdroute_config::ApplicationDefinition;
use cmdroute_core::{
    Application, Command as AppCommand, RawArgs, Value, similar_command_names, tokenize,
};
use serde::Serialize;
use tracing::debug;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdroute")]
#[command(about = "Tokenize command lines and resolve them against application definitions")]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. debug, cmdroute_core=debug).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split a command line into tokens.
    Tokenize(TokenizeArgs),
    /// Load and build one or more application definitions.
    Validate(ValidateArgs),
    /// Resolve a command line against an application definition.
    Resolve(ResolveArgs),
    /// Suggest root command names similar to the given one.
    Suggest(SuggestArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Command line to tokenize.
    #[arg(allow_hyphen_values = true)]
    line: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Definition files (.json, .yml, .yaml).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Application definition file.
    #[arg(long)]
    app: PathBuf,
    /// Stop at the first parse error instead of failing.
    #[arg(long)]
    lenient: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Command line to resolve, without the program name.
    #[arg(allow_hyphen_values = true)]
    line: String,
}

#[derive(Debug, Args)]
struct SuggestArgs {
    /// Application definition file.
    #[arg(long)]
    app: PathBuf,
    /// The mistyped command name.
    name: String,
}

/// What `resolve` prints for the chosen command.
#[derive(Debug, Serialize)]
struct ResolveOutput {
    command: String,
    path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    handler: Option<String>,
    arguments: BTreeMap<String, Value>,
    options: BTreeMap<String, Value>,
    /// Explicitly given values, re-serialized as tokens.
    explicit: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match cli.command {
        Command::Tokenize(args) => run_tokenize(args),
        Command::Validate(args) => run_validate(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Suggest(args) => run_suggest(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let tokens = tokenize(&args.line);
    println!("{}", render(&tokens, args.format)?);
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    for path in &args.inputs {
        let (_, app) = load_application(path)?;
        println!(
            "Validated '{}': {} command(s).",
            path.display(),
            count_commands(app.commands())
        );
    }
    println!("Validated {} definition file(s).", args.inputs.len());
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let (definition, app) = load_application(&args.app)?;
    let raw = RawArgs::parse(&args.line);
    let resolved = definition
        .resolver()
        .resolve(&raw, &app, args.lenient)
        .map_err(|err| err.to_string())?;

    let command = resolved.command();
    debug!(path = ?command.path(), "Resolved command line");
    let parsed = resolved.args();
    let output = ResolveOutput {
        command: command.name().to_string(),
        path: command.path().to_vec(),
        handler: command.handler().map(str::to_string),
        arguments: parsed.arguments(true),
        options: parsed.options(true),
        explicit: parsed.to_tokens(),
    };
    println!("{}", render(&output, args.format)?);
    Ok(())
}

fn run_suggest(args: SuggestArgs) -> Result<(), String> {
    let (_, app) = load_application(&args.app)?;
    for suggestion in similar_command_names(&args.name, app.commands()) {
        println!("{suggestion}");
    }
    Ok(())
}

fn load_application(path: &Path) -> Result<(ApplicationDefinition, Application), String> {
    let definition = ApplicationDefinition::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    let app = definition
        .build()
        .map_err(|err| format!("Failed to build '{}': {err}", path.display()))?;
    Ok((definition, app))
}

fn count_commands(commands: &[AppCommand]) -> usize {
    commands
        .iter()
        .map(|command| 1 + count_commands(command.sub_commands()))
        .sum()
}

fn render<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => {
            serde_json::to_string_pretty(value)
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}
