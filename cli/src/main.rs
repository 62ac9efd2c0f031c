use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use contract_graph_core::{
    compile, parse_contracts, CompileError, CompileOptions, CompiledSchema, ContractDefinition,
};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "contract-graph")]
#[command(about = "Compile versioned JSON Schema contracts into a typed graph schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a contract set into a schema
    Compile {
        /// JSON array of `{slug, version, schema}` contract records
        input: PathBuf,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Sdl)]
        format: OutputFormat,

        /// Max fragment nesting depth
        #[arg(long, default_value_t = CompileOptions::default().max_depth)]
        max_depth: usize,

        /// Do not synthesize the built-in card@1.0.0 contract
        #[arg(long)]
        no_base_card: bool,
    },

    /// Resolve a card value to its concrete type name
    Resolve {
        /// JSON array of `{slug, version, schema}` contract records
        input: PathBuf,

        /// Card value JSON file
        #[arg(long)]
        value: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Sdl,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the schema
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile {
            input,
            output,
            format,
            max_depth,
            no_base_card,
        } => {
            let contracts = read_contracts(&input)?;
            let options = CompileOptions {
                max_depth,
                base_card: !no_base_card,
            };
            let schema = compile_or_report(&contracts, &options)?;
            write_output(&schema, output.as_deref(), format)?;
        }
        Commands::Resolve { input, value } => {
            let contracts = read_contracts(&input)?;
            let schema = compile_or_report(&contracts, &CompileOptions::default())?;

            let file = File::open(&value)
                .with_context(|| format!("Failed to open value file: {}", value.display()))?;
            let card: serde_json::Value = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse value from: {}", value.display()))?;

            let resolved = schema
                .resolve_card_type(&card)
                .map_err(|e| anyhow::Error::from(e).context("Resolution failed"))?;
            println!("{}", resolved.name);
        }
    }

    Ok(())
}

fn read_contracts(input: &Path) -> Result<Vec<ContractDefinition>> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;
    parse_contracts(&content)
        .with_context(|| format!("Failed to parse contracts from: {}", input.display()))
}

/// Compile, printing the machine-readable error record to stderr on failure.
fn compile_or_report(
    contracts: &[ContractDefinition],
    options: &CompileOptions,
) -> Result<CompiledSchema> {
    compile(contracts, options).map_err(|e: CompileError| {
        let record = serde_json::json!({
            "code": e.code(),
            "path": e.path(),
            "message": e.to_string(),
        });
        eprintln!("{record}");
        anyhow::Error::from(e).context("Compilation failed")
    })
}

fn write_output(schema: &CompiledSchema, path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Sdl => {
            writer
                .write_all(schema.to_sdl().as_bytes())
                .context("Failed to write SDL")?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, schema).context("Failed to write JSON")?;
            writeln!(writer).context("Failed to write trailing newline")?;
        }
    }

    writer.flush().context("Failed to flush output")?;
    Ok(())
}
