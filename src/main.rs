//! Command line front end for the SAT solver bridge

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use sat_bridge::{
    config::{CliOverrides, ConfigSource, Settings, DEFAULT_PROPERTIES_FILE},
    encoder,
    utils::{ColorOutput, OutputFormat, ResultFormatter},
    Clause, Registry, Solver, Variable,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sat_bridge")]
#[command(about = "Build SAT problems and hand them to an external DIMACS solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct SolverArgs {
    /// YAML configuration file
    #[arg(short, long, conflicts_with = "properties")]
    config: Option<PathBuf>,

    /// Properties file with `solver.executable` and `verbose` keys
    #[arg(short, long)]
    properties: Option<PathBuf>,

    /// Solver executable (overrides config)
    #[arg(short, long)]
    executable: Option<String>,

    /// Give up after this many seconds (overrides config)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Echo the DIMACS problem before sending it
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the bundled exactly-one example
    Demo {
        #[command(flatten)]
        solver: SolverArgs,

        /// Number of variables in the exactly-one group
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Print the solver's diagnostic lines
        #[arg(long)]
        statistics: bool,
    },

    /// Print the DIMACS text of the example without running a solver
    Dimacs {
        /// Number of variables in the exactly-one group
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },

    /// Write a default configuration file
    Setup {
        /// File to create
        #[arg(short, long, default_value = "config/solver.yaml")]
        output: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            solver,
            count,
            format,
            statistics,
        } => demo_command(&solver, count, format, statistics),
        Commands::Dimacs { count } => dimacs_command(count),
        Commands::Setup { output, force } => setup_command(&output, force),
    }
}

/// Resolve the settings the way the CLI documents: explicit file first,
/// then `solver.cfg` in the working directory, then built-in defaults.
fn load_settings(args: &SolverArgs) -> Result<Settings> {
    let source = match (&args.config, &args.properties) {
        (Some(path), _) => Some(ConfigSource::Yaml(path.clone())),
        (None, Some(path)) => Some(ConfigSource::Properties(path.clone())),
        (None, None) if Path::new(DEFAULT_PROPERTIES_FILE).exists() => {
            Some(ConfigSource::Properties(PathBuf::from(DEFAULT_PROPERTIES_FILE)))
        }
        (None, None) => None,
    };

    let mut settings = match source {
        Some(source) => source
            .load()
            .with_context(|| format!("Failed to load settings from {:?}", source))?,
        None => {
            info!("no configuration given, using defaults");
            Settings::default()
        }
    };

    settings.merge_with_cli(&CliOverrides {
        executable: args.executable.clone(),
        timeout_seconds: args.timeout,
        verbose: args.verbose,
    });
    settings
        .validate()
        .context("Configuration validation failed")?;
    Ok(settings)
}

/// `left <-> OR(v0..vn)`, exactly one of `v0..vn`, and `-left`
fn build_example(registry: &Registry, count: usize) -> (Vec<Clause>, Vec<(String, Variable)>) {
    let left = registry.create_variable();
    let vars = registry.create_variables(count);

    let mut clauses = encoder::equivalence(left, &vars);
    clauses.extend(encoder::exactly_one(&vars));
    clauses.push(Clause::unit(!left));

    let mut named = vec![("left".to_string(), left)];
    named.extend(
        vars.iter()
            .enumerate()
            .map(|(i, &var)| (format!("var #{}", i), var)),
    );
    (clauses, named)
}

fn demo_command(
    args: &SolverArgs,
    count: usize,
    format: OutputFormat,
    show_statistics: bool,
) -> Result<()> {
    let settings = load_settings(args)?;
    let registry = Registry::new();
    let (clauses, named) = build_example(&registry, count);

    let mut solver = Solver::new(settings);
    solver.add_clauses(clauses);

    let result = solver
        .solve(&registry)
        .with_context(|| format!("Solver `{}` failed", solver.settings().solver.executable))?;

    if format == OutputFormat::Text {
        if result.is_satisfiable() {
            println!("{}", ColorOutput::success("SAT"));
        } else {
            println!("{}", ColorOutput::warning("UNSAT"));
        }
    }
    print!(
        "{}",
        ResultFormatter::format(format, &result, &named, &registry, show_statistics)?
    );
    if format == OutputFormat::Json {
        println!();
    }

    if result.is_satisfiable() && !solver.verify(&registry)? {
        eprintln!(
            "{}",
            ColorOutput::error("solver assignment violates at least one clause")
        );
    }

    Ok(())
}

fn dimacs_command(count: usize) -> Result<()> {
    let registry = Registry::new();
    let (clauses, _) = build_example(&registry, count);

    let mut solver = Solver::new(Settings::default());
    solver.add_clauses(clauses);

    let stdout = std::io::stdout();
    solver
        .write_problem(&mut stdout.lock(), &registry)
        .context("Failed to write DIMACS problem")?;
    Ok(())
}

fn setup_command(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        println!("Skipped: {} (already exists)", output.display());
        return Ok(());
    }

    Settings::default()
        .to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("{}", ColorOutput::success(&format!("Created: {}", output.display())));
    Ok(())
}
