mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_MANIFEST_ERROR};
use pso_core::install_signal_handler;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "pso",
    version,
    about = "Particle swarm optimization driven by TOML configuration"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the optimizer with a configuration file.
    Run {
        /// Path to optimizer config TOML file.
        #[arg(default_value = "config/config.toml")]
        config: PathBuf,
        /// Built-in objective to minimize (overrides the config file).
        #[arg(long)]
        objective: Option<String>,
        /// Seed for a reproducible run (overrides the config file).
        #[arg(long)]
        seed: Option<u64>,
        /// Number of iterations (overrides the config file).
        #[arg(long)]
        iterations: Option<usize>,
        /// Number of particles (overrides the config file).
        #[arg(long)]
        particles: Option<usize>,
        /// Also print the global best fitness after every iteration.
        #[arg(long, default_value_t = false)]
        history: bool,
    },
    /// Write a new optimizer config from a built-in preset.
    New {
        /// Preset to start from.
        #[arg(long, default_value = "schwefel")]
        template: String,
        /// Destination file.
        #[arg(long, default_value = "config.toml")]
        output: PathBuf,
        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Validate or re-serialize the package manifest.
    Manifest {
        #[command(subcommand)]
        action: ManifestAction,
    },
    /// List the dependencies the package manifest declares.
    Deps {
        /// Path to package manifest TOML file.
        #[arg(default_value = "pso.toml")]
        manifest: PathBuf,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum ManifestAction {
    /// Check that the manifest is well-formed.
    Check {
        /// Path to package manifest TOML file.
        #[arg(default_value = "pso.toml")]
        manifest: PathBuf,
        /// Also require a conanfile.txt to declare the same requires and generators.
        #[arg(long)]
        conanfile: Option<PathBuf>,
    },
    /// Print the manifest in canonical form.
    Show {
        /// Path to package manifest TOML file.
        #[arg(default_value = "pso.toml")]
        manifest: PathBuf,
        /// Output encoding.
        #[arg(long, value_enum, default_value_t = ManifestFormat::Toml)]
        format: ManifestFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ManifestFormat {
    Toml,
    Conanfile,
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("PSO_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Run {
            config,
            objective,
            seed,
            iterations,
            particles,
            history,
        } => {
            install_signal_handler();
            commands::run::run(
                &config,
                &commands::run::Overrides {
                    objective,
                    seed,
                    iterations,
                    particles,
                },
                history,
                json_output,
            )
        }
        Commands::New {
            template,
            output,
            force,
        } => commands::new::run(&template, &output, force, json_output),
        Commands::Manifest { action } => match action {
            ManifestAction::Check {
                manifest,
                conanfile,
            } => commands::manifest::check(&manifest, conanfile.as_deref(), json_output),
            ManifestAction::Show { manifest, format } => {
                commands::manifest::show(&manifest, format, json_output)
            }
        },
        Commands::Deps { manifest } => commands::deps::run(&manifest, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:")
                || msg.starts_with("failed to parse manifest")
                || msg.starts_with("failed to read manifest")
            {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("config error:")
                || msg.starts_with("failed to parse config")
                || msg.starts_with("failed to read config")
            {
                EXIT_CONFIG_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
