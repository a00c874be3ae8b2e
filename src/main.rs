use anyhow::Result;
use clap::Parser;
use pbs_dotslash::commands::{self, DEFAULT_VERSION, GenerateOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// pbs-dotslash - DotSlash descriptors for standalone CPython builds
///
/// Generates DotSlash files pointing at the latest python-build-standalone
/// release, and checks generated files by running them through dotslash.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for avoiding rate limits.
///
/// Examples:
///   pbs-dotslash generate > cpython-3.13
///   pbs-dotslash generate --free-threaded > cpython-3.13t
///   pbs-dotslash check cpython-3.13 cpython-3.13t
#[derive(Parser, Debug)]
#[command(author, version = env!("PBS_DOTSLASH_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print a DotSlash descriptor for the latest release to stdout
    Generate(GenerateArgs),

    /// Run descriptors through dotslash and verify the interpreter they launch
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// CPython series to describe
    #[arg(long = "cpython-version", value_name = "VERSION", default_value = DEFAULT_VERSION)]
    cpython_version: String,

    /// Look for free-threaded builds
    #[arg(long)]
    free_threaded: bool,

    /// Repository publishing the builds (defaults to astral-sh/python-build-standalone)
    #[arg(long, value_name = "OWNER/REPO", env = "PBS_DOTSLASH_REPO")]
    repo: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", env = "PBS_DOTSLASH_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    github_token: Option<String>,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Descriptor files, or directories containing them
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            let options = GenerateOptions {
                version: args.cpython_version,
                free_threaded: args.free_threaded,
            };
            commands::generate(args.repo.as_deref(), args.api_url, args.github_token, options)
                .await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check(args) => commands::check(&args.paths),
    }
}
