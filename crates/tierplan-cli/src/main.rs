use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tierplan",
    about = "tierplan: place edge platform functions and emit the deployment template",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run placement and show where every platform function lands
    Plan {
        /// Infra descriptor (TOML)
        #[arg(short, long)]
        input: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Report every advisory for a topology without generating anything.
    ///
    /// Exits non-zero when any advisory is found.
    Check {
        #[arg(short, long)]
        input: String,
        /// Tenant quota limits (TOML). Quotas are skipped when absent.
        #[arg(short, long)]
        quotas: Option<String>,
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Generate the deployment template.
    ///
    /// Refuses to write while advisories exist unless --force is given.
    Generate {
        #[arg(short, long)]
        input: String,
        /// Template file to write
        #[arg(short, long)]
        output: String,
        /// Artifact store (redb) to record cluster flavors and the node password in
        #[arg(long)]
        state: Option<String>,
        /// Node password to embed; a random one is generated if omitted
        #[arg(long)]
        password: Option<String>,
        /// Generate even when advisories exist
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tierplan=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { input, format } => commands::plan::plan(&input, &format),
        Commands::Check { input, quotas, format } => {
            commands::check::check(&input, quotas.as_deref(), &format)
        }
        Commands::Generate { input, output, state, password, force } => {
            commands::generate::generate(commands::generate::GenerateArgs {
                input: &input,
                output: &output,
                state: state.as_deref(),
                password,
                force,
            })
        }
    }
}
