use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "almaia-cli", version, about = "AlmaIA CLI")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Question wizard over a local question file
    Wizard {
        #[command(subcommand)]
        action: commands::wizard::WizardAction,
    },
    /// Group answer rows or tasks from a local file
    Group {
        #[command(subcommand)]
        action: commands::group::GroupAction,
    },
    /// Fetch data from the backend
    Fetch {
        #[command(subcommand)]
        action: commands::fetch::FetchAction,
    },
    /// SOS alerts
    Alert {
        #[command(subcommand)]
        action: commands::alert::AlertAction,
    },
    /// Session token inspection
    Token {
        #[command(subcommand)]
        action: commands::token::TokenAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries JSON output, logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Wizard { action } => commands::wizard::run(action),
        Commands::Group { action } => commands::group::run(action),
        Commands::Fetch { action } => commands::fetch::run(action),
        Commands::Alert { action } => commands::alert::run(action),
        Commands::Token { action } => commands::token::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "almaia-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
