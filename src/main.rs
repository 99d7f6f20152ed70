use clap::{Args, Parser, Subcommand};
use laptop_history::cli::{self, ExportFormat};
use laptop_history::config::DashboardConfig;
use laptop_history::core::ReplacementFilter;
use laptop_history::error::HistoryResult;
use laptop_history::logging::{init_logging, CLI_DEFAULT, CLI_VERBOSE, SERVER_DEFAULT};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "laptop-history")]
#[command(about = "Laptop part-replacement history from an asset workbook")]
#[command(long_about = "Laptop History - part-replacement dashboard for a laptop fleet

Reads the 'Laptop Data' and 'Part Replacement' sheets of an asset workbook,
joins every replacement to its laptop and summarises the result.

COMMANDS:
  report   - Print the dashboard (counts, trends, distributions, heatmap)
  export   - Write the filtered history to CSV or an .xlsx report
  options  - List the values accepted by --year, --user and --part
  watch    - Re-run the report whenever the workbook changes
  login    - Check a username/password pair
  serve    - Start the HTTP dashboard API

FILTERS:
  --year, --user and --part accept a value or 'all' (also 'Semua').

EXAMPLES:
  laptop-history report --year 2023
  laptop-history export riwayat.csv --user alice
  laptop-history --workbook fleet.xlsx export report.xlsx
  laptop-history --config dashboard.yaml serve")]
#[command(version)]
struct Cli {
    /// Asset workbook (overrides the config file)
    #[arg(short, long, global = true, env = "LAPTOP_HISTORY_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// YAML config file
    #[arg(short, long, global = true, env = "LAPTOP_HISTORY_CONFIG")]
    config: Option<PathBuf>,

    /// Show per-row detail and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Replacement year, or 'all'
    #[arg(long)]
    year: Option<String>,

    /// User, or 'all'
    #[arg(long)]
    user: Option<String>,

    /// Part, or 'all'
    #[arg(long)]
    part: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> HistoryResult<ReplacementFilter> {
        ReplacementFilter::from_selections(
            self.year.as_deref(),
            self.user.as_deref(),
            self.part.as_deref(),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard for the selected filters
    Report {
        #[command(flatten)]
        filters: FilterArgs,
    },

    #[command(long_about = "Export the filtered replacement history.

CSV output carries User, Merk, Model, Part, Tanggal Ganti and Keterangan.
XLSX output is a multi-sheet report: history, per-part, per-year,
per-user and the user x part heatmap.

The format follows the output extension unless --format is given.")]
    /// Export the filtered history to CSV or XLSX
    Export {
        /// Output file (.csv or .xlsx)
        #[arg(default_value = "riwayat_penggantian_part.csv")]
        output: PathBuf,

        /// Output format (default: from the extension)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List the values each filter accepts
    Options,

    /// Re-run the report whenever the workbook is saved
    Watch {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Check a username/password pair against the configured accounts
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(short, long, env = "LAPTOP_HISTORY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Start the HTTP dashboard API
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, env = "LAPTOP_HISTORY_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "LAPTOP_HISTORY_PORT")]
        port: Option<u16>,
    },
}

fn main() -> HistoryResult<()> {
    let cli = Cli::parse();

    let directives = match (&cli.command, cli.verbose) {
        (Commands::Serve { .. }, _) => SERVER_DEFAULT,
        (_, true) => CLI_VERBOSE,
        (_, false) => CLI_DEFAULT,
    };
    init_logging(directives);

    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())?;
    if let Some(workbook) = cli.workbook {
        config.workbook = workbook;
    }
    let workbook = config.workbook.clone();
    let verbose = cli.verbose;

    match cli.command {
        Commands::Report { filters } => cli::report(workbook, filters.to_filter()?, verbose),

        Commands::Export {
            output,
            format,
            filters,
        } => cli::export(workbook, output, filters.to_filter()?, format, verbose),

        Commands::Options => cli::options(workbook),

        Commands::Watch { filters } => cli::watch(workbook, filters.to_filter()?, verbose),

        Commands::Login { username, password } => cli::login(&config, username, password),

        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cli::serve(&config)
        }
    }
}
