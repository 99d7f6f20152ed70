use crate::api::{run_api_server, ApiConfig};
use crate::auth::{CredentialVerifier, Session};
use crate::config::DashboardConfig;
use crate::core::aggregate::CountEntry;
use crate::core::{Dashboard, FilterOptions, ReplacementFilter};
use crate::error::{HistoryError, HistoryResult};
use crate::excel::{ReportExporter, WorkbookLoader};
use crate::export::write_csv_file;
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;

/// Widest bar drawn next to a count
const MAX_BAR: usize = 40;

/// Output format for the export command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }
}

fn describe_filter(filter: &ReplacementFilter) -> String {
    format!(
        "year={} user={} part={}",
        filter
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "all".to_string()),
        filter.user.as_deref().unwrap_or("all"),
        filter.part.as_deref().unwrap_or("all"),
    )
}

fn print_counts(title: &str, entries: &[CountEntry]) {
    println!("{}", title.bold().cyan());
    if entries.is_empty() {
        println!("   (no data)");
        println!();
        return;
    }

    let width = entries.iter().map(|e| e.key.chars().count()).max().unwrap_or(0);
    let max = entries.iter().map(|e| e.count).max().unwrap_or(1).max(1);
    for entry in entries {
        let bar_len = (entry.count * MAX_BAR).div_ceil(max);
        println!(
            "   {:<width$}  {:>5}  {}",
            entry.key,
            entry.count.to_string().bold(),
            "█".repeat(bar_len).green(),
            width = width
        );
    }
    println!();
}

fn print_dashboard(view: &Dashboard, verbose: bool) {
    println!(
        "{} {} of {} replacement rows",
        "📋 Records:".bold().green(),
        view.records.len().to_string().bold(),
        view.total_records
    );
    println!("   Laptops: {}", view.assets.len());

    let report = &view.report;
    if report.orphaned > 0 {
        println!(
            "   {} {} rows without a matching laptop (users: {})",
            "⚠️".yellow(),
            report.orphaned,
            report.orphaned_users.join(", ")
        );
    }
    if report.unparsed_dates > 0 {
        println!(
            "   {} {} replacement dates could not be parsed",
            "⚠️".yellow(),
            report.unparsed_dates
        );
    }
    if !report.duplicate_asset_users.is_empty() {
        println!(
            "   {} users with several laptop rows: {}",
            "⚠️".yellow(),
            report.duplicate_asset_users.join(", ")
        );
    }
    println!();

    if verbose {
        println!("{}", "📅 Replacement history".bold().cyan());
        for record in &view.records {
            println!(
                "   {:<12} {:<14} {:<10} {}",
                record.user,
                record.part,
                record
                    .replaced_on
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                record.note.as_deref().unwrap_or("")
            );
        }
        println!();
    }

    print_counts("🔩 Replacements per part", &view.part_frequency);
    let years: Vec<CountEntry> = view
        .yearly_trend
        .iter()
        .map(|y| CountEntry::new(y.year.to_string(), y.count))
        .collect();
    print_counts("📆 Replacements per year", &years);
    if verbose {
        print_counts("🗓️  Replacements per month", &view.monthly_trend);
    }
    print_counts("👤 Replacements per user", &view.user_counts);
    print_counts("🥧 CPU", &view.distributions.cpu);
    print_counts("🧠 RAM", &view.distributions.ram);
    print_counts("🏷️  Brand", &view.distributions.brand);
    print_counts("📆 Release year", &view.distributions.release_year);

    print_pivot(view);
}

fn print_pivot(view: &Dashboard) {
    let pivot = &view.pivot;
    println!("{}", "🌡️  User × part".bold().cyan());
    if pivot.users.is_empty() {
        println!("   (no data)\n");
        return;
    }

    let user_width = pivot.users.iter().map(|u| u.chars().count()).max().unwrap_or(4);
    let mut header = format!("   {:<width$}", "User", width = user_width);
    for part in &pivot.parts {
        header.push_str(&format!("  {:>8}", part));
    }
    println!("{}", header.bold());
    for (user, row) in pivot.users.iter().zip(&pivot.cells) {
        let mut line = format!("   {:<width$}", user, width = user_width);
        for count in row {
            line.push_str(&format!("  {:>8}", count));
        }
        println!("{}", line);
    }
    println!();
}

/// Execute the report command
pub fn report(workbook: PathBuf, filter: ReplacementFilter, verbose: bool) -> HistoryResult<()> {
    println!("{}", "💻 Laptop History - Report".bold().green());
    println!("   Workbook: {}", workbook.display());
    println!("   Filters:  {}\n", describe_filter(&filter));

    let view = Dashboard::load(&workbook, &filter)?;
    print_dashboard(&view, verbose);
    Ok(())
}

/// Execute the options command - list the values each filter accepts
pub fn options(workbook: PathBuf) -> HistoryResult<()> {
    println!("{}", "🔍 Laptop History - Filter Options".bold().green());
    println!("   Workbook: {}\n", workbook.display());

    let tables = WorkbookLoader::new(&workbook).load()?;
    let options = FilterOptions::from_records(&crate::core::enrich(&tables).records);

    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    println!("   {} all, {}", "Year:".cyan(), years.join(", "));
    println!("   {} all, {}", "User:".cyan(), options.users.join(", "));
    println!("   {} all, {}", "Part:".cyan(), options.parts.join(", "));
    Ok(())
}

/// Execute the export command
pub fn export(
    workbook: PathBuf,
    output: PathBuf,
    filter: ReplacementFilter,
    format: Option<ExportFormat>,
    verbose: bool,
) -> HistoryResult<()> {
    let format = match format.or_else(|| ExportFormat::from_path(&output)) {
        Some(f) => f,
        None => {
            return Err(HistoryError::Validation(format!(
                "Cannot infer export format from '{}'; use --format csv|xlsx",
                output.display()
            )))
        }
    };

    println!("{}", "⬇️  Laptop History - Export".bold().green());
    println!("   Workbook: {}", workbook.display());
    println!("   Output:   {}", output.display());
    println!("   Filters:  {}\n", describe_filter(&filter));

    let view = Dashboard::load(&workbook, &filter)?;
    if verbose {
        println!(
            "   {} rows after filters (of {})",
            view.records.len(),
            view.total_records
        );
    }

    match format {
        ExportFormat::Csv => write_csv_file(&view.records, &output)?,
        ExportFormat::Xlsx => ReportExporter::new(&view).export(&output)?,
    }

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   {} rows written to {}\n", view.records.len(), output.display());
    Ok(())
}

/// Execute the login command - check a username/password pair
pub fn login(config: &DashboardConfig, username: String, password: Option<String>) -> HistoryResult<()> {
    let password = password.ok_or_else(|| {
        HistoryError::Validation(
            "Password required (--password or LAPTOP_HISTORY_PASSWORD)".to_string(),
        )
    })?;

    let verifier = config.credentials();
    let mut session = Session::new();
    match session.login(&verifier, &username, &password) {
        Ok(()) => {
            println!(
                "{} Welcome, {}!",
                "✅".green(),
                session.username().unwrap_or_default().bold()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "❌".red(), "Invalid username or password".red());
            Err(e.into())
        }
    }
}

/// Execute the serve command
pub fn serve(config: &DashboardConfig) -> HistoryResult<()> {
    let verifier: Arc<dyn CredentialVerifier> = Arc::new(config.credentials());
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime
        .block_on(run_api_server(ApiConfig::from(config), verifier))
        .map_err(|e| HistoryError::Server(e.to_string()))
}

/// Execute the watch command - rerun the report whenever the workbook changes
pub fn watch(workbook: PathBuf, filter: ReplacementFilter, verbose: bool) -> HistoryResult<()> {
    println!("{}", "👁️  Laptop History - Watch Mode".bold().green());
    println!("   Watching: {}", workbook.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !workbook.exists() {
        return Err(HistoryError::Validation(format!(
            "File not found: {}",
            workbook.display()
        )));
    }

    let canonical_path = workbook.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| HistoryError::Validation("Cannot determine parent directory".to_string()))?;
    let file_name = canonical_path.file_name().map(|n| n.to_os_string());

    let (tx, rx) = channel();

    // Spreadsheet editors save through temp files; debounce the burst
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)
        .map_err(|e| HistoryError::Validation(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| HistoryError::Validation(format!("Failed to watch directory: {}", e)))?;

    println!("{}", "🔄 Initial run...".cyan());
    run_report(&canonical_path, &filter, verbose);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && event.path.file_name().map(|n| n.to_os_string()) == file_name
                });

                if relevant {
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        chrono::Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    run_report(&canonical_path, &filter, verbose);
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

/// One report pass in watch mode; errors are shown, not returned
fn run_report(workbook: &Path, filter: &ReplacementFilter, verbose: bool) {
    match Dashboard::load(workbook, filter) {
        Ok(view) => print_dashboard(&view, verbose),
        Err(e) => eprintln!("{} {}", "❌".red(), e),
    }
}
