use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use resequence_core::{
    Reconciler, TableEngine, emit, export_filename, order_for_execution, parse, plan,
    resolve_order, single_file, validate_database_filename,
};
use resequence_sqlite::SqliteStore;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "resequence")]
#[command(about = "Reorder SQLite tables by rewriting their sequence-prefixed names")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the user tables of a database in display order.
    List(ListArgs),
    /// Show the rename statements an export would run, without executing them.
    Plan(PlanArgs),
    /// Apply the renames and write a re-exported database image.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Database file (exactly one; .db, .sqlite, or .sqlite3).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Database file (exactly one; .db, .sqlite, or .sqlite3).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Comma-separated table order (bare or full names). Defaults to the
    /// current display order.
    #[arg(long)]
    order: Option<String>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Database file (exactly one; .db, .sqlite, or .sqlite3).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Comma-separated table order (bare or full names). Defaults to the
    /// current display order.
    #[arg(long)]
    order: Option<String>,
    /// Output path for the re-exported image. Defaults to the input file
    /// name in the current directory.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::List(args) => run_list(args),
        Command::Plan(args) => run_plan(args),
        Command::Export(args) => run_export(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let (path, store) = open_single(&args.inputs)?;
    let tables = store
        .list_tables()
        .map_err(|e| format!("Failed to read schema from '{}': {e}", path.display()))?;

    match args.format {
        CliOutputFormat::Table => {
            if tables.is_empty() {
                println!("No user tables in '{}'.", path.display());
                return Ok(());
            }
            for (position, name) in tables.iter().enumerate() {
                let parsed = parse(name);
                let prefix = parsed
                    .sequence
                    .map_or_else(|| "-".to_string(), |seq| format!("{seq:03}"));
                println!("{:>4}  {:>5}  {}", position + 1, prefix, parsed.bare);
            }
        }
        CliOutputFormat::Json => {
            #[derive(serde::Serialize)]
            struct TableEntry {
                position: usize,
                name: String,
                sequence: Option<u32>,
                bare: String,
            }

            let entries: Vec<TableEntry> = tables
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let parsed = parse(name);
                    TableEntry {
                        position: idx + 1,
                        name: name.clone(),
                        sequence: parsed.sequence,
                        bare: parsed.bare,
                    }
                })
                .collect();
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| format!("Failed to serialize table list: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_plan(args: PlanArgs) -> Result<(), String> {
    let (path, store) = open_single(&args.inputs)?;
    let current = store
        .list_tables()
        .map_err(|e| format!("Failed to read schema from '{}': {e}", path.display()))?;
    let desired = desired_order(&current, args.order.as_deref())?;

    let planned = plan(&current, &desired).map_err(|e| e.to_string())?;
    let ordered = order_for_execution(&planned).map_err(|e| e.to_string())?;

    match args.format {
        CliOutputFormat::Table => {
            if ordered.is_empty() {
                println!("No renames needed; every table already carries its canonical name.");
                return Ok(());
            }
            for statement in emit(&ordered) {
                println!("{statement}");
            }
        }
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&ordered)
                .map_err(|e| format!("Failed to serialize plan: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), String> {
    let input = single_file(&args.inputs).map_err(|e| e.to_string())?;
    validate_database_filename(&input.to_string_lossy()).map_err(|e| e.to_string())?;

    let image = fs::read(input)
        .map_err(|e| format!("Failed to read '{}': {e}", input.display()))?;
    let store = SqliteStore::open_bytes(&image)
        .map_err(|e| format!("Failed to open database '{}': {e}", input.display()))?;

    let mut session = Reconciler::new();
    session.load(store).map_err(|e| e.to_string())?;

    if args.order.is_some() {
        let desired = desired_order(session.tables(), args.order.as_deref())?;
        session.set_order(desired).map_err(|e| e.to_string())?;
    }
    let rename_count = pending_renames(&session)?;
    let exported = session.export().map_err(|e| e.to_string())?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(export_filename(input.to_str())));
    let same_target = std::path::absolute(&output)
        .and_then(|out| std::path::absolute(input).map(|inp| out == inp))
        .unwrap_or(false);
    if same_target {
        return Err(format!(
            "refusing to overwrite the input database '{}'; pass --output",
            input.display()
        ));
    }
    fs::write(&output, exported)
        .map_err(|e| format!("Failed to write '{}': {e}", output.display()))?;

    println!(
        "Exported {} table(s) to '{}' ({} renamed).",
        session.tables().len(),
        output.display(),
        rename_count
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validates and opens the single input database file in place.
fn open_single(inputs: &[PathBuf]) -> Result<(PathBuf, SqliteStore), String> {
    let path = single_file(inputs).map_err(|e| e.to_string())?;
    validate_database_filename(&path.to_string_lossy()).map_err(|e| e.to_string())?;
    let store = SqliteStore::open_path(path)
        .map_err(|e| format!("Failed to open database '{}': {e}", path.display()))?;
    Ok((path.clone(), store))
}

/// Resolves the `--order` argument against the current table list; with no
/// argument the current order is kept.
fn desired_order(current: &[String], order: Option<&str>) -> Result<Vec<String>, String> {
    match order {
        Some(raw) => {
            let requested = parse_csv_list(raw);
            resolve_order(current, &requested).map_err(|e| e.to_string())
        }
        None => Ok(current.to_vec()),
    }
}

/// Counts the renames the reconciler's current order implies.
fn pending_renames(session: &Reconciler<SqliteStore>) -> Result<usize, String> {
    let current: Vec<String> = {
        let mut sorted = session.tables().to_vec();
        sorted.sort();
        sorted
    };
    let planned = plan(&current, &session.tables().to_vec()).map_err(|e| e.to_string())?;
    Ok(planned.len())
}

fn parse_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_csv_list;

    #[test]
    fn test_parse_csv_list_trims_and_drops_empty() {
        let parsed = parse_csv_list(" Resistors, Capacitors, ,Inductors ");
        assert_eq!(parsed, vec!["Resistors", "Capacitors", "Inductors"]);
    }

    #[test]
    fn test_parse_csv_list_empty_input() {
        assert!(parse_csv_list("").is_empty());
        assert!(parse_csv_list(" , ,").is_empty());
    }
}
