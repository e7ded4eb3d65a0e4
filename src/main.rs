use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tuition_ledger::audit::AuditLogger;
use tuition_ledger::cli::{
    handle_audit_command, handle_courses_command, handle_ledger_command,
    handle_obligations_command, handle_outstanding_command, handle_pay_command,
    handle_teachers_command, AuditArgs, LedgerArgs, ObligationsArgs, PayArgs,
};
use tuition_ledger::config::{paths::LedgerPaths, settings::Settings};
use tuition_ledger::storage::{
    initialize_storage, json_file_health, needs_initialization, JsonStore,
};

#[derive(Parser)]
#[command(
    name = "tuition",
    version,
    about = "Tuition billing reconciliation from the command line",
    long_about = "Tuition Ledger derives each student's monthly obligations from \
                  enrollments and course fees, reconciles them against recorded \
                  payments, and keeps a combined ledger of student payments and \
                  teacher payouts."
)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a student's monthly obligations
    #[command(alias = "due")]
    Obligations(ObligationsArgs),

    /// List students with an outstanding balance
    Outstanding,

    /// Show the merged money-in / money-out ledger
    Ledger(LedgerArgs),

    /// Show each teacher's earned share against payouts
    Teachers,

    /// Mark an obligation as paid
    Pay(PayArgs),

    /// List courses offered for a student's grade
    Courses {
        /// Student ID
        student: String,
    },

    /// Show recent payment submissions
    Audit(AuditArgs),

    /// Create the data directory and empty collections
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "tuition_ledger=debug"
    } else {
        "tuition_ledger=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let store = JsonStore::new(paths.clone(), &settings)?;
    let audit = AuditLogger::new(paths.audit_log());

    match cli.command {
        Some(Commands::Obligations(args)) => {
            handle_obligations_command(&store, &settings, args)?;
        }
        Some(Commands::Outstanding) => {
            handle_outstanding_command(&store, &settings)?;
        }
        Some(Commands::Ledger(args)) => {
            handle_ledger_command(&store, &settings, args)?;
        }
        Some(Commands::Teachers) => {
            handle_teachers_command(&store, &settings)?;
        }
        Some(Commands::Pay(args)) => {
            handle_pay_command(&store, &audit, &settings, args)?;
        }
        Some(Commands::Courses { student }) => {
            handle_courses_command(&store, &settings, student)?;
        }
        Some(Commands::Audit(args)) => {
            handle_audit_command(&audit, args)?;
        }
        Some(Commands::Init) => {
            println!("Initializing Tuition Ledger at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths, &settings)?;
            if created.is_empty() {
                println!("All collections already exist; nothing was overwritten.");
            } else {
                println!("Created collections: {}", created.join(", "));
            }
            println!();
            println!("Add records to the files in {}", paths.data_dir().display());
            println!("Run 'tuition outstanding' to see balances.");
        }
        Some(Commands::Config) => {
            let paths = store.paths();
            println!("Tuition Ledger Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            if audit.exists() {
                println!(
                    "Audit log:        {} ({} entries)",
                    audit.path().display(),
                    audit.entry_count()?
                );
            } else {
                println!("Audit log:        {} (empty)", audit.path().display());
            }
            println!();
            println!("Collections:");
            for (name, file) in paths.collection_files() {
                println!("  {:10} {}", name, json_file_health(&file));
            }
            println!();
            println!("Settings:");
            println!("  Currency symbol:           {}", settings.currency_symbol);
            println!("  Date format:               {}", settings.date_format);
            println!("  Poll interval:             {}s", settings.poll_interval().as_secs());
            println!(
                "  Reject duplicate payments: {}",
                store.rejects_duplicates()
            );
        }
        None => {
            println!("Tuition Ledger - billing reconciliation for tuition centers");
            println!();
            println!("Run 'tuition --help' for usage information.");
            if needs_initialization(&paths) {
                println!("Run 'tuition init' to set up a data directory.");
            }
        }
    }

    Ok(())
}
