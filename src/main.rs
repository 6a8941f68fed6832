//! Violog CLI - Command-line interface for the violation records manager

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use violog::auth::{Authenticator, DEFAULT_ROLE};
use violog::storage::SqliteStore;
use violog::ui;
use violog::validate::ViolationInput;
use violog::violation::{Status, ViolationType};
use violog::{config, violation};

#[derive(Parser)]
#[command(name = "violog")]
#[command(version)]
#[command(about = "Traffic violation records manager")]
#[command(long_about = r#"
Violog keeps traffic violation records in a local SQLite database:
  • Record, update and delete violations
  • Search by plate, violation type, location or officer
  • Filter by status, inspect aggregate statistics
  • Officer accounts with hashed-password login

Example usage:
  violog add --plate ABC123 --vehicle Car --violation Speeding --location "Main St" --officer "Officer Smith"
  violog list --status Pending
  violog search speeding
  violog stats
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (falls back to violog.toml, then violog.db)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a violog.toml config in the current directory
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Record a new violation
    Add {
        /// License plate (stored uppercase)
        #[arg(short, long)]
        plate: String,

        /// Vehicle type (Car, Motorcycle, Truck, Bus, Van, SUV, "Pickup Truck", Bicycle)
        #[arg(short = 'V', long)]
        vehicle: String,

        /// Violation type (Speeding, "Illegal Parking", DUI, ...)
        #[arg(short = 't', long)]
        violation: String,

        /// Where the violation happened
        #[arg(short, long)]
        location: String,

        /// Fine amount; defaults to the violation type's standard fine
        #[arg(short, long)]
        fine: Option<String>,

        /// Recording officer
        #[arg(short, long)]
        officer: String,

        /// Initial status
        #[arg(short, long, default_value = "Pending")]
        status: String,

        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List violations, newest first
    List {
        /// Only show violations with this status
        #[arg(short, long)]
        status: Option<String>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show every field of one violation
    Show {
        /// Violation id
        id: i64,
    },

    /// Search by plate, violation type, location or officer
    Search {
        /// Search term (case-insensitive substring)
        query: String,
    },

    /// Update fields of an existing violation
    Update {
        /// Violation id
        id: i64,

        #[arg(short, long)]
        plate: Option<String>,

        #[arg(short = 'V', long)]
        vehicle: Option<String>,

        #[arg(short = 't', long)]
        violation: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        fine: Option<String>,

        #[arg(short, long)]
        officer: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Change only the status of a violation
    SetStatus {
        /// Violation id
        id: i64,

        /// New status (Pending, Paid, Cancelled, "Under Review")
        status: String,
    },

    /// Delete a violation permanently
    Delete {
        /// Violation id
        id: i64,
    },

    /// Show aggregate statistics
    Stats {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Register an officer account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long, default_value = DEFAULT_ROLE)]
        role: String,
    },

    /// Verify an officer's credentials
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
}

fn resolve_database(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(config) = config::load_config(None)? {
        if let Some(database) = config.database {
            return Ok(PathBuf::from(database));
        }
    }
    Ok(config::default_database_path())
}

fn open_store(flag: Option<PathBuf>) -> anyhow::Result<SqliteStore> {
    let db_path = resolve_database(flag)?;
    config::ensure_db_dir(&db_path)?;
    tracing::debug!("Opening database at {:?}", db_path);
    Ok(SqliteStore::open(&db_path)?)
}

fn print_violation(v: &violation::Violation) {
    ui::section(&format!("Violation #{}", v.id));
    ui::info("Plate", &v.plate_number);
    ui::info("Vehicle", v.vehicle_type.as_str());
    ui::info("Violation", v.violation_type.as_str());
    ui::info("Location", &v.location);
    ui::info("Fine", &format!("${:.2}", v.fine_amount));
    ui::info("Date", &v.date_time);
    ui::info("Officer", &v.officer_name);
    ui::info("Status", v.status.as_str());
    if !v.notes.is_empty() {
        ui::info("Notes", &v.notes);
    }
    println!("{}", ui::dim(&format!("created {} / updated {}", v.created_at, v.updated_at)));
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { force } => {
            let path = config::default_config_path();
            let defaults = config::ViologConfig {
                database: Some(config::default_database_path().display().to_string()),
            };
            config::write_config(&path, &defaults, force)?;
            ui::success(&format!("Config written to {}", path.display()));
        }

        Commands::Add {
            plate,
            vehicle,
            violation,
            location,
            fine,
            officer,
            status,
            notes,
        } => {
            let fine = match fine {
                Some(fine) => fine,
                None => {
                    let violation_type: ViolationType = violation.parse()?;
                    format!("{:.2}", violation_type.default_fine())
                }
            };

            let input = ViolationInput::parse(
                &plate, &vehicle, &violation, &location, &fine, &officer, &status, &notes,
            )?;

            let store = open_store(cli.database)?;
            let id = store.create_violation(&input)?;
            tracing::info!(id, plate = %input.plate_number, "violation created");
            ui::success(&format!("Violation recorded with ID {}", id));
        }

        Commands::List { status, format } => {
            let store = open_store(cli.database)?;
            let violations = match status {
                Some(status) => {
                    let status: Status = status.parse()?;
                    store.get_by_status(status)?
                }
                None => store.get_all()?,
            };

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&violations)?);
            } else if violations.is_empty() {
                println!("{}", ui::dim("No violation records."));
            } else {
                println!("{}", ui::violations_table(&violations));
                println!("{}", ui::dim(&format!("{} record(s)", violations.len())));
            }
        }

        Commands::Show { id } => {
            let store = open_store(cli.database)?;
            match store.get_by_id(id)? {
                Some(violation) => print_violation(&violation),
                None => ui::warn(&format!("No violation found with ID {}", id)),
            }
        }

        Commands::Search { query } => {
            let store = open_store(cli.database)?;
            println!("{} Searching for '{}'...", ui::Icons::SEARCH, query);
            let results = store.search(&query)?;

            if results.is_empty() {
                ui::warn(&format!("No violations matching '{}'", query));
            } else {
                println!("{}", ui::violations_table(&results));
                println!("{}", ui::dim(&format!("{} match(es)", results.len())));
            }
        }

        Commands::Update {
            id,
            plate,
            vehicle,
            violation,
            location,
            fine,
            officer,
            status,
            notes,
        } => {
            let store = open_store(cli.database)?;
            let Some(existing) = store.get_by_id(id)? else {
                ui::warn(&format!("No violation found with ID {}", id));
                return Ok(());
            };

            // Fields not supplied keep their current value
            let input = ViolationInput::parse(
                plate.as_deref().unwrap_or(&existing.plate_number),
                vehicle.as_deref().unwrap_or(existing.vehicle_type.as_str()),
                violation.as_deref().unwrap_or(existing.violation_type.as_str()),
                location.as_deref().unwrap_or(&existing.location),
                &fine.unwrap_or_else(|| format!("{:.2}", existing.fine_amount)),
                officer.as_deref().unwrap_or(&existing.officer_name),
                status.as_deref().unwrap_or(existing.status.as_str()),
                notes.as_deref().unwrap_or(&existing.notes),
            )?;

            if store.update_violation(id, &input)? {
                tracing::info!(id, "violation updated");
                ui::success(&format!("Violation {} updated", id));
            } else {
                ui::warn(&format!("No violation found with ID {}", id));
            }
        }

        Commands::SetStatus { id, status } => {
            let status: Status = status.parse()?;
            let store = open_store(cli.database)?;

            if store.update_status(id, status)? {
                ui::success(&format!("Violation {} marked {}", id, status));
            } else {
                ui::warn(&format!("No violation found with ID {}", id));
            }
        }

        Commands::Delete { id } => {
            let store = open_store(cli.database)?;

            if store.delete_violation(id)? {
                tracing::info!(id, "violation deleted");
                ui::success(&format!("Violation {} deleted", id));
            } else {
                ui::warn(&format!("No violation found with ID {}", id));
            }
        }

        Commands::Stats { format } => {
            let store = open_store(cli.database)?;
            let stats = store.statistics()?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                ui::banner("Violation Statistics", "");
                let mut rows = vec![
                    ("Total", stats.total.to_string()),
                    ("Pending", stats.pending.to_string()),
                    ("Paid", stats.paid.to_string()),
                    ("Cancelled", stats.cancelled.to_string()),
                    ("Under Review", stats.under_review.to_string()),
                    ("Revenue (paid)", format!("${:.2}", stats.revenue)),
                ];
                for (label, count) in &stats.top_violation_types {
                    rows.push(("Top violation", format!("{} ({})", label, count)));
                }
                for (plate, count) in &stats.top_plates {
                    rows.push(("Top plate", format!("{} ({})", plate, count)));
                }
                println!("{}", ui::stats_table(&rows));
            }
        }

        Commands::Register {
            username,
            email,
            password,
            role,
        } => {
            let store = open_store(cli.database)?;
            let auth = Authenticator::new(&store);
            let id = auth.register(&username, &email, &password, &role)?;
            ui::success(&format!("Account '{}' created (ID {})", username, id));
        }

        Commands::Login { username, password } => {
            let store = open_store(cli.database)?;
            let auth = Authenticator::new(&store);
            let user = auth.login(&username, &password)?;
            ui::success(&format!("Welcome, {}!", user.username));
            ui::info("Role", &user.role);
        }
    }

    Ok(())
}
