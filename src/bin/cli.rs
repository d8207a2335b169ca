//! DrConnect CLI
//!
//! Command-line interface for the patient intake flow:
//! - Sign up or log in against the account service
//! - Fill in the patient-details form
//! - Show the dashboard for the signed-in user
//! - Inspect doctors and stored profiles

use anyhow::Context;
use clap::{Parser, Subcommand};
use drconnect::auth::{AuthClient, AuthMode, Credentials, Session};
use drconnect::config::{generate_default_config, Config};
use drconnect::doctors::DOCTORS;
use drconnect::intake::{DashboardView, IntakeForm, IntakeService};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drconnect")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "DrConnect patient intake")]
#[command(long_about = "DrConnect patient intake.\nSign up, complete your patient profile, choose a doctor and review your details.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage directory, overrides the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup {
        /// Full name, e.g. "Jane Doe"
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// At least 6 characters
        #[arg(long)]
        password: String,
    },

    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Complete the patient profile
    Intake {
        /// Email to save under (default: signed-in user)
        #[arg(long)]
        email: Option<String>,
        /// Full name from sign-up, used for missing first/last names
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        age: String,
        /// Male, Female or Other
        #[arg(long, default_value = "")]
        gender: String,
        #[arg(long, default_value = "")]
        contact_number: String,
        #[arg(long, default_value = "")]
        symptoms: String,
        /// Doctor id (see `drconnect doctors`)
        #[arg(long, default_value = "")]
        doctor: String,
    },

    /// Show the dashboard
    Dashboard {
        /// Email to show (default: signed-in user)
        #[arg(long)]
        email: Option<String>,
    },

    /// List the doctors a patient can choose
    Doctors,

    /// List emails with a stored profile
    Profiles,

    /// Show the signed-in user
    Whoami,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.to_string_lossy().to_string();
    }

    drconnect::logging::init(&config.logging, "");

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let credentials = Credentials::signup(name.clone(), email, password);
            authenticate(&config, AuthMode::Signup, &credentials).await?;

            println!();
            println!("Next, complete your profile:");
            println!(
                "  drconnect intake --full-name {:?} --age <age> --gender <Male|Female|Other> --symptoms <text> --doctor <id>",
                name
            );
        }

        Commands::Login { email, password } => {
            let credentials = Credentials::login(email, password);
            authenticate(&config, AuthMode::Login, &credentials).await?;
        }

        Commands::Intake {
            email,
            full_name,
            first_name,
            last_name,
            age,
            gender,
            contact_number,
            symptoms,
            doctor,
        } => {
            let intake = intake_service(&config)?;

            let mut form = IntakeForm {
                first_name,
                last_name,
                age,
                gender,
                contact_number,
                symptoms,
                doctor_id: doctor,
            };
            if let Some(full_name) = full_name.as_deref() {
                form = form.with_default_names(full_name);
            }

            let outcome = match intake.submit(&form, email.as_deref()) {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };

            if !outcome.saved {
                eprintln!("Warning: your profile could not be stored on this device.");
            }

            let email = (!outcome.dashboard_email.is_empty()).then_some(outcome.dashboard_email.as_str());
            print_dashboard(&intake.dashboard(email), &cli.format)?;
        }

        Commands::Dashboard { email } => {
            let intake = intake_service(&config)?;
            print_dashboard(&intake.dashboard(email.as_deref()), &cli.format)?;
        }

        Commands::Doctors => {
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&DOCTORS)?);
            } else {
                println!("{:<6} {:<20} {}", "ID", "Name", "Specialty");
                println!("{}", "-".repeat(40));
                for doctor in DOCTORS.iter() {
                    println!("{:<6} {:<20} {}", doctor.id, doctor.name, doctor.specialty);
                }
            }
        }

        Commands::Profiles => {
            let store = config.storage.open_store()?;
            let keys = store.list_profile_keys()?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&keys)?);
            } else if keys.is_empty() {
                println!("No profiles stored yet.");
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }

        Commands::Whoami => {
            let store = config.storage.open_store()?;
            match store.current_user() {
                Some(email) => println!("{}", email),
                None => {
                    println!("Not signed in.");
                    println!();
                    println!("Sign in with:");
                    println!("  drconnect login --email <email> --password <password>");
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

fn intake_service(config: &Config) -> anyhow::Result<IntakeService> {
    let store = config
        .storage
        .open_store()
        .context("failed to open storage area")?;
    Ok(IntakeService::new(store).allow_anonymous(config.intake.allow_anonymous))
}

/// Sign in or up, printing the service's message; exits on failure
async fn authenticate(
    config: &Config,
    mode: AuthMode,
    credentials: &Credentials,
) -> anyhow::Result<()> {
    let store = config
        .storage
        .open_store()
        .context("failed to open storage area")?;
    let client = AuthClient::new(config.auth.client_config())?;
    let session = Session::new(client, store);

    match session.submit(mode, credentials).await {
        Ok(notice) => {
            println!("{}", notice.message);
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, "{} failed", mode.title());
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn print_dashboard(view: &DashboardView, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        let body = serde_json::json!({
            "displayName": view.display_name(),
            "profile": view.profile(),
            "prompt": view.prompt(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("Welcome, {}", view.display_name());
    println!();

    match view.prompt() {
        None => {
            println!("Your details");
            println!("{}", "-".repeat(40));
            for (label, value) in view.details() {
                println!("{:<12} {}", format!("{}:", label), value);
            }
        }
        Some(prompt) => {
            println!("{}", prompt);
            println!();
            println!("Complete your profile with:");
            println!("  drconnect intake --first-name <name> --last-name <name> --age <age> --gender <Male|Female|Other> --symptoms <text> --doctor <id>");
        }
    }

    Ok(())
}
