//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "care-collect")]
#[command(version)]
#[command(about = "Clinic patient records and visit log")]
pub struct CliArgs {
    /// Store file (overrides the configured database_path)
    #[arg(long, global = true, env = "CARE_COLLECT_DB")]
    pub db: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Register a new patient
    Add(PatientArgs),
    /// Change a patient's details, keeping ID and visits
    Edit {
        #[arg(value_name = "ID")]
        patient_id: String,
        #[command(flatten)]
        patient: PatientArgs,
    },
    /// Delete a patient
    Delete { id: String },
    /// List every patient
    List,
    /// Filter patients by ID or name
    Search { query: String },
    /// Show one patient and their visits
    Show(LookupArgs),
    /// Record a visit for a patient
    Visit {
        #[command(flatten)]
        lookup: LookupArgs,
        #[command(flatten)]
        vitals: VitalsArgs,
    },
    /// Compute BMI from height (cm) and weight (kg)
    Bmi { height: String, weight: String },
}

/// Patient attributes. Omitted values keep the current ones on edit; blank
/// required values are reported by the store.
#[derive(Args, Debug, Default, PartialEq)]
pub struct PatientArgs {
    /// Patient ID (only used when IDs are assigned manually)
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    #[arg(long)]
    pub sex: Option<String>,
    #[arg(long, conflicts_with_all = ["program", "year"])]
    pub barangay: Option<String>,
    #[arg(long)]
    pub program: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    /// Height in centimetres
    #[arg(long)]
    pub height: Option<String>,
    /// Weight in kilograms
    #[arg(long)]
    pub weight: Option<String>,
    /// Known conditions, comma separated (e.g. "asthma,heart disease")
    #[arg(long = "history", value_delimiter = ',')]
    pub conditions: Vec<String>,
    /// Free-text history entry
    #[arg(long)]
    pub other_history: Option<String>,
}

/// Which patient to resolve.
#[derive(Args, Debug, PartialEq)]
#[group(required = true, multiple = false)]
pub struct LookupArgs {
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug, Default, PartialEq)]
pub struct VitalsArgs {
    /// Blood pressure
    #[arg(long, default_value = "")]
    pub bp: String,
    /// Temperature
    #[arg(long, default_value = "")]
    pub temp: String,
    /// Pulse rate
    #[arg(long, default_value = "")]
    pub pr: String,
    /// Respiratory rate
    #[arg(long, default_value = "")]
    pub rr: String,
    /// Oxygen saturation
    #[arg(long, default_value = "")]
    pub oxygen: String,
    /// Chief complaint
    #[arg(long, default_value = "")]
    pub complaint: String,
}
