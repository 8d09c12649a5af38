//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use waitlist_core::{Role, Specialty, TimeSlot};

#[derive(Parser)]
#[command(
    name = "waitlist",
    version,
    about = "Rehabilitation clinic waitlist",
    long_about = "Register patients waiting for treatment, grant treatment slots,\n\
                  and export the waiting and served lists as CSV or a two-sheet spreadsheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: platform config dir, waitlist.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Override the directory holding the waitlist files.
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// User to act as.
    #[arg(long, short = 'u', env = "WAITLIST_USER", default_value = "admin", global = true)]
    pub user: String,

    /// Password of the acting user.
    #[arg(long, env = "WAITLIST_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Log level.
    #[arg(long = "log-level", value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevelArg,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a patient on the waitlist.
    Add(AddArgs),

    /// Show the waiting (or served) patients.
    List(ListArgs),

    /// Grant a treatment slot to a waiting patient.
    Grant(GrantArgs),

    /// Look up patients by name.
    Find(FindArgs),

    /// Export both lists as a spreadsheet, or one list as CSV.
    Export(ExportArgs),

    /// Show who registered each patient and when.
    History,

    /// Manage user accounts.
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Args)]
pub struct AddArgs {
    /// Patient name.
    #[arg(long)]
    pub name: String,

    /// Health plan membership card number.
    #[arg(long = "membership-id", default_value = "")]
    pub membership_id: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    /// Date of first contact, YYYY-MM-DD (default: today).
    #[arg(long = "first-contact", value_name = "DATE")]
    pub first_contact: Option<NaiveDate>,

    #[arg(long, value_enum)]
    pub specialty: SpecialtyArg,

    /// Preferred shift.
    #[arg(long = "time-slot", value_enum, default_value = "any")]
    pub time_slot: TimeSlotArg,

    /// Professional the patient asked for, if any.
    #[arg(long = "preferred-professional", value_name = "NAME")]
    pub preferred_professional: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// List served patients instead of waiting ones.
    #[arg(long)]
    pub served: bool,

    /// Compute days waited as of this date (default: today).
    #[arg(long = "as-of", value_name = "DATE")]
    pub as_of: Option<NaiveDate>,
}

#[derive(Args)]
pub struct GrantArgs {
    /// Row number as shown by `waitlist list`.
    #[arg(value_name = "ROW")]
    pub row: usize,

    /// Professional responsible for the treatment.
    #[arg(long)]
    pub professional: String,

    /// Session time, e.g. "Seg/Qua 08:00".
    #[arg(long = "time-slot")]
    pub time_slot: String,

    /// First session date, YYYY-MM-DD.
    #[arg(long = "start-date", value_name = "DATE")]
    pub start_date: NaiveDate,
}

#[derive(Args)]
pub struct FindArgs {
    pub query: String,

    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output path (default: export_file from the config).
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write a single CSV instead of the spreadsheet.
    #[arg(long)]
    pub csv: bool,

    /// With --csv, export the served list instead of the waiting one.
    #[arg(long, requires = "csv")]
    pub served: bool,
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List users and roles.
    List,

    /// Create a user.
    Add {
        username: String,
        #[arg(long = "new-password")]
        new_password: String,
        #[arg(long, value_enum, default_value = "standard")]
        role: RoleArg,
    },

    /// Delete a user.
    Remove { username: String },

    /// Change a user's role.
    Role {
        username: String,
        #[arg(value_enum)]
        role: RoleArg,
    },

    /// Change your own password.
    Passwd {
        #[arg(long = "new-password")]
        new_password: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SpecialtyArg {
    Orthopedic,
    Neurofunctional,
    Urogynecological,
    PosturalReeducation,
    Temporomandibular,
    Acupuncture,
    SpeechTherapy,
    Psychology,
    OccupationalTherapy,
}

impl From<SpecialtyArg> for Specialty {
    fn from(arg: SpecialtyArg) -> Self {
        match arg {
            SpecialtyArg::Orthopedic => Specialty::OrthopedicPhysiotherapy,
            SpecialtyArg::Neurofunctional => Specialty::NeurofunctionalPhysiotherapy,
            SpecialtyArg::Urogynecological => Specialty::UrogynecologicalPhysiotherapy,
            SpecialtyArg::PosturalReeducation => Specialty::GlobalPosturalReeducation,
            SpecialtyArg::Temporomandibular => Specialty::TemporomandibularDysfunction,
            SpecialtyArg::Acupuncture => Specialty::Acupuncture,
            SpecialtyArg::SpeechTherapy => Specialty::SpeechTherapy,
            SpecialtyArg::Psychology => Specialty::Psychology,
            SpecialtyArg::OccupationalTherapy => Specialty::OccupationalTherapy,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TimeSlotArg {
    Morning,
    Afternoon,
    Any,
}

impl From<TimeSlotArg> for TimeSlot {
    fn from(arg: TimeSlotArg) -> Self {
        match arg {
            TimeSlotArg::Morning => TimeSlot::Morning,
            TimeSlotArg::Afternoon => TimeSlot::Afternoon,
            TimeSlotArg::Any => TimeSlot::NoPreference,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RoleArg {
    Administrator,
    Standard,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Administrator => Role::Administrator,
            RoleArg::Standard => Role::Standard,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
