use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for kinematic
#[derive(Parser)]
#[command(
    name = "kinematic",
    version = env!("CARGO_PKG_VERSION"),
    about = "Field-workforce backend: geofenced attendance, stock review, SOS, quizzes, grievances and leaderboards over SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Bearer credential of the caller
    #[arg(global = true, long = "token", env = "KINEMATIC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Pin the clock (RFC 3339), for reproducible runs
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    /// Override the object storage directory
    #[arg(global = true, long = "storage", hide = true)]
    pub storage: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Operator provisioning: organisations, zones, users, scores
    Provision {
        #[command(subcommand)]
        action: ProvisionCmd,
    },

    /// The caller's identity
    Auth {
        #[command(subcommand)]
        action: AuthCmd,
    },

    /// Geofenced check-in, breaks and check-out
    Attendance {
        #[command(subcommand)]
        action: AttendanceCmd,
    },

    /// Stock allocations and item review
    Stock {
        #[command(subcommand)]
        action: StockCmd,
    },

    /// Period leaderboards
    Leaderboard {
        #[command(subcommand)]
        action: LeaderboardCmd,
    },

    /// Emergency alerts
    Sos {
        #[command(subcommand)]
        action: SosCmd,
    },

    /// Grievance reporting and review
    Grievance {
        #[command(subcommand)]
        action: GrievanceCmd,
    },

    /// Broadcast quiz questions
    Broadcast {
        #[command(subcommand)]
        action: BroadcastCmd,
    },

    /// Learning materials and progress
    Learning {
        #[command(subcommand)]
        action: LearningCmd,
    },

    /// In-app notifications
    Notify {
        #[command(subcommand)]
        action: NotifyCmd,
    },

    /// Dynamic form templates and submissions
    Forms {
        #[command(subcommand)]
        action: FormsCmd,
    },

    /// Supervisor field visits
    Visits {
        #[command(subcommand)]
        action: VisitsCmd,
    },

    /// Management dashboard figures (supervisor+)
    Analytics {
        #[command(subcommand)]
        action: AnalyticsCmd,
    },

    /// User administration within the caller's organisation
    Users {
        #[command(subcommand)]
        action: UsersCmd,
    },

    /// Zones of the caller's organisation
    Zones {
        #[command(subcommand)]
        action: ZonesCmd,
    },

    /// Store a file and get back its URL
    Upload {
        #[arg(long, help = "selfie, form_photo, material or avatar")]
        kind: String,

        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ProvisionCmd {
    /// Create an organisation
    Org {
        #[arg(long)]
        name: String,
    },

    /// Create a zone with its meeting point and geofence
    Zone {
        #[arg(long)]
        org: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long)]
        address: Option<String>,
        #[arg(long, default_value_t = 100, help = "Geofence radius in metres")]
        radius: i64,
    },

    /// Create a user and its bearer credential
    User {
        #[arg(long)]
        org: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        mobile: String,
        #[arg(long = "employee-id")]
        employee_id: Option<String>,
        #[arg(long, default_value = "executive")]
        role: String,
        #[arg(long)]
        zone: Option<i64>,
        #[arg(long)]
        supervisor: Option<i64>,
        #[arg(long, help = "Use this credential instead of a generated one")]
        credential: Option<String>,
        #[arg(long, help = "Create the account deactivated")]
        inactive: bool,
    },

    /// Deactivate a user
    Deactivate {
        #[arg(long)]
        user: i64,
    },

    /// Reactivate a user
    Activate {
        #[arg(long)]
        user: i64,
    },

    /// Record a leaderboard score
    Score {
        #[arg(long)]
        user: i64,
        #[arg(long, default_value = "weekly")]
        period: String,
        #[arg(long)]
        score: f64,
        #[arg(long, help = "Date or instant inside the period (default: now)")]
        on: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AuthCmd {
    /// The caller's profile with its default zone
    Me,
    /// Revoke the presented credential
    Logout,
}

#[derive(Subcommand)]
pub enum AttendanceCmd {
    /// Check in for today
    Checkin {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, help = "Zone id (default: the user's zone)")]
        zone: Option<i64>,
        #[arg(long, value_name = "FILE", conflicts_with = "selfie_url")]
        selfie: Option<PathBuf>,
        #[arg(long = "selfie-url")]
        selfie_url: Option<String>,
        #[arg(long)]
        activity: Option<String>,
    },

    /// Check out for today
    Checkout {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, value_name = "FILE", conflicts_with = "selfie_url")]
        selfie: Option<PathBuf>,
        #[arg(long = "selfie-url")]
        selfie_url: Option<String>,
    },

    /// Start a break
    BreakStart,

    /// End the open break
    BreakEnd,

    /// Today's record
    Today,

    /// Own records, newest first
    History {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Today's team attendance (supervisor+)
    Team {
        #[arg(long)]
        zone: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum StockCmd {
    /// Allocate stock to a user (admin+)
    Allocate {
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },

    /// Accept or reject an allocated item
    Review {
        #[arg(long)]
        item: i64,
        #[arg(long, help = "accepted, rejected or partially_accepted")]
        status: String,
        #[arg(long = "qty-accepted")]
        quantity_accepted: Option<i64>,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Own allocation for a date
    My {
        #[arg(long, help = "YYYY-MM-DD (default: today)")]
        date: Option<String>,
    },

    /// Team allocations for a date (supervisor+)
    Team {
        #[arg(long, help = "YYYY-MM-DD (default: today)")]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LeaderboardCmd {
    /// Ranked scores for the current period
    Show {
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        zone: Option<i64>,
    },

    /// The caller's own score
    Me {
        #[arg(long)]
        period: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SosCmd {
    /// Raise an alert
    Trigger {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },

    /// Acknowledge an active alert (supervisor+)
    Ack { id: i64 },

    /// Resolve an alert (supervisor+)
    Resolve {
        id: i64,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Organisation alerts (supervisor+)
    List {
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum GrievanceCmd {
    /// Report a grievance
    Submit {
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: String,
        #[arg(long = "against-role")]
        against_role: Option<String>,
        #[arg(long = "incident-date")]
        incident_date: Option<String>,
        #[arg(long = "evidence", help = "Evidence URL (repeatable)")]
        evidence: Vec<String>,
        #[arg(long)]
        anonymous: bool,
    },

    /// Own grievances
    Mine,

    /// Organisation grievances (admin+)
    All {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Review a grievance (admin+)
    Update {
        id: i64,
        #[arg(long)]
        status: String,
        #[arg(long)]
        resolution: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BroadcastCmd {
    /// Active questions for the caller's role
    List,

    /// Publish a question (admin+)
    Create {
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },

    /// Answer a question
    Answer {
        id: i64,
        #[arg(long, help = "Zero-based option index")]
        option: i64,
    },

    /// Answers and per-option tally (admin+)
    Results { id: i64 },

    /// Stop accepting answers (admin+)
    Close { id: i64 },
}

#[derive(Subcommand)]
pub enum LearningCmd {
    /// Materials for the caller's role
    List,

    /// Publish a material (admin+)
    Create {
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },

    /// Record progress on a material
    Progress {
        id: i64,
        #[arg(long)]
        pct: i64,
        #[arg(long)]
        completed: bool,
    },
}

#[derive(Subcommand)]
pub enum NotifyCmd {
    /// Own notifications, newest first
    List {
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Mark one notification read
    Read { id: i64 },

    /// Mark every notification read
    ReadAll,

    /// Store the device push token
    PushToken {
        #[arg(value_name = "PUSH_TOKEN")]
        push_token: String,
    },
}

#[derive(Subcommand)]
pub enum FormsCmd {
    /// Active templates
    Templates {
        #[arg(long)]
        activity: Option<String>,
    },

    /// One template with its fields
    Template { id: i64 },

    /// Create a template (admin+)
    CreateTemplate {
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },

    /// Append a field to a template (admin+)
    AddField {
        template: i64,
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },

    /// Submit a filled form
    Submit {
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },

    /// Own submissions
    Submissions {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// One submission with its responses
    Submission { id: i64 },

    /// Organisation submissions (supervisor+)
    All {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        user: Option<i64>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum VisitsCmd {
    /// Record a visit to an executive (supervisor+)
    Log {
        #[arg(long)]
        executive: i64,
        #[arg(long, default_value = "good", help = "excellent, good, average or poor")]
        rating: String,
        #[arg(long)]
        remarks: Option<String>,
        #[arg(long = "photo-url")]
        photo_url: Option<String>,
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
    },

    /// Visits about the caller
    Mine {
        #[arg(long, help = "YYYY-MM-DD (default: every day)")]
        date: Option<String>,
    },

    /// Team visits for a date (supervisor+)
    Team {
        #[arg(long, help = "YYYY-MM-DD (default: today)")]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AnalyticsCmd {
    /// Daily KPIs
    Summary {
        #[arg(long, help = "YYYY-MM-DD (default: today)")]
        date: Option<String>,
    },

    /// Latest check-ins, submissions and alerts
    Feed {
        #[arg(long, help = "Default 20, at most 50")]
        limit: Option<u32>,
    },

    /// Engagements and conversions by hour (UTC)
    Hourly {
        #[arg(long, help = "YYYY-MM-DD (default: today)")]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UsersCmd {
    /// Organisation users by name (supervisor+)
    List {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        zone: Option<i64>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Create a user in the caller's organisation (city_manager+)
    Create {
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },

    /// Edit a user's profile (city_manager+)
    Update {
        id: i64,
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },
}

#[derive(Subcommand)]
pub enum ZonesCmd {
    /// Active zones by name
    List,

    /// Create a zone (admin+)
    Create {
        #[arg(long, value_name = "JSON|@FILE")]
        body: String,
    },
}
