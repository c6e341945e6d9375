use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pd", about = concat!("projdash v", env!("CARGO_PKG_VERSION"), " - project index over a shared folder tree"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different grant file
    #[arg(long, global = true, value_name = "FILE")]
    pub grant_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Grant a root directory for all later commands
    Root(RootArgs),
    /// Scan the granted tree and report what was loaded
    Scan,
    /// List projects in one completion partition
    List(ListArgs),
    /// Free-text search over titles, descriptions, and folder names
    Search(SearchArgs),
    /// Show one project's full record
    Show(ShowArgs),
    /// Set one field on a project and save it
    Set(SetArgs),
    /// Print a project's display path
    Path(PathArgs),
    /// Show projects bucketed by estimated-completion date
    Calendar(CalendarArgs),
    /// Watch the granted tree and rescan on changes
    Watch,
}

// ---------------------------------------------------------------------------
// Grant
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RootArgs {
    /// Directory to grant as the tree root
    pub dir: String,
    /// Prefix prepended to display paths (e.g. a drive-letter base)
    #[arg(long)]
    pub base_path: Option<String>,
    /// Debounce quiet period for saves, in milliseconds
    #[arg(long)]
    pub quiet_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// List the completed partition instead of current projects
    #[arg(long)]
    pub completed: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Text to match (case-insensitive substring)
    pub query: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Project ID (CATEGORY/BUILDING/FOLDER)
    pub id: String,
}

#[derive(Args)]
pub struct PathArgs {
    /// Project ID (CATEGORY/BUILDING/FOLDER)
    pub id: String,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Bucket the completed partition instead of current projects
    #[arg(long)]
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SetArgs {
    /// Project ID (CATEGORY/BUILDING/FOLDER)
    pub id: String,
    /// Field name (e.g. title, status, ecDate, percentComplete)
    pub field: String,
    /// New value; dates accept M/D/YY and are normalized
    pub value: String,
}
