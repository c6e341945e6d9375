use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::capability::{Access, FsCapability, FsError};
use crate::io::grant::{self, Grant};
use crate::io::realfs::RealFs;
use crate::io::resolve::display_path;
use crate::io::watcher::TreeWatcher;
use crate::io::writer::{DEFAULT_QUIET, SaveScheduler, flush_due};
use crate::model::{Filter, Session};
use crate::ops::{calendar, edit, scan, search};

/// Status line shown while a scan is running.
const SCANNING: &str = "Scanning project folders...";
/// Status line when no root has been granted yet.
const NO_FOLDER: &str = "No folder selected.";
/// Status line when the granted root cannot be opened read/write.
const PERMISSION_DENIED: &str = "Read/write permission denied.";

/// Interval between watcher polls.
const WATCH_TICK: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let grant_file = cli
        .grant_file
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(grant::grant_path);

    match cli.command {
        // Grant management (doesn't require an existing grant)
        Commands::Root(args) => cmd_root(args, &grant_file),

        // Read commands
        Commands::Scan => cmd_scan(&grant_file, json),
        Commands::List(args) => cmd_list(args, &grant_file, json),
        Commands::Search(args) => cmd_search(args, &grant_file, json),
        Commands::Show(args) => cmd_show(args, &grant_file, json),
        Commands::Path(args) => cmd_path(args, &grant_file),
        Commands::Calendar(args) => cmd_calendar(args, &grant_file, json),

        // Write commands
        Commands::Set(args) => cmd_set(args, &grant_file),

        // Long-running
        Commands::Watch => cmd_watch(&grant_file),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the granted root read/write. The two failure modes map to the fixed
/// status lines the host shows for an absent or unusable grant.
fn open_fs(grant: &Grant) -> Result<RealFs, Box<dyn std::error::Error>> {
    let root = grant.root.as_deref().ok_or(NO_FOLDER)?;
    let fs = RealFs::new(Path::new(root));
    fs.request_access(Access::ReadWrite).map_err(|e| match e {
        FsError::PermissionDenied(_) => PERMISSION_DENIED.to_string(),
        other => other.to_string(),
    })?;
    Ok(fs)
}

fn load_session(fs: &RealFs) -> (Session, String) {
    let outcome = scan::scan(fs);
    let status = outcome.status;
    let mut session = Session::new();
    session.replace_records(outcome.records);
    (session, status)
}

fn quiet_period(grant: &Grant) -> Duration {
    grant
        .quiet_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_QUIET)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_root(args: RootArgs, grant_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::fs::canonicalize(&args.dir)
        .map_err(|e| format!("cannot resolve path '{}': {}", args.dir, e))?;

    // Verify the grant is usable before persisting it
    let fs = RealFs::new(&dir);
    fs.request_access(Access::ReadWrite).map_err(|e| match e {
        FsError::PermissionDenied(_) => PERMISSION_DENIED.to_string(),
        other => other.to_string(),
    })?;

    let mut grant = grant::read_grant_from(grant_file);
    grant.root = Some(dir.to_string_lossy().into_owned());
    if args.base_path.is_some() {
        grant.base_path = args.base_path;
    }
    if args.quiet_ms.is_some() {
        grant.quiet_ms = args.quiet_ms;
    }
    grant::write_grant_to(grant_file, &grant)?;
    println!("Granted root: {}", dir.display());
    Ok(())
}

fn cmd_scan(grant_file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let grant = grant::read_grant_from(grant_file);
    let fs = open_fs(&grant)?;
    if !json {
        eprintln!("{}", SCANNING);
    }
    let (session, status) = load_session(&fs);

    if json {
        return print_json(&ScanJson {
            status,
            count: session.records().len(),
        });
    }
    println!("{}", status);
    Ok(())
}

fn cmd_list(args: ListArgs, grant_file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let grant = grant::read_grant_from(grant_file);
    let fs = open_fs(&grant)?;
    let (mut session, _) = load_session(&fs);
    session.set_filter(if args.completed {
        Filter::Completed
    } else {
        Filter::Current
    });

    let indices = session.filtered_indices();
    if json {
        let records: Vec<RecordJson> = indices
            .iter()
            .filter_map(|&i| session.record(i))
            .map(|r| record_to_json(r, false))
            .collect();
        return print_json(&records);
    }
    for i in indices {
        if let Some(record) = session.record(i) {
            println!("{}", format_record_line(record));
        }
    }
    Ok(())
}

fn cmd_search(
    args: SearchArgs,
    grant_file: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let grant = grant::read_grant_from(grant_file);
    let fs = open_fs(&grant)?;
    let (session, _) = load_session(&fs);

    let Some(matches) = search::search_records(session.records(), &args.query) else {
        return Err("empty search query".into());
    };

    if json {
        return print_json(&SearchJson {
            query: args.query,
            total: matches.len(),
            matches: matches
                .iter()
                .filter_map(|&i| session.record(i))
                .map(|r| record_to_json(r, false))
                .collect(),
        });
    }

    for &i in matches.iter().take(SEARCH_DISPLAY_LIMIT) {
        if let Some(record) = session.record(i) {
            println!("{}", format_record_line(record));
        }
    }
    if matches.len() > SEARCH_DISPLAY_LIMIT {
        println!("Showing {} of {} matches.", SEARCH_DISPLAY_LIMIT, matches.len());
    } else if matches.is_empty() {
        println!("No matches.");
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, grant_file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let grant = grant::read_grant_from(grant_file);
    let fs = open_fs(&grant)?;
    let (session, _) = load_session(&fs);

    let index = session
        .find(&args.id)
        .ok_or_else(|| format!("no such project: {}", args.id))?;
    let record = session
        .record(index)
        .ok_or_else(|| format!("no such project: {}", args.id))?;

    if json {
        return print_json(&record_to_json(record, true));
    }
    for line in format_record_detail(record) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_path(args: PathArgs, grant_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let grant = grant::read_grant_from(grant_file);
    let fs = open_fs(&grant)?;
    let (mut session, _) = load_session(&fs);

    let index = session
        .find(&args.id)
        .ok_or_else(|| format!("no such project: {}", args.id))?;
    let Some(record) = session.record_mut(index) else {
        return Err(format!("no such project: {}", args.id).into());
    };
    println!("{}", display_path(&fs, record, grant.base_path.as_deref()));
    Ok(())
}

fn cmd_calendar(
    args: CalendarArgs,
    grant_file: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let grant = grant::read_grant_from(grant_file);
    let fs = open_fs(&grant)?;
    let (session, _) = load_session(&fs);

    let Some(index) = calendar::calendar_index(session.records(), args.completed) else {
        if json {
            return print_json(&CalendarJson {
                months: Vec::new(),
                days: Vec::new(),
            });
        }
        println!("No dated projects.");
        return Ok(());
    };

    if json {
        return print_json(&calendar_to_json(&index, session.records()));
    }
    for line in format_calendar(&index, session.records()) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_set(args: SetArgs, grant_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let grant = grant::read_grant_from(grant_file);
    let fs = open_fs(&grant)?;
    let (mut session, _) = load_session(&fs);

    let mut sched = SaveScheduler::new(quiet_period(&grant));
    edit::set_field(&mut session, &mut sched, &args.id, &args.field, &args.value)?;

    // One-shot host: flush as if the quiet period had elapsed
    let deadline = Instant::now() + sched.quiet();
    let statuses = flush_due(&mut sched, &mut session, &fs, deadline);
    if let Some(status) = statuses.first() {
        return Err(status.clone().into());
    }
    println!("Saved {}.", args.id);
    Ok(())
}

fn cmd_watch(grant_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let grant = grant::read_grant_from(grant_file);
    let fs = open_fs(&grant)?;
    let (_, status) = load_session(&fs);
    println!("{}", status);

    let watcher = TreeWatcher::start(fs.root_path())?;
    loop {
        std::thread::sleep(WATCH_TICK);
        if watcher.poll().is_empty() {
            continue;
        }
        eprintln!("{}", SCANNING);
        let (_, status) = load_session(&fs);
        println!("{}", status);
    }
}
