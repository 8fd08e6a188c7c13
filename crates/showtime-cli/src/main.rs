//! `showtime` CLI — derive end times and check room conflicts against a schedule file.
//!
//! ## Usage
//!
//! ```sh
//! # End time for movie 3 starting at 14:00
//! showtime --data schedule.json end-time --movie 3 --start 14:00
//!
//! # Would 11:00 in room 1 on 2025-11-24 clash with anything? (exit 2 on conflict)
//! showtime check --movie 3 --room 1 --date 2025-11-24 --start 11:00
//!
//! # Create, or update with --id, through the submission gate
//! showtime save --movie 3 --room 1 --date 2025-11-24 --start 12:00 --description "Matinee"
//! showtime save --id 4 --start 12:30
//!
//! # Delete and list
//! showtime delete --id 4
//! showtime list
//! ```
//!
//! The schedule file defaults to `showtimes.json` and can be set with `SHOWTIME_DATA`.
//! Logs go to stderr; `RUST_LOG` overrides `--verbose`.

mod store;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use showtime_engine::{
    derive_end_time_detailed, parse_date, Field, MemoryCollection, MidnightPolicy,
    MovieId, RoomId, SaveOutcome, ShowtimeCollection, ShowtimeId, ShowtimeScreen, WallTime,
};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "showtime",
    version,
    about = "Cinema showtime scheduling: end times and room conflicts"
)]
struct Cli {
    /// Schedule file holding movies, rooms, and showtimes
    #[arg(
        long,
        global = true,
        env = "SHOWTIME_DATA",
        default_value = "showtimes.json"
    )]
    data: PathBuf,

    /// What to do when a showing runs past midnight
    #[arg(long, global = true, value_enum, default_value_t = Midnight::Wrap)]
    midnight: Midnight,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Midnight {
    /// Keep the date and wrap the end time to the next day's clock
    Wrap,
    /// Refuse end times past midnight
    Reject,
}

impl From<Midnight> for MidnightPolicy {
    fn from(m: Midnight) -> Self {
        match m {
            Midnight::Wrap => MidnightPolicy::Wrap,
            Midnight::Reject => MidnightPolicy::Reject,
        }
    }
}

/// Candidate showtime fields. With `--id` the stored showtime is loaded first and
/// the other flags override it.
#[derive(Args)]
struct FormArgs {
    /// Existing showtime to edit
    #[arg(long)]
    id: Option<i64>,
    #[arg(long)]
    movie: Option<i64>,
    #[arg(long)]
    room: Option<i64>,
    /// Calendar date, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Start time, HH:MM
    #[arg(long, value_parser = WallTime::parse)]
    start: Option<WallTime>,
    /// End time, HH:MM; only taken when the movie has no duration
    #[arg(long, value_parser = WallTime::parse)]
    end: Option<WallTime>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the end time for a movie starting at a given time
    EndTime {
        #[arg(long)]
        movie: i64,
        /// Start time, HH:MM
        #[arg(long, value_parser = WallTime::parse)]
        start: WallTime,
    },
    /// Check a candidate for conflicts in its room and date
    Check {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Create or update a showtime if it passes the submission gate
    Save {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete a showtime
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Print all showtimes as JSON
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let policy = MidnightPolicy::from(cli.midnight);

    match cli.command {
        Commands::EndTime { movie, start } => end_time(&cli.data, policy, MovieId(movie), start)?,
        Commands::Check { form } => {
            let code = check(&cli.data, policy, &form)?;
            if code != 0 {
                process::exit(code);
            }
        }
        Commands::Save { form } => save(&cli.data, policy, &form)?,
        Commands::Delete { id } => delete(&cli.data, ShowtimeId(id))?,
        Commands::List => {
            let store = store::load(&cli.data)?;
            let showtimes = store.list().context("Failed to list showtimes")?;
            println!("{}", serde_json::to_string_pretty(&showtimes)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "showtime=debug,showtime_engine=debug"
    } else {
        "showtime=info,showtime_engine=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_screen(path: &Path, policy: MidnightPolicy) -> Result<(MemoryCollection, ShowtimeScreen)> {
    let store = store::load(path)?;
    let mut screen = ShowtimeScreen::new(policy);
    screen
        .load(&store, &store, &store)
        .context("Failed to load schedule")?;
    Ok((store, screen))
}

fn fill_form(screen: &mut ShowtimeScreen, form: &FormArgs) -> Result<()> {
    if let Some(id) = form.id {
        if !screen.open_edit(ShowtimeId(id)) {
            bail!("Unknown showtime: {}", id);
        }
    }
    if let Some(movie) = form.movie {
        screen.select_movie(Some(MovieId(movie)));
    }
    if let Some(room) = form.room {
        screen.form_mut().set_room(Some(RoomId(room)));
    }
    if let Some(date) = form.date {
        screen.form_mut().set_date(Some(date));
    }
    if let Some(start) = form.start {
        screen.set_start_time(Some(start));
    }
    if let Some(end) = form.end {
        if !screen.set_end_time(Some(end)) {
            warn!(%end, "--end ignored: the end time is derived from the movie duration");
        }
    }
    if let Some(description) = &form.description {
        screen.form_mut().set_description(description.clone());
    }
    Ok(())
}

fn end_time(path: &Path, policy: MidnightPolicy, movie_id: MovieId, start: WallTime) -> Result<()> {
    let store = store::load(path)?;
    let catalog = store.catalog();

    let movie = catalog
        .movie(movie_id)
        .with_context(|| format!("Cannot compute end time: unknown movie {}", movie_id))?;
    let duration = movie.positive_duration();
    let Some((duration, derived)) = duration
        .and_then(|d| derive_end_time_detailed(start, i64::from(d)).map(|derived| (d, derived)))
    else {
        bail!("Cannot compute end time: movie {} has no duration", movie_id);
    };
    if derived.crosses_midnight {
        if policy == MidnightPolicy::Reject {
            bail!(
                "Cannot compute end time: {} + {} min passes midnight",
                start,
                duration
            );
        }
        warn!(%start, end = %derived.end, "end time passes midnight; the showtime keeps its date");
    }
    println!("{}", derived.end);
    Ok(())
}

/// Exit code: 0 free, 1 not checkable yet, 2 conflict.
fn check(path: &Path, policy: MidnightPolicy, form: &FormArgs) -> Result<i32> {
    let (_store, mut screen) = open_screen(path, policy)?;
    fill_form(&mut screen, form)?;

    let Some(candidate) = screen.form().checkable() else {
        let missing: Vec<String> = screen
            .form()
            .missing_fields()
            .into_iter()
            .filter(|f| *f != Field::Movie)
            .map(|f| f.to_string())
            .collect();
        println!("not checkable: missing {}", missing.join(", "));
        return Ok(1);
    };

    let conflicts = screen.conflicts();
    if conflicts.is_empty() {
        println!(
            "ok: room {} on {} is free {}-{}",
            candidate.room_id, candidate.date, candidate.start, candidate.end
        );
        return Ok(0);
    }

    for c in &conflicts {
        println!(
            "conflict: showtime #{} {}-{} ({} min overlap)",
            c.existing.id, c.existing.start_time, c.existing.end_time, c.overlap_minutes
        );
    }
    Ok(2)
}

fn save(path: &Path, policy: MidnightPolicy, form: &FormArgs) -> Result<()> {
    let (mut store, mut screen) = open_screen(path, policy)?;
    fill_form(&mut screen, form)?;

    match screen.save(&mut store) {
        SaveOutcome::Saved(showtime) => {
            store::save(path, &store)?;
            println!("{}", serde_json::to_string_pretty(&showtime)?);
            Ok(())
        }
        SaveOutcome::Blocked(reasons) => {
            let reasons: Vec<String> = reasons.iter().map(|r| r.to_string()).collect();
            bail!("Cannot save showtime: {}", reasons.join("; "))
        }
        SaveOutcome::Failed(message) => bail!(message),
    }
}

fn delete(path: &Path, id: ShowtimeId) -> Result<()> {
    let (mut store, mut screen) = open_screen(path, MidnightPolicy::default())?;
    screen
        .delete(id, &mut store)
        .with_context(|| format!("Failed to delete showtime {}", id))?;
    store::save(path, &store)?;
    println!("deleted showtime #{}", id);
    Ok(())
}
