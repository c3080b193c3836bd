use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use match_profiler::analysis::{Analysis, ProfileInputs};
use match_profiler::analysis_export::export_analysis;
use match_profiler::config::{ApiConfig, FlagThresholds};
use match_profiler::flags::{AnalyticalFlag, evaluate_flags};
use match_profiler::generate::{Generator, KeyContent};
use match_profiler::persist;
use match_profiler::raw_data::raw_data_block;
use match_profiler::session_store::{self, SavedSession, SessionStore};

#[derive(Parser)]
#[command(name = "match_profiler")]
#[command(about = "Parse pasted football stat blocks into figures, flags and trading reports", long_about = None)]
struct Cli {
    /// SQLite file for saved sessions (defaults to the user cache dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the inputs and print derived figures and flags
    Analyze {
        /// ProfileInputs JSON; the autosaved draft is used when omitted
        inputs: Option<PathBuf>,
        #[arg(long)]
        export: Option<PathBuf>,
        #[arg(long)]
        json: bool,
        /// JSON file overriding flag thresholds
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },
    /// Fetch team news and generate the full report
    Generate {
        inputs: Option<PathBuf>,
        /// Store the report in the session library
        #[arg(long)]
        save: bool,
    },
    /// Saved report library
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    List,
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Import a saved-profiles export from the browser build
    Import {
        file: PathBuf,
    },
    /// Ask a follow-up question about a saved report
    Ask {
        id: String,
        question: String,
    },
    /// Generate learnings, charts or visualisations for a saved report
    Extra {
        id: String,
        #[arg(value_enum)]
        kind: ExtraKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtraKind {
    Learnings,
    Charts,
    Visualisations,
}

impl From<ExtraKind> for KeyContent {
    fn from(kind: ExtraKind) -> Self {
        match kind {
            ExtraKind::Learnings => KeyContent::Learnings,
            ExtraKind::Charts => KeyContent::Charts,
            ExtraKind::Visualisations => KeyContent::Visualisations,
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            inputs,
            export,
            json,
            thresholds,
        } => run_analyze(inputs.as_deref(), export.as_deref(), json, thresholds.as_deref()),
        Commands::Generate { inputs, save } => run_generate(inputs.as_deref(), save, cli.db),
        Commands::Sessions { action } => run_sessions(action, cli.db),
    }
}

fn load_inputs(path: Option<&Path>) -> Result<ProfileInputs> {
    let draft_path = persist::default_draft_path();
    let Some(path) = path else {
        return draft_path
            .as_deref()
            .and_then(persist::load_draft)
            .context("no inputs file given and no saved draft found");
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading inputs {}", path.display()))?;
    let inputs: ProfileInputs = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing inputs {}", path.display()))?;
    if let Some(draft) = draft_path {
        if let Err(err) = persist::save_draft(&draft, &inputs) {
            tracing::warn!(%err, "draft autosave failed");
        }
    }
    Ok(inputs)
}

fn load_thresholds(path: Option<&Path>) -> Result<FlagThresholds> {
    let base = match path {
        Some(path) => FlagThresholds::from_json_file(path)?,
        None => FlagThresholds::default(),
    };
    Ok(base.with_overrides(|key| std::env::var(key).ok()))
}

fn run_analyze(
    inputs: Option<&Path>,
    export: Option<&Path>,
    json: bool,
    thresholds: Option<&Path>,
) -> Result<()> {
    let inputs = load_inputs(inputs)?;
    let thresholds = load_thresholds(thresholds)?;
    let analysis = Analysis::from_inputs(&inputs);
    let flags = evaluate_flags(&analysis, &thresholds);

    if let Some(path) = export {
        let report = export_analysis(path, &analysis, &flags)?;
        info!(
            sheets = report.sheets,
            segment_rows = report.segment_rows,
            league_rows = report.league_rows,
            flags = report.flags,
            "workbook written"
        );
        eprintln!("Workbook written to {}", path.display());
    }

    if json {
        let out = serde_json::json!({ "analysis": analysis, "flags": flags });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("failed encoding analysis")?
        );
    } else {
        print_summary(&analysis, &flags);
    }
    Ok(())
}

fn print_summary(a: &Analysis, flags: &[AnalyticalFlag]) {
    println!("{} vs {}", a.home_team, a.away_team);
    println!(
        "PPG {:.2} / {:.2}  L8 {:.2} / {:.2}  Bias {:.2} / {:.2}",
        a.ppg.home.season_ppg,
        a.ppg.away.season_ppg,
        a.ppg.home.last8_ppg,
        a.ppg.away.last8_ppg,
        a.ppg.home.ppg_bias,
        a.ppg.away.ppg_bias
    );
    let idx = &a.index.snapshot;
    println!(
        "Index: offence {:.2} / {:.2}  defence {:.2} / {:.2}  H v A {:.2}  goal edge {:.2}",
        idx.home_offence,
        idx.away_offence,
        idx.home_defence,
        idx.away_defence,
        idx.home_vs_away,
        idx.goal_edge
    );
    for (team, form) in [(&a.home_team, &a.home_form), (&a.away_team, &a.away_form)] {
        println!(
            "{team}: results PPG L4 {:.2} L8 {:.2} L12 {:.2} ({} games)",
            form.ppg_l4, form.ppg_l8, form.ppg_l12, form.games_found
        );
    }
    let mv = &a.match_volatility;
    println!(
        "Volatility: {:.0}% / {:.0}%  match {:.0}%  goals {:.2} ({:.2}-{:.2})",
        a.home_volatility.volatility_percent,
        a.away_volatility.volatility_percent,
        mv.combined_percent,
        mv.match_avg_total,
        mv.range_low,
        mv.range_high
    );
    let res = &a.resilience;
    println!(
        "Resilience: comeback {:.0}% / {:.0}%  dropped {:.0}% / {:.0}%",
        res.home_comeback, res.away_comeback, res.home_dropped, res.away_dropped
    );
    if !a.league.teams.is_empty() {
        println!(
            "League: {} teams, avg GF {:.2} GA {:.2}",
            a.league.team_count(),
            a.league.avg_gf,
            a.league.avg_ga
        );
    }

    if flags.is_empty() {
        println!("No flags raised.");
        return;
    }
    println!();
    for flag in flags {
        println!("[{}] {}: {}", flag.kind.as_str(), flag.title, flag.description);
    }
}

fn open_store(db: Option<PathBuf>) -> Result<SessionStore> {
    let path = db
        .or_else(session_store::default_db_path)
        .context("unable to resolve sessions db path")?;
    SessionStore::open(&path)
}

fn run_generate(inputs: Option<&Path>, save: bool, db: Option<PathBuf>) -> Result<()> {
    let inputs = load_inputs(inputs)?;
    let generator = Generator::from_config(ApiConfig::from_env())?;
    let today = chrono::Local::now().date_naive();
    let outcome = generator.full_profile(&inputs, today)?;

    println!("{}", outcome.profile.text);
    if !outcome.profile.sources.is_empty() {
        println!("\nSources:");
        for source in &outcome.profile.sources {
            println!("- {} <{}>", source.title, source.uri);
        }
    }

    if save {
        let store = open_store(db)?;
        let session =
            SavedSession::new(&inputs.team_a, &inputs.team_b, &outcome.profile, &inputs)?;
        store.save(&session)?;
        eprintln!("Saved session {}", session.id);
    }
    Ok(())
}

fn run_sessions(action: SessionAction, db: Option<PathBuf>) -> Result<()> {
    let store = open_store(db)?;
    match action {
        SessionAction::List => {
            let sessions = store.list()?;
            if sessions.is_empty() {
                println!("No saved sessions.");
            }
            for s in sessions {
                let when = chrono::DateTime::from_timestamp(s.created_at, 0)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  {}  {} vs {}", s.id, when, s.team_a, s.team_b);
            }
        }
        SessionAction::Show { id } => {
            let session = load_session(&store, &id)?;
            println!("# {}\n", session.title());
            println!("{}", session.profile_text);
            for source in &session.sources {
                println!("- {} <{}>", source.title, source.uri);
            }
        }
        SessionAction::Delete { id } => {
            if store.delete(&id)? {
                println!("Deleted {id}.");
            } else {
                return Err(anyhow!("no saved session with id {id}"));
            }
        }
        SessionAction::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed reading {}", file.display()))?;
            let imported = store.import_legacy(&raw)?;
            println!("Imported {imported} sessions from {}.", file.display());
        }
        SessionAction::Ask { id, question } => {
            let session = load_session(&store, &id)?;
            let generator = Generator::from_config(ApiConfig::from_env())?;
            let context = format!(
                "{}\n---\n{}",
                raw_data_block(&session.inputs),
                session.profile_text
            );
            let answer = generator.follow_up(&question, &context)?;
            println!("{}", answer.text);
        }
        SessionAction::Extra { id, kind } => {
            let session = load_session(&store, &id)?;
            let generator = Generator::from_config(ApiConfig::from_env())?;
            let out = generator.key_content(
                kind.into(),
                &session.profile_text,
                &raw_data_block(&session.inputs),
            )?;
            println!("{}", out.text);
        }
    }
    Ok(())
}

fn load_session(store: &SessionStore, id: &str) -> Result<SavedSession> {
    store
        .get(id)?
        .with_context(|| format!("no saved session with id {id}"))
}
