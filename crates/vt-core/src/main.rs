//! Vitals - wellness scoring and inference CLI
//!
//! The main entry point for vt-core, handling:
//! - Daily ingestion: score a day's logs and archive the snapshot
//! - Baselines, imputation and gap filling over the archive
//! - Correlation, regression and forecasting
//! - Adaptive nutrition targets
//! - Tunables inspection and validation

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use vt_common::error::format_error_human;
use vt_common::{
    parse_date, DailyLogs, Error, Metric, OutputFormat, Result, StructuredError, UserProfile,
    WeightEntry,
};
use vt_config::{load_tunables, tunables_schema, LoadedTunables, Tunables};
use vt_core::baseline::{calculate_baseline, calculate_baseline_before};
use vt_core::correlation::{
    find_strongest_correlations, generate_correlation_matrix, multi_variate_regression,
};
use vt_core::exit_codes::ExitCode;
use vt_core::forecast::{calculate_goal_probability, forecast_metric};
use vt_core::impute::{fill_gaps, impute_missing_score};
use vt_core::log_event;
use vt_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, Stage,
};
use vt_core::pipeline::ingest_day;
use vt_core::scoring::score_day;
use vt_core::store::{JsonFileBackend, TimeSeriesStore};
use vt_core::targets::adaptive_targets;

/// Vitals - daily wellness scores, baselines and forecasts
#[derive(Parser)]
#[command(name = "vitals")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Snapshot archive file
    #[arg(long, global = true, env = "VITALS_ARCHIVE")]
    archive: Option<PathBuf>,

    /// Tunables file (overrides VITALS_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a day's logs and archive the snapshot
    Score(ScoreArgs),

    /// Trailing-window baseline of a metric
    Baseline(BaselineArgs),

    /// Infer a metric on a date without data
    Impute(ImputeArgs),

    /// Fill calendar gaps in a metric's recent series
    FillGaps(FillGapsArgs),

    /// Correlation matrix and strongest pairs
    Correlate(CorrelateArgs),

    /// Standardized effects of predictors on a target metric
    Regress(RegressArgs),

    /// Extrapolate a metric's trend
    Forecast(ForecastArgs),

    /// Probability of reaching a target value in time
    Goal(GoalArgs),

    /// Adaptive calorie and macro targets
    Targets(TargetsArgs),

    /// Tunables management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Date being scored (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    date: NaiveDate,

    /// Daily logs JSON file
    #[arg(long)]
    logs: PathBuf,

    /// User profile JSON file
    #[arg(long)]
    profile: PathBuf,

    /// Weight history JSON file (array of {date, weightKg})
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Compute scores without writing the archive
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct BaselineArgs {
    #[arg(long, short)]
    metric: Metric,

    /// Window in archived days (defaults to the tunables)
    #[arg(long)]
    window: Option<usize>,

    /// Only use dates strictly before this one
    #[arg(long, value_parser = parse_date_arg)]
    before: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ImputeArgs {
    #[arg(long, short)]
    metric: Metric,

    #[arg(long, value_parser = parse_date_arg)]
    date: NaiveDate,
}

#[derive(Args, Debug)]
struct FillGapsArgs {
    #[arg(long, short)]
    metric: Metric,

    /// Archived days to read
    #[arg(long, default_value_t = 30)]
    days: usize,
}

#[derive(Args, Debug)]
struct CorrelateArgs {
    /// Archived days to correlate
    #[arg(long, default_value_t = 30)]
    days: usize,
}

#[derive(Args, Debug)]
struct RegressArgs {
    /// Target metric
    #[arg(long, short)]
    target: Metric,

    /// Predictor metrics (comma separated)
    #[arg(long, short, value_delimiter = ',', required = true)]
    predictors: Vec<Metric>,
}

#[derive(Args, Debug)]
struct ForecastArgs {
    #[arg(long, short)]
    metric: Metric,

    /// Days to forecast (defaults to the tunables)
    #[arg(long)]
    horizon: Option<usize>,
}

#[derive(Args, Debug)]
struct GoalArgs {
    #[arg(long, short)]
    metric: Metric,

    /// Target value
    #[arg(long)]
    target: f64,

    /// Days to reach the target
    #[arg(long)]
    days: u32,
}

#[derive(Args, Debug)]
struct TargetsArgs {
    /// User profile JSON file
    #[arg(long)]
    profile: PathBuf,

    /// Weight history JSON file
    #[arg(long)]
    weights: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved tunables and where they came from
    Show,
    /// Print the JSON schema of the tunables file
    Schema,
    /// Validate a tunables file
    Validate {
        /// File to validate (defaults to the resolved tunables)
        path: Option<PathBuf>,
    },
}

fn parse_date_arg(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(raw).map_err(|e| e.to_string())
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                // --help / --version
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet || cli.global.verbose > 0 {
        Some(LogConfig::level_for_verbosity(cli.global.verbose, cli.global.quiet))
    } else {
        None
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let ctx = LogContext::new(generate_run_id()).with_command(command_name(&cli.command));
    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "run started");

    let exit_code = match dispatch(&cli, &ctx) {
        Ok(()) => ExitCode::Clean,
        Err(e) => output_error(&cli.global, &ctx, &e),
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Init,
        "run finished",
        exit_code = exit_code.as_i32()
    );
    std::process::exit(exit_code.as_i32());
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Score(_) => "score",
        Commands::Baseline(_) => "baseline",
        Commands::Impute(_) => "impute",
        Commands::FillGaps(_) => "fill-gaps",
        Commands::Correlate(_) => "correlate",
        Commands::Regress(_) => "regress",
        Commands::Forecast(_) => "forecast",
        Commands::Goal(_) => "goal",
        Commands::Targets(_) => "targets",
        Commands::Config(_) => "config",
    }
}

fn dispatch(cli: &Cli, ctx: &LogContext) -> Result<()> {
    let global = &cli.global;
    match &cli.command {
        Commands::Score(args) => run_score(global, ctx, args),
        Commands::Baseline(args) => run_baseline(global, ctx, args),
        Commands::Impute(args) => run_impute(global, ctx, args),
        Commands::FillGaps(args) => run_fill_gaps(global, ctx, args),
        Commands::Correlate(args) => run_correlate(global, ctx, args),
        Commands::Regress(args) => run_regress(global, ctx, args),
        Commands::Forecast(args) => run_forecast(global, ctx, args),
        Commands::Goal(args) => run_goal(global, ctx, args),
        Commands::Targets(args) => run_targets(global, ctx, args),
        Commands::Config(args) => run_config(global, ctx, args),
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn load_config(global: &GlobalOpts, ctx: &LogContext) -> Result<LoadedTunables> {
    match load_tunables(global.config.as_deref()) {
        Ok(loaded) => {
            match &loaded.path {
                Some(path) => log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_LOADED,
                    Stage::Init,
                    "tunables loaded",
                    path = path.display().to_string().as_str(),
                    source = loaded.source.to_string().as_str()
                ),
                None => log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "using built-in tunables"
                ),
            }
            Ok(loaded)
        }
        Err(e) => {
            log_event!(
                ctx,
                WARN,
                event_names::CONFIG_ERROR,
                Stage::Init,
                "tunables rejected",
                code = e.code()
            );
            Err(Error::Config(e.to_string()))
        }
    }
}

fn open_store(global: &GlobalOpts, tunables: &Tunables) -> Result<TimeSeriesStore> {
    let path = match &global.archive {
        Some(path) => path.clone(),
        None => vt_config::default_archive_path().ok_or_else(|| {
            Error::Config("no data directory; pass --archive or set VITALS_ARCHIVE".to_string())
        })?,
    };
    TimeSeriesStore::open(
        Box::new(JsonFileBackend::new(path)),
        tunables.archive.capacity_days,
    )
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::invalid(path.display().to_string(), e.to_string()))
}

fn read_weights(path: Option<&Path>) -> Result<Vec<WeightEntry>> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Vec::new()),
    }
}

/// Print `value` as pretty JSON, or the one-line summary.
fn emit<T: Serialize>(global: &GlobalOpts, value: &T, summary: impl FnOnce() -> String) -> Result<()> {
    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Summary => println!("{}", summary()),
    }
    Ok(())
}

fn output_error(global: &GlobalOpts, ctx: &LogContext, error: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(error);
    if matches!(error, Error::InvalidInput { .. } | Error::InvalidDate(_)) {
        log_event!(
            ctx,
            WARN,
            event_names::INPUT_REJECTED,
            Stage::Ingest,
            error.to_string(),
            code = error.code()
        );
    }
    match global.format {
        OutputFormat::Json => eprintln!("{}", StructuredError::from(error).to_json_pretty()),
        OutputFormat::Summary => eprintln!("{}", format_error_human(error)),
    }
    exit_code
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_score(global: &GlobalOpts, ctx: &LogContext, args: &ScoreArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let logs: DailyLogs = read_json(&args.logs)?;
    let profile: UserProfile = read_json(&args.profile)?;
    let weights = read_weights(args.weights.as_deref())?;
    let mut store = open_store(global, &tunables)?;

    if args.dry_run {
        let day = score_day(args.date, &logs, &profile, &weights, &store, &tunables)?;
        return emit(global, &day, || {
            format!(
                "{} system={} liability={} (dry run)",
                day.date, day.scores.system, day.insight.liability.id
            )
        });
    }

    let outcome = ingest_day(
        &mut store,
        args.date,
        &logs,
        &profile,
        &weights,
        &tunables,
        Utc::now(),
    )?;
    emit(global, &outcome, || {
        let s = &outcome.day.scores;
        format!(
            "{} system={} learning={} screen={} nutrition={} training={} sleep={} liability={}",
            outcome.day.date,
            s.system,
            s.learning,
            s.screen,
            s.nutrition,
            s.training,
            s.sleep,
            outcome.day.insight.liability.id
        )
    })
}

fn run_baseline(global: &GlobalOpts, ctx: &LogContext, args: &BaselineArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let store = open_store(global, &tunables)?;
    let window = args.window.unwrap_or(tunables.baseline.window_days);
    let baseline = match args.before {
        Some(date) => {
            calculate_baseline_before(&store, args.metric, window, date, &tunables.baseline)
        }
        None => calculate_baseline(&store, args.metric, window, &tunables.baseline),
    };
    emit(global, &baseline, || {
        format!(
            "{} baseline mean={:.1} stddev={:.1} n={}{}",
            args.metric,
            baseline.mean,
            baseline.std_dev,
            baseline.sample_count,
            if baseline.sufficient { "" } else { " (fallback)" }
        )
    })
}

fn run_impute(global: &GlobalOpts, ctx: &LogContext, args: &ImputeArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let store = open_store(global, &tunables)?;
    let imputed = impute_missing_score(&store, args.metric, args.date, &tunables.imputation);
    emit(global, &imputed, || {
        format!(
            "{} {} ~ {:.1} ± {:.1} ({} confidence)",
            args.metric, args.date, imputed.value, imputed.uncertainty, imputed.confidence
        )
    })
}

fn run_fill_gaps(global: &GlobalOpts, ctx: &LogContext, args: &FillGapsArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let store = open_store(global, &tunables)?;
    let observed = store.read_metric(args.metric, args.days);
    let filled = fill_gaps(&observed, args.metric, &store, &tunables.imputation);
    emit(global, &filled, || {
        let imputed = filled.iter().filter(|p| p.is_imputed).count();
        format!(
            "{}: {} days, {} imputed",
            args.metric,
            filled.len(),
            imputed
        )
    })
}

fn run_correlate(global: &GlobalOpts, ctx: &LogContext, args: &CorrelateArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let store = open_store(global, &tunables)?;
    let matrix = generate_correlation_matrix(&store, args.days);
    let strongest = find_strongest_correlations(&matrix, &tunables.correlation);
    let response = serde_json::json!({
        "matrix": &matrix,
        "strongest": &strongest,
    });
    emit(global, &response, || {
        strongest
            .iter()
            .map(|p| format!("{}~{} r={:.2}", p.metric_a, p.metric_b, p.coefficient))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn run_regress(global: &GlobalOpts, ctx: &LogContext, args: &RegressArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let store = open_store(global, &tunables)?;
    let report = multi_variate_regression(&store, args.target, &args.predictors, &tunables.correlation)?;
    emit(global, &report, || {
        let effects: Vec<String> = report
            .predictors
            .iter()
            .map(|p| format!("{} beta={:.2}", p.metric, p.beta))
            .collect();
        format!(
            "{} (n={}): {}",
            report.target,
            report.sample_size,
            effects.join(", ")
        )
    })
}

fn run_forecast(global: &GlobalOpts, ctx: &LogContext, args: &ForecastArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let store = open_store(global, &tunables)?;
    let horizon = args.horizon.unwrap_or(tunables.forecast.horizon_days);
    let forecast = forecast_metric(&store, args.metric, horizon, &tunables.forecast)?;
    let report = forecast.to_report();
    emit(global, &report, || {
        let last = report.points.last();
        format!(
            "{} {} slope={:.2}/day; day {} ~ {:.1} ({}% confidence)",
            report.metric,
            report.trend,
            report.slope,
            last.map(|p| p.day_offset).unwrap_or(0),
            last.map(|p| p.predicted_value).unwrap_or(0.0),
            last.map(|p| p.confidence_percent).unwrap_or(0)
        )
    })
}

fn run_goal(global: &GlobalOpts, ctx: &LogContext, args: &GoalArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let store = open_store(global, &tunables)?;
    let goal = calculate_goal_probability(
        &store,
        args.metric,
        args.target,
        args.days,
        &tunables.forecast,
    )?;
    emit(global, &goal, || {
        format!(
            "{} {:.0} -> {:.0} in {} days: {:.0}%",
            goal.metric, goal.current, goal.target, goal.days_to_goal, goal.probability
        )
    })
}

fn run_targets(global: &GlobalOpts, ctx: &LogContext, args: &TargetsArgs) -> Result<()> {
    let tunables = load_config(global, ctx)?.tunables;
    let profile: UserProfile = read_json(&args.profile)?;
    let weights = read_weights(args.weights.as_deref())?;
    vt_common::Validate::validate(&profile)?;
    for entry in &weights {
        vt_common::Validate::validate(entry)?;
    }
    let targets = adaptive_targets(&profile, &weights, &tunables.targets);
    emit(global, &targets, || {
        format!(
            "{:.0} kcal, protein {:.0} g, carbs {:.0} g, fats {:.0} g ({})",
            targets.calories, targets.protein, targets.carbs, targets.fats, targets.trend
        )
    })
}

fn run_config(global: &GlobalOpts, ctx: &LogContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => {
            let loaded = load_config(global, ctx)?;
            emit(global, &loaded, || {
                let source = loaded
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in defaults".to_string());
                format!(
                    "config: {} ({}) schema {}",
                    source, loaded.source, loaded.tunables.schema_version
                )
            })
        }
        ConfigCommands::Schema => {
            let schema = tunables_schema();
            emit(global, &schema, || {
                "tunables schema: use --format json".to_string()
            })
        }
        ConfigCommands::Validate { path } => {
            let path = path.as_deref().or(global.config.as_deref());
            let loaded = match load_tunables(path) {
                Ok(loaded) => loaded,
                Err(e) => return Err(Error::Config(e.to_string())),
            };
            let response = serde_json::json!({
                "status": "valid",
                "path": loaded.path.as_ref().map(|p| p.display().to_string()),
                "source": loaded.source,
                "hash": loaded.hash,
                "schemaVersion": loaded.tunables.schema_version,
            });
            emit(global, &response, || "config validate: OK".to_string())
        }
    }
}
