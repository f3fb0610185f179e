use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use dicer::prelude::*;

mod bell;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Uniform,
    Balanced,
}

impl From<ModeArg> for RngMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Uniform => RngMode::Uniform,
            ModeArg::Balanced => RngMode::Balanced,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DisplayArg {
    Total,
    Individual,
}

impl From<DisplayArg> for DisplayMode {
    fn from(value: DisplayArg) -> Self {
        match value {
            DisplayArg::Total => DisplayMode::Total,
            DisplayArg::Individual => DisplayMode::Individual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatsArg {
    Dice,
    Total,
}

impl From<StatsArg> for StatType {
    fn from(value: StatsArg) -> Self {
        match value {
            StatsArg::Dice => StatType::Dice,
            StatsArg::Total => StatType::Total,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Simple,
    Multiplayer,
}

impl From<VariantArg> for HistoryVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Simple => HistoryVariant::Simple,
            VariantArg::Multiplayer => HistoryVariant::Multiplayer,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dice to roll in NdF notation, e.g. 2d6 or d20
    #[arg(value_name = "DICE", conflicts_with_all = ["dice", "faces"])]
    notation: Option<String>,

    /// Number of dice per roll
    #[arg(short = 'n', long)]
    dice: Option<u32>,

    /// Faces on each die
    #[arg(short, long)]
    faces: Option<u32>,

    /// Session settings JSON file; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// How faces are drawn
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Show the sum or every die
    #[arg(short, long, value_enum)]
    display: Option<DisplayArg>,

    /// Number of rolls to make
    #[arg(short, long, default_value_t = 1)]
    rolls: u32,

    /// Take turns between this many players
    #[arg(short, long)]
    players: Option<u32>,

    /// Player (1-based) who rolls first
    #[arg(long, requires = "players")]
    first_player: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long, default_value = None)]
    seed: Option<u64>,

    /// History size preset
    #[arg(long, value_enum, default_value = "multiplayer")]
    variant: VariantArg,

    /// Explicit history size, overriding the preset
    #[arg(long)]
    history_capacity: Option<usize>,

    /// Print the roll history after rolling
    #[arg(long, default_value_t = false)]
    history: bool,

    /// Which statistics to summarize
    #[arg(long, value_enum, default_value = "dice")]
    stats: StatsArg,

    /// Summarize only this player's rolls (default: every player in turn)
    #[arg(long, value_name = "NAME")]
    stats_player: Option<String>,

    /// Write an SVG chart of the statistics
    #[arg(long, value_name = "FILE")]
    chart: Option<PathBuf>,

    /// Write the whole session as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Set and remember the chart theme
    #[arg(long, value_enum, conflicts_with = "toggle_theme")]
    theme: Option<ThemeArg>,

    /// Switch the remembered theme between light and dark
    #[arg(long, default_value_t = false)]
    toggle_theme: bool,

    /// Where the theme preference is kept
    #[arg(long, default_value = "dicer-preferences.json", value_name = "FILE")]
    prefs: PathBuf,

    /// Don't ring the terminal bell
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Log debug output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("Loading session settings from {}", path.display());
                SessionConfig::load(path)?
            }
            None => SessionConfig::for_variant(self.variant.into()),
        };

        if let Some(notation) = &self.notation {
            let spec = parse_dice(notation)?;
            config.dice_count = spec.count;
            config.dice_faces = spec.faces;
        }
        if let Some(dice) = self.dice {
            config.dice_count = dice;
        }
        if let Some(faces) = self.faces {
            config.dice_faces = faces;
        }
        if let Some(mode) = self.mode {
            config.rng_mode = mode.into();
        }
        if let Some(display) = self.display {
            config.display_mode = display.into();
        }
        if let Some(players) = self.players {
            config.multiplayer = true;
            config.player_count = players;
        }
        if let Some(capacity) = self.history_capacity {
            config.history_capacity = capacity;
        }

        config.validate()?;
        Ok(config)
    }

    fn preferences(&self) -> anyhow::Result<Preferences> {
        let mut prefs = Preferences::load_or_default(&self.prefs);
        let requested = match self.theme {
            Some(theme) => Some(theme.into()),
            None if self.toggle_theme => Some(prefs.theme.toggle()),
            None => None,
        };
        if let Some(theme) = requested {
            prefs.theme = theme;
            prefs.save(&self.prefs)?;
            log::info!("Theme set to {}", theme.as_str());
        }
        Ok(prefs)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();
    log::debug!("Starting with args: {:?}", args);

    let prefs = args.preferences()?;
    let config = args.session_config()?;

    let roller = match args.seed {
        Some(seed) => Roller::from_seed(seed),
        None => Roller::new(),
    };
    let mut session = Session::with_source(config, roller)?;
    if !args.quiet {
        session = session.with_sound(AudioOutput::new(bell::TerminalBell));
    }

    if let Some(first) = args.first_player {
        anyhow::ensure!(first >= 1, "players are numbered from 1");
        session.select_player(first - 1)?;
    }

    log::info!(
        "Rolling {} {} time(s) in {:?} mode",
        session.config().die_spec(),
        args.rolls,
        session.config().rng_mode
    );

    for _ in 0..args.rolls {
        let player = session.current_player().map(str::to_string);
        let result = session.roll();
        print_roll(&result, player.as_deref(), session.config().display_mode);
    }

    if args.history {
        print_history(session.history())?;
    }

    let stat_type: StatType = args.stats.into();
    let keys = match args.stats_player.as_deref() {
        Some(name) => vec![StatKey::player(name)],
        None => session.active_stat_keys(),
    };
    for key in &keys {
        print_summary(&session, stat_type, key)?;
    }

    if let Some(path) = &args.chart {
        // one chart per file; in multiplayer that is the first player's
        let chart_key = keys.first().cloned().unwrap_or_default();
        match session.chart(stat_type, &chart_key) {
            Some(chart) => {
                std::fs::write(path, chart.to_themed_svg(prefs.theme))?;
                log::info!("Chart of {} written to {}", chart_key, path.display());
            }
            None => log::warn!("No data to chart for {}", chart_key),
        }
    }

    if let Some(path) = &args.output {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &session.snapshot())?;
        log::info!("Session written to {}", path.display());
    }

    Ok(())
}

fn print_roll(result: &RollResult, player: Option<&str>, display: DisplayMode) {
    let prefix = player.map(|p| format!("{p}: ")).unwrap_or_default();
    match display {
        DisplayMode::Total => println!("{prefix}{}", result.sum),
        DisplayMode::Individual => {
            let mut buf = String::new();
            // writing into a String cannot fail
            let _ = result.pretty_print(&mut buf);
            println!("{prefix}{buf}");
        }
    }
}

fn print_history(history: &History) -> anyhow::Result<()> {
    println!();
    if history.is_empty() {
        println!("No rolls yet!");
        return Ok(());
    }
    println!("History (latest first):");
    let cells = history.player_cells();
    for entry in history {
        let mut line = String::new();
        entry.pretty_print(&mut line, cells)?;
        println!("  {line}");
    }
    Ok(())
}

fn print_summary(
    session: &Session,
    stat_type: StatType,
    key: &StatKey,
) -> anyhow::Result<()> {
    let summary = session.summary(stat_type, key);
    let mut line = String::new();
    summary.pretty_print(&mut line)?;
    println!();
    println!("{} ({}): {}", stat_type.axis_title(), key, line);

    if !summary.has_data() {
        println!("No data available. Start rolling!");
        return Ok(());
    }

    let max_count = summary.series.iter().map(|&(_, c)| c).max().unwrap_or(1);
    for &(value, count) in &summary.series {
        let bar = "#".repeat((count * 40).div_ceil(max_count) as usize);
        println!("{value:>4} | {bar} {count}");
    }

    if stat_type == StatType::Dice
        && let Some(fit) = session.uniformity(key)
    {
        println!(
            "chi-squared vs. fair d{}: {:.3} (df {}), p = {:.4}",
            session.config().dice_faces,
            fit.statistic,
            fit.degrees_of_freedom,
            fit.p_value
        );
    }
    Ok(())
}
