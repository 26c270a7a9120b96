use std::{
    io,
    path::PathBuf,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use sorting_sticks_core::{
    AppConfig, Coordinator, CueCounter, SortAlgorithm, SortState, TextPresenter, TimingConfig,
};
use tracing_subscriber::EnvFilter;

/// Fixed foreground frame interval.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

fn main() -> sorting_sticks_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            algorithm,
            config,
            count,
            delay_ms,
            seed,
            cancel_after_ms,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(count) = count {
                config.collection.element_count = count;
            }
            if seed.is_some() {
                config.collection.shuffle_seed = seed;
            }
            run_sort(
                config,
                algorithm,
                delay_ms,
                cancel_after_ms.map(Duration::from_millis),
            )
        }
        Commands::Algorithms => {
            for algorithm in SortAlgorithm::ALL {
                println!("{:<16} {}", algorithm.name(), algorithm.complexity());
            }
            Ok(())
        }
        Commands::Config => {
            println!("{}", AppConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> sorting_sticks_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::load(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn run_sort(
    config: AppConfig,
    algorithm: SortAlgorithm,
    delay_ms: Option<u64>,
    cancel_after: Option<Duration>,
) -> sorting_sticks_core::Result<()> {
    let timing = config.timing.clone();
    let cues = Arc::new(CueCounter::new());
    let mut coordinator = Coordinator::new(config, cues.clone())?;
    if let Some(delay_ms) = delay_ms {
        coordinator.set_timing(TimingConfig {
            operation_delay_ms: delay_ms,
            algorithm_delays_ms: Default::default(),
            ..timing
        });
    }
    let mut presenter = TextPresenter::new(io::stdout().lock());

    coordinator.render(&mut presenter)?;
    coordinator.start_sort(algorithm)?;
    let started = Instant::now();

    while coordinator.state() == SortState::Running {
        if cancel_after.is_some_and(|limit| started.elapsed() >= limit) {
            tracing::info!(%algorithm, "cancelling run");
            coordinator.reset()?;
            break;
        }
        coordinator.update()?;
        coordinator.render(&mut presenter)?;
        thread::sleep(FRAME_INTERVAL);
    }
    coordinator.render(&mut presenter)?;

    let stats = coordinator.statistics()?;
    tracing::info!(
        %algorithm,
        comparisons = stats.comparisons,
        array_accesses = stats.array_accesses,
        swaps = stats.swaps,
        cues = cues.played(),
        frames = presenter.frames(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run finished"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shuffle the sticks and animate one algorithm until it finishes.
    Run {
        /// Algorithm to run (bubble, insertion, selection, merge, in-place-merge, quick).
        algorithm: SortAlgorithm,
        /// JSON configuration file. Missing fields use the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of sticks.
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Pacing delay between steps, applied to every algorithm.
        #[arg(short, long)]
        delay_ms: Option<u64>,
        /// Seed for a reproducible shuffle.
        #[arg(long)]
        seed: Option<u64>,
        /// Reset the collection after this many milliseconds.
        #[arg(long)]
        cancel_after_ms: Option<u64>,
    },
    /// List the available algorithms and their complexity labels.
    Algorithms,
    /// Print the default configuration as JSON.
    Config,
}
