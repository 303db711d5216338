//! Rota CLI.
//!
//! Generates writer/editor rotas and writes them as CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use u_rota::authors::{self, DEFAULT_AUTHORS_FILE};
use u_rota::export;
use u_rota::models::Weekday;
use u_rota::{RotaConfig, RotaKpi, RotaScheduler};

#[derive(Parser)]
#[command(name = "u-rota")]
#[command(about = "Rotating writer/editor rota generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Random seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a full rota and write the calendar table.
    Schedule {
        /// Author roster, whitespace separated
        #[arg(short, long, default_value = DEFAULT_AUTHORS_FILE)]
        authors: PathBuf,
        /// Calendar CSV
        #[arg(short, long, default_value = "schedule.csv")]
        output: PathBuf,
        /// Also write the block table here
        #[arg(long)]
        blocks_output: Option<PathBuf>,
        /// Write the calendar even if queue/beyond selection stopped early
        #[arg(long)]
        allow_partial: bool,
        #[command(flatten)]
        tuning: Tuning,
    },

    /// Generate blocks only and write the block table.
    Blocks {
        /// Author roster, whitespace separated
        #[arg(short, long, default_value = DEFAULT_AUTHORS_FILE)]
        authors: PathBuf,
        /// Block CSV
        #[arg(short, long, default_value = "blocks.csv")]
        output: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
    },

    /// Pair every author with one other author (gift exchange).
    Gift {
        /// Author roster, whitespace separated
        #[arg(short, long, default_value = DEFAULT_AUTHORS_FILE)]
        authors: PathBuf,
        /// Pairs CSV
        #[arg(short, long, default_value = "gift_exchange.csv")]
        output: PathBuf,
    },

    /// Print random author initials, one per line.
    RandomAuthors {
        /// Number of authors
        #[arg(short, long, default_value = "20")]
        count: usize,
        /// Letters per author
        #[arg(short, long, default_value = "2")]
        length: usize,
    },
}

/// Command-line overrides for `RotaConfig`.
#[derive(Args)]
struct Tuning {
    /// Posts each author writes and edits
    #[arg(long)]
    num_writes: Option<usize>,
    /// Regular posts per block
    #[arg(long)]
    num_regular: Option<usize>,
    /// Queue posts per block
    #[arg(long)]
    num_queue: Option<usize>,
    /// Beyond posts per block
    #[arg(long)]
    num_beyond: Option<usize>,
    /// Whole-schedule attempts
    #[arg(long)]
    max_trials: Option<usize>,
    /// Resampling budget per attempt
    #[arg(long)]
    max_iter: Option<usize>,
    /// First day of each block
    #[arg(long)]
    first_day: Option<Weekday>,
    /// Day for beyond posts
    #[arg(long)]
    beyond_day: Option<Weekday>,
}

impl Tuning {
    fn apply(&self, config: &mut RotaConfig) {
        if let Some(v) = self.num_writes {
            config.num_writes = v;
        }
        if let Some(v) = self.num_regular {
            config.num_regular = v;
        }
        if let Some(v) = self.num_queue {
            config.num_queue = v;
        }
        if let Some(v) = self.num_beyond {
            config.num_beyond = v;
        }
        if let Some(v) = self.max_trials {
            config.max_trials = v;
        }
        if let Some(v) = self.max_iter {
            config.max_iter = v;
        }
        if let Some(v) = self.first_day {
            config.first_day = v;
        }
        if let Some(v) = self.beyond_day {
            config.beyond_day = v;
        }
    }
}

fn load_config(cli: &Cli) -> Result<RotaConfig> {
    let mut config = match &cli.config {
        Some(path) => RotaConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RotaConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.verbose |= cli.verbose;
    Ok(config)
}

fn load_roster(path: &Path) -> Result<Vec<String>> {
    let roster = authors::load_authors(path)
        .with_context(|| format!("failed to read authors from {}", path.display()))?;
    info!(authors = roster.len(), path = %path.display(), "roster loaded");
    Ok(roster)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    // Initialize tracing
    let filter = if config.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Schedule {
            authors,
            output,
            blocks_output,
            allow_partial,
            tuning,
        } => {
            tuning.apply(&mut config);
            let roster = load_roster(&authors)?;
            let mut rng = make_rng(config.seed);

            let scheduler = RotaScheduler::new(config);
            let rota = scheduler.schedule(&roster, &mut rng)?;

            let kpi = RotaKpi::calculate(&rota, scheduler.config().block_size());
            info!(
                blocks = kpi.block_count,
                full_blocks = kpi.full_block_count,
                posts = kpi.post_count,
                max_special = kpi.max_special_per_author,
                special_spread = kpi.special_spread(),
                "rota summary"
            );

            if let Some(path) = blocks_output {
                export::write_blocks(&rota.schedule, create(&path)?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "block table written");
            }

            if let Some(exhausted) = &rota.selection.exhausted {
                if !allow_partial {
                    bail!("{exhausted}; rerun with --allow-partial to write it anyway");
                }
                warn!(%exhausted, "writing partial calendar");
            }
            export::write_calendar(&rota, &scheduler.config().layout(), create(&output)?)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(path = %output.display(), "calendar written");
        }

        Commands::Blocks {
            authors,
            output,
            tuning,
        } => {
            tuning.apply(&mut config);
            let roster = load_roster(&authors)?;
            let mut rng = make_rng(config.seed);

            let schedule = RotaScheduler::new(config).blocks(&roster, &mut rng)?;
            export::write_blocks(&schedule, create(&output)?)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(
                blocks = schedule.block_count(),
                path = %output.display(),
                "block table written"
            );
        }

        Commands::Gift { authors, output } => {
            let roster = load_roster(&authors)?;
            let mut rng = make_rng(config.seed);

            let pairs = RotaScheduler::new(config).gift_exchange(&roster, &mut rng)?;
            export::write_pairs(&pairs, create(&output)?)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(pairs = pairs.len(), path = %output.display(), "gift exchange written");
        }

        Commands::RandomAuthors { count, length } => {
            let mut rng = make_rng(config.seed);
            for author in authors::random_authors(count, length, &mut rng)? {
                println!("{author}");
            }
        }
    }

    Ok(())
}
