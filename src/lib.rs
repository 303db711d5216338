//! Rotating writer/editor rota generation.
//!
//! Assigns writer and editor roles to a fixed pool of authors across
//! sequential blocks (one block per publishing week), then marks a few
//! posts of each full block as "queue" or "beyond" posts and lays the
//! result out on a weekly calendar.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Post`, `Block`, `Schedule`, `AuthorPool`,
//!   `Selection`, `Weekday`, `CalendarLayout`
//! - **`validation`**: Schedule, selection, and configuration checks
//! - **`scheduler`**: `BlockGenerator`, `QueueBeyondSelector`,
//!   `RotaScheduler` (trials + gift exchange), `RotaKpi`
//! - **`authors`**: Roster loading and random initials
//! - **`config`**: `RotaConfig` tunables and TOML loading
//! - **`export`**: CSV tables
//! - **`error`**: `RotaError`
//!
//! # Example
//!
//! ```no_run
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use u_rota::{authors, export, RotaConfig, RotaScheduler};
//!
//! let roster = authors::load_authors("authors.txt")?;
//! let config = RotaConfig::default();
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let rota = RotaScheduler::new(config.clone()).schedule(&roster, &mut rng)?;
//! export::write_calendar(&rota, &config.layout(), std::io::stdout())?;
//! # Ok::<(), u_rota::RotaError>(())
//! ```
//!
//! # Randomness
//!
//! Every randomized operation takes `&mut R` where `R: rand::Rng`.
//! Seed the generator to reproduce a rota.

pub mod authors;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::RotaConfig;
pub use error::{Result, RotaError};
pub use scheduler::{Rota, RotaKpi, RotaScheduler};
