//! Class timetabling with a genetic algorithm.
//!
//! Builds a weekly timetable assigning, for every student group and every
//! (day, period) cell, a course, a teacher and a room. Candidates are
//! scored by ten weighted penalty terms (hard conflicts weigh 1000, soft
//! preferences weigh 1 or less) and improved by a generational GA with
//! greedy conflict repair.
//!
//! # Modules
//!
//! - **`models`**: Catalog records: `Teacher`, `Room`, `Course`,
//!   `StudentGroup`, `TimeSlot`, `Weekday`, `TimeDomain`, `Catalog`
//! - **`ga`**: `Gene`, `Chromosome`, `Individual`, crossover and mutation
//! - **`evaluation`**: Penalty terms, `FitnessEvaluator`, `ConflictReport`
//! - **`repair`**: Greedy teacher → room → group conflict repair
//! - **`scheduler`**: `TimetableScheduler`, tournament selection, run results
//! - **`config`**: `SchedulingConfig`
//! - **`validation`**: Catalog integrity checks (duplicate IDs, room refs, coverage)
//!
//! # Quick Start
//!
//! ```
//! use u_timetable::{Catalog, Course, Room, SchedulingConfig, StudentGroup, Teacher,
//!     TimeSlot, TimetableScheduler, Weekday};
//!
//! let config = SchedulingConfig::default()
//!     .with_population_size(10)
//!     .with_max_generations(2)
//!     .with_verbose(false);
//! let catalog = Catalog::new(
//!     vec![StudentGroup::new(1, "7A"), StudentGroup::new(2, "7B")],
//!     vec![Course::new(1, "Math"), Course::new(2, "History")],
//!     vec![Teacher::new(1, "Ada"), Teacher::new(2, "Alan")],
//!     vec![Room::new(1, "R1"), Room::new(2, "R2")],
//!     TimeSlot::grid(&config.days, &config.periods),
//! )
//! .unwrap();
//!
//! let outcome = TimetableScheduler::new(catalog, config).unwrap().run().unwrap();
//! assert_eq!(outcome.best.len(), 2 * 5 * 6);
//! ```
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod config;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod models;
pub mod repair;
pub mod scheduler;
pub mod validation;

pub use config::SchedulingConfig;
pub use error::{Result, TimetableError};
pub use evaluation::{evaluate, FitnessEvaluator, PenaltyBreakdown};
pub use ga::{Chromosome, Gene};
pub use models::{
    Catalog, Course, Room, StudentGroup, Teacher, TimeDomain, TimeSlot, Weekday,
};
pub use repair::{repair, GroupConflictPolicy, RepairOptions, RepairStats};
pub use scheduler::{ScheduleOutcome, TimetableScheduler};
