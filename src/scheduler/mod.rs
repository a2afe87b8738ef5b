//! Evolutionary timetable scheduling.
//!
//! Runs a generational GA over [`Chromosome`](crate::ga::Chromosome)s:
//! tournament selection, single-point crossover, per-gene mutation and
//! greedy repair, with the penalty evaluator as fitness.
//!
//! # Termination
//!
//! A run always performs exactly `max_generations` generations. There is
//! no stagnation or target-penalty stop.
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod engine;
mod report;
mod selection;

pub use engine::TimetableScheduler;
pub use report::{GenerationStats, ScheduleOutcome};
pub use selection::tournament_select;
