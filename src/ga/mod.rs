//! GA encoding for class timetables.
//!
//! # Encoding
//!
//! A [`Chromosome`] is a flat gene vector with one [`Gene`] per
//! (group, day, period). Each gene carries the course, teacher and room
//! taught in that cell. Populations hold chromosomes in [`Individual`]
//! slots that track whether the stored penalty is current.
//!
//! # Submodules
//!
//! - [`operators`]: single-point crossover and per-gene mutation

mod chromosome;
mod gene;
pub mod operators;
mod population;

pub use chromosome::{Chromosome, IndexedView};
pub use gene::Gene;
pub use operators::{mutate_genes, single_point_crossover, FixedGenePolicy, GeneticOperators};
pub use population::{best_index, Individual};
