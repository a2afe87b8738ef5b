//! Timetable chromosome: one gene per (group, day, period).
//!
//! # Encoding
//!
//! Genes are laid out group-major, then day, then period, following the
//! catalog group order and the configured [`TimeDomain`]. Single-point
//! crossover relies on both parents sharing this layout.
//!
//! [`TimeDomain`]: crate::models::TimeDomain

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::Gene;
use crate::models::{GroupId, Weekday};

/// Group → day → lessons sorted by period.
pub type IndexedView<'a> = BTreeMap<GroupId, BTreeMap<Weekday, Vec<&'a Gene>>>;

/// A complete timetable candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    genes: Vec<Gene>,
}

impl Chromosome {
    /// Creates an empty chromosome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing gene sequence.
    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// Appends a gene. No deduplication: callers own the coverage of the
    /// (group, day, period) domain.
    pub fn add_gene(&mut self, gene: Gene) {
        self.genes.push(gene);
    }

    /// Number of genes.
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome holds no genes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Genes in chromosome order.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Mutable genes in chromosome order.
    pub fn genes_mut(&mut self) -> &mut [Gene] {
        &mut self.genes
    }

    pub(crate) fn genes_vec_mut(&mut self) -> &mut Vec<Gene> {
        &mut self.genes
    }

    /// Iterates genes in chromosome order.
    pub fn iter(&self) -> std::slice::Iter<'_, Gene> {
        self.genes.iter()
    }

    /// Iterates genes mutably in chromosome order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Gene> {
        self.genes.iter_mut()
    }

    /// Consumes the chromosome, returning its genes.
    pub fn into_genes(self) -> Vec<Gene> {
        self.genes
    }

    /// Projects the genes as group → day → period-sorted lessons.
    ///
    /// Computed on every call; the chromosome stores no secondary index.
    /// Lessons sharing a period keep chromosome order.
    pub fn to_indexed_view(&self) -> IndexedView<'_> {
        let mut view: IndexedView<'_> = BTreeMap::new();
        for gene in &self.genes {
            view.entry(gene.group_id)
                .or_default()
                .entry(gene.day)
                .or_default()
                .push(gene);
        }
        for days in view.values_mut() {
            for lessons in days.values_mut() {
                lessons.sort_by_key(|g| g.period);
            }
        }
        view
    }
}

impl Index<usize> for Chromosome {
    type Output = Gene;

    fn index(&self, index: usize) -> &Gene {
        &self.genes[index]
    }
}

impl IndexMut<usize> for Chromosome {
    fn index_mut(&mut self, index: usize) -> &mut Gene {
        &mut self.genes[index]
    }
}

impl<'a> IntoIterator for &'a Chromosome {
    type Item = &'a Gene;
    type IntoIter = std::slice::Iter<'a, Gene>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.iter()
    }
}

impl FromIterator<Gene> for Chromosome {
    fn from_iter<I: IntoIterator<Item = Gene>>(iter: I) -> Self {
        Self {
            genes: iter.into_iter().collect(),
        }
    }
}
