use super::element::Element;
use super::ion::Ion;
use super::range::Range;
use crate::core::io::rrng::{RrngError, RrngFile};
use crate::core::io::traits::RangeFile;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollectionError {
    #[error("Range {candidate} overlaps existing range {existing}")]
    Overlap {
        existing: Box<Range>,
        candidate: Box<Range>,
    },
    #[error("No range contains mass-to-charge {mass}")]
    MassNotFound { mass: f64 },
}

/// An ordered set of [`Range`]s in which no two intervals overlap.
///
/// Ranges keep their insertion order. The backing sequence is only reachable as a
/// shared slice; every mutation goes through [`RangeCollection::add`] or
/// [`RangeCollection::remove_by_mass`], which keep the non-overlap invariant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeCollection {
    ranges: Vec<Range>,
    filepath: Option<PathBuf>,
}

impl RangeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a list of ranges, validating every pair up front.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Overlap`] naming the first conflicting pair found;
    /// no collection is produced in that case.
    pub fn from_ranges(ranges: Vec<Range>) -> Result<Self, CollectionError> {
        validate_disjoint(&ranges)?;
        Ok(Self {
            ranges,
            filepath: None,
        })
    }

    /// Loads a collection from an RRNG range file and records `path` as its provenance.
    pub fn from_rrng<P: AsRef<Path>>(path: P) -> Result<Self, RrngError> {
        let path = path.as_ref();
        let mut collection = RrngFile::read_from_path(path)?;
        collection.filepath = Some(path.to_path_buf());
        debug!(
            "Loaded {} range(s) from {}",
            collection.len(),
            path.display()
        );
        Ok(collection)
    }

    /// Writes the collection as an RRNG file that [`from_rrng`](Self::from_rrng) reads back
    /// into equal ranges. Colors are written as hex; channels already sit on the 1/255 grid.
    pub fn write_rrng<P: AsRef<Path>>(&self, path: P) -> Result<(), RrngError> {
        RrngFile::write_to_path(self, path)
    }

    /// The source file this collection was loaded from, `None` for in-memory collections.
    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    /// Appends `range` if it does not intersect any range already present.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Overlap`] if the new interval overlaps (or equals) an
    /// existing one; the collection is unchanged in that case.
    pub fn add(&mut self, range: Range) -> Result<(), CollectionError> {
        if let Some(existing) = self.ranges.iter().find(|r| r.intersects(&range)) {
            return Err(CollectionError::Overlap {
                existing: Box::new(existing.clone()),
                candidate: Box::new(range),
            });
        }
        self.ranges.push(range);
        Ok(())
    }

    /// Removes and returns the range containing `mass`. Removing from a gap is a no-op.
    pub fn remove_by_mass(&mut self, mass: f64) -> Option<Range> {
        let index = self.ranges.iter().position(|r| r.contains(mass))?;
        Some(self.ranges.remove(index))
    }

    pub fn find_by_mass(&self, mass: f64) -> Result<&Range, CollectionError> {
        self.ranges
            .iter()
            .find(|r| r.contains(mass))
            .ok_or(CollectionError::MassNotFound { mass })
    }

    pub fn contains_mass(&self, mass: f64) -> bool {
        self.ranges.iter().any(|r| r.contains(mass))
    }

    pub fn contains_range(&self, range: &Range) -> bool {
        self.ranges.contains(range)
    }

    pub fn ions(&self) -> BTreeSet<Ion> {
        self.ranges.iter().map(|r| r.ion().clone()).collect()
    }

    pub fn elements(&self) -> BTreeSet<Element> {
        self.ranges
            .iter()
            .flat_map(|r| r.ion().elements().cloned())
            .collect()
    }

    /// Every range labelled with `ion`, in collection order.
    pub fn ion_ranges(&self, ion: &Ion) -> Vec<&Range> {
        self.ranges.iter().filter(|r| r.ion() == ion).collect()
    }

    /// The ranges ordered by ascending lower bound. The collection itself is not reordered.
    pub fn sorted_ranges(&self) -> Vec<&Range> {
        let mut sorted: Vec<&Range> = self.ranges.iter().collect();
        sorted.sort_by(|a, b| a.lower().total_cmp(&b.lower()));
        sorted
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

// Sorting by lower bound is enough: with non-empty half-open intervals any
// overlapping pair implies an overlap between sort-adjacent ranges.
fn validate_disjoint(ranges: &[Range]) -> Result<(), CollectionError> {
    let mut order: Vec<usize> = (0..ranges.len()).collect();
    order.sort_by(|&a, &b| ranges[a].lower().total_cmp(&ranges[b].lower()).then(a.cmp(&b)));
    for pair in order.windows(2) {
        let (first, second) = (pair[0].min(pair[1]), pair[0].max(pair[1]));
        if ranges[first].intersects(&ranges[second]) {
            return Err(CollectionError::Overlap {
                existing: Box::new(ranges[first].clone()),
                candidate: Box::new(ranges[second].clone()),
            });
        }
    }
    Ok(())
}

impl TryFrom<Vec<Range>> for RangeCollection {
    type Error = CollectionError;

    fn try_from(ranges: Vec<Range>) -> Result<Self, Self::Error> {
        Self::from_ranges(ranges)
    }
}

impl<'a> IntoIterator for &'a RangeCollection {
    type Item = &'a Range;
    type IntoIter = std::slice::Iter<'a, Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl IntoIterator for RangeCollection {
    type Item = Range;
    type IntoIter = std::vec::IntoIter<Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.into_iter()
    }
}
