//! Contiguous block selections over row-major dataspaces.
//!
//! A [`Hyperslab`] is a start/count box with unit stride. Partial I/O walks
//! the box as a sequence of [`Run`]s: maximal stretches that are contiguous
//! in both the dataset layout and the packed selection buffer.
//!
//! ```ignore
//! use lofardal_store::Hyperslab;
//!
//! // rows 2..4, columns 1..3 of a 4x5 dataset
//! let slab = Hyperslab::new(vec![2, 1], vec![2, 2]);
//! let runs: Vec<_> = slab.runs(&[4, 5]).collect();
//! assert_eq!(runs.len(), 2);
//! ```

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperslab {
    pub start: Vec<u64>,
    pub count: Vec<u64>,
}

/// One contiguous stretch of a selection, in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Linear element offset in the dataset.
    pub dataset_offset: u64,
    /// Linear element offset in the packed selection buffer.
    pub buffer_offset: u64,
    pub len: u64,
}

impl Hyperslab {
    pub fn new(start: Vec<u64>, count: Vec<u64>) -> Self {
        Self { start, count }
    }

    /// The whole dataspace.
    pub fn all(dims: &[u64]) -> Self {
        Self {
            start: vec![0; dims.len()],
            count: dims.to_vec(),
        }
    }

    /// A single element.
    pub fn point(coords: &[u64]) -> Self {
        Self {
            start: coords.to_vec(),
            count: vec![1; coords.len()],
        }
    }

    pub fn rank(&self) -> usize {
        self.start.len()
    }

    pub fn num_elements(&self) -> u64 {
        self.count.iter().product()
    }

    /// Verify rank and that `start + count <= dims` in every dimension.
    pub fn check(&self, path: &str, dims: &[u64]) -> Result<()> {
        if self.start.len() != dims.len() || self.count.len() != dims.len() {
            return Err(StoreError::RankMismatch {
                path: path.to_string(),
                expected: dims.len(),
                got: self.start.len().max(self.count.len()),
            });
        }
        let inside = self
            .start
            .iter()
            .zip(&self.count)
            .zip(dims)
            .all(|((&s, &c), &d)| s.checked_add(c).map_or(false, |end| end <= d));
        if !inside {
            return Err(StoreError::OutOfBounds {
                start: self.start.clone(),
                count: self.count.clone(),
                extent: dims.to_vec(),
            });
        }
        Ok(())
    }

    /// Iterate the contiguous runs of this selection within `dims`.
    ///
    /// The selection must already have passed [`Hyperslab::check`].
    pub fn runs(&self, dims: &[u64]) -> Runs {
        let rank = dims.len();
        let mut strides = vec![1u64; rank];
        for d in (0..rank.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * dims[d + 1];
        }
        let empty = self.count.iter().any(|&c| c == 0);
        Runs {
            start: self.start.clone(),
            count: self.count.clone(),
            strides,
            index: vec![0; rank.saturating_sub(1)],
            run_len: self.count.last().copied().unwrap_or(1),
            produced: 0,
            done: empty,
        }
    }
}

/// Iterator over the runs of a [`Hyperslab`].
#[derive(Debug, Clone)]
pub struct Runs {
    start: Vec<u64>,
    count: Vec<u64>,
    strides: Vec<u64>,
    index: Vec<u64>,
    run_len: u64,
    produced: u64,
    done: bool,
}

impl Iterator for Runs {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        if self.done {
            return None;
        }
        let rank = self.start.len();
        let mut offset = 0u64;
        for d in 0..rank {
            let coord = if d + 1 < rank {
                self.start[d] + self.index[d]
            } else {
                self.start[d]
            };
            offset += coord * self.strides[d];
        }
        let run = Run {
            dataset_offset: offset,
            buffer_offset: self.produced,
            len: self.run_len,
        };
        self.produced += self.run_len;

        // odometer over all but the fastest-varying dimension
        let mut d = self.index.len();
        loop {
            if d == 0 {
                self.done = true;
                break;
            }
            d -= 1;
            self.index[d] += 1;
            if self.index[d] < self.count[d] {
                break;
            }
            self.index[d] = 0;
        }
        Some(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_dimensional_is_one_run() {
        let slab = Hyperslab::new(vec![3], vec![4]);
        let runs: Vec<_> = slab.runs(&[10]).collect();
        assert_eq!(
            runs,
            vec![Run {
                dataset_offset: 3,
                buffer_offset: 0,
                len: 4
            }]
        );
    }

    #[test]
    fn two_dimensional_rows() {
        let slab = Hyperslab::new(vec![2, 1], vec![2, 3]);
        let runs: Vec<_> = slab.runs(&[4, 5]).collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].dataset_offset, 11);
        assert_eq!(runs[1].dataset_offset, 16);
        assert_eq!(runs[1].buffer_offset, 3);
    }

    #[test]
    fn three_dimensional_order() {
        let slab = Hyperslab::all(&[2, 2, 2]);
        let offsets: Vec<_> = slab.runs(&[2, 2, 2]).map(|r| r.dataset_offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6]);
    }

    #[test]
    fn scalar_dataspace_has_single_element() {
        let slab = Hyperslab::all(&[]);
        let runs: Vec<_> = slab.runs(&[]).collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len, 1);
        assert_eq!(slab.num_elements(), 1);
    }

    #[test]
    fn empty_count_has_no_runs() {
        let slab = Hyperslab::new(vec![0, 0], vec![0, 3]);
        assert_eq!(slab.runs(&[4, 5]).count(), 0);
    }

    #[test]
    fn check_rejects_out_of_bounds_and_rank() {
        let slab = Hyperslab::new(vec![8], vec![3]);
        assert!(matches!(
            slab.check("/d", &[10]),
            Err(StoreError::OutOfBounds { .. })
        ));
        let slab = Hyperslab::new(vec![0], vec![1]);
        assert!(matches!(
            slab.check("/d", &[2, 2]),
            Err(StoreError::RankMismatch { .. })
        ));
        assert!(Hyperslab::new(vec![7], vec![3]).check("/d", &[10]).is_ok());
    }

    #[test]
    fn check_rejects_overflowing_start() {
        let slab = Hyperslab::new(vec![u64::MAX], vec![2]);
        assert!(slab.check("/d", &[10]).is_err());
    }
}
