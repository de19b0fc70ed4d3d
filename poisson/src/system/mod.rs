//! Sparse linear system assembly.
//!
//! One row per hole pixel. Each method builds its rows from the same shared,
//! read-only inputs, so rows are independent and may be assembled on the rayon
//! pool. Rows are always collected in id order.

mod neumann;
mod poisson;
mod variational;


use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::config::FillMethod;
use crate::error::Result;
use crate::guidance::Resolved;
use crate::kernel::LaplacianKernel;
use crate::mask::Mask;
use crate::raster::Raster;
use crate::variables::VariableMap;

/// One equation: sparse coefficients and its right-hand side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// `(column, weight)` pairs, sorted by column with no duplicates once
    /// [`Row::coalesce`] has run.
    pub entries: Vec<(usize, f64)>,
    pub rhs: f64,
}

impl Row {
    pub fn with_rhs(rhs: f64) -> Self {
        Self {
            entries: Vec::with_capacity(9),
            rhs,
        }
    }

    #[inline]
    pub fn add(&mut self, col: usize, weight: f64) {
        self.entries.push((col, weight));
    }

    /// Sorts by column and sums entries that hit the same column.
    pub fn coalesce(&mut self) {
        self.entries.sort_unstable_by_key(|&(col, _)| col);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(self.entries.len());
        for &(col, weight) in &self.entries {
            match merged.last_mut() {
                Some(last) if last.0 == col => last.1 += weight,
                _ => merged.push((col, weight)),
            }
        }
        self.entries = merged;
    }

    /// Coefficient at `col`, zero if absent. Requires a coalesced row.
    pub fn coefficient(&self, col: usize) -> f64 {
        self.entries
            .binary_search_by_key(&col, |&(c, _)| c)
            .map_or(0.0, |i| self.entries[i].1)
    }
}

/// Read-only inputs shared by every row.
pub(crate) struct Inputs<'a> {
    pub target: &'a Raster<f64>,
    pub mask: &'a Mask,
    pub vars: &'a VariableMap,
    pub guidance: &'a Resolved<'a>,
    pub kernel: &'a LaplacianKernel,
}

/// Square sparse system `A x = b` indexed by variable id.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    rows: Vec<Row>,
}

impl LinearSystem {
    /// Builds the system for `method`, one coalesced row per variable.
    ///
    /// `cancel` is checked before every row.
    pub(crate) fn assemble(
        method: FillMethod,
        inputs: &Inputs<'_>,
        parallel: bool,
        cancel: &CancelToken,
    ) -> Result<Self> {
        let build = |id: usize| -> Result<Row> {
            cancel.check()?;
            let mut row = match method {
                FillMethod::Poisson => poisson::row(inputs, id),
                FillMethod::Variational => variational::row(inputs, id),
                FillMethod::Neumann => neumann::row(inputs, id),
            };
            row.coalesce();
            Ok(row)
        };

        let n = inputs.vars.len();
        let rows = if parallel {
            (0..n).into_par_iter().map(build).collect::<Result<Vec<_>>>()?
        } else {
            (0..n).map(build).collect::<Result<Vec<_>>>()?
        };

        Ok(Self { rows })
    }

    /// Builds a system directly from rows. Rows are coalesced.
    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        rows.iter_mut().for_each(Row::coalesce);
        Self { rows }
    }

    /// Number of unknowns.
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Number of stored non-zero coefficients.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.entries.len()).sum()
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rhs(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.rhs).collect()
    }

    /// `(row, col, value)` for every stored coefficient.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(|(i, row)| {
            row.entries.iter().map(move |&(j, v)| (i, j, v))
        })
    }

    pub fn diagonal(&self, i: usize) -> f64 {
        self.rows[i].coefficient(i)
    }

    /// True if `A[i][j] == A[j][i]` within `tol` for every stored entry.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.triplets()
            .all(|(i, j, v)| i == j || (self.rows[j].coefficient(i) - v).abs() <= tol)
    }

    /// `Some(1.0)` if every diagonal entry is positive, `Some(-1.0)` if every
    /// one is negative, `None` otherwise.
    pub fn diagonal_sign(&self) -> Option<f64> {
        let mut diag = (0..self.size()).map(|i| self.diagonal(i));
        let first = diag.next()?;
        let sign = if first > 0.0 {
            1.0
        } else if first < 0.0 {
            -1.0
        } else {
            return None;
        };
        diag.all(|d| d * sign > 0.0).then_some(sign)
    }

    /// Flips the sign of every coefficient and right-hand side.
    pub fn negate(&mut self) {
        for row in &mut self.rows {
            row.rhs = -row.rhs;
            row.entries.iter_mut().for_each(|e| e.1 = -e.1);
        }
    }

    /// `max_i |(A x - b)_i|`.
    pub fn residual(&self, x: &[f64]) -> f64 {
        self.rows
            .iter()
            .map(|row| {
                let ax: f64 = row.entries.iter().map(|&(j, v)| v * x[j]).sum();
                (ax - row.rhs).abs()
            })
            .fold(0.0, f64::max)
    }
}
