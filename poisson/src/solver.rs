//! Direct sparse solve of an assembled system.

use std::fmt::Debug;
use std::panic::{catch_unwind, AssertUnwindSafe};

use faer::prelude::*;
use faer::sparse::{SparseColMat, Triplet};
use faer::{Mat, Side};

use crate::config::SolverKind;
use crate::error::{Error, Result};
use crate::system::LinearSystem;

/// Entries of `A` and `A^T` closer than this count as equal.
const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Solves `A x = b` and returns `x` in variable-id order.
///
/// [`SolverKind::Cholesky`] is honored only when the matrix is symmetric with
/// a uniformly signed diagonal; a negative definite system is negated first.
/// Any other case, and a failed Cholesky factorization, falls back to LU.
pub fn solve(mut system: LinearSystem, requested: SolverKind) -> Result<Vec<f64>> {
    let n = system.size();
    if n == 0 {
        return Ok(Vec::new());
    }

    let kind = match requested {
        SolverKind::Lu => SolverKind::Lu,
        SolverKind::Cholesky => match cholesky_sign(&system) {
            Some(sign) => {
                if sign < 0.0 {
                    system.negate();
                }
                SolverKind::Cholesky
            }
            None => {
                tracing::debug!(unknowns = n, "Matrix is not symmetric definite, using LU");
                SolverKind::Lu
            }
        },
    };

    let triplets: Vec<Triplet<usize, usize, f64>> = system
        .triplets()
        .map(|(row, col, val)| Triplet::new(row, col, val))
        .collect();
    let a = SparseColMat::<usize, f64>::try_new_from_triplets(n, n, &triplets)
        .map_err(|e| Error::SingularSystem(format!("invalid sparse matrix: {e:?}")))?;
    let rhs = system.rhs();
    let b = Mat::from_fn(n, 1, |i, _| rhs[i]);

    let x = match kind {
        SolverKind::Cholesky => match factorize(|| a.as_ref().sp_cholesky(Side::Lower)) {
            Ok(llt) => llt.solve(b.as_ref()),
            Err(reason) => {
                tracing::debug!(%reason, "Cholesky factorization failed, using LU");
                lu_solve(&a, &b)?
            }
        },
        SolverKind::Lu => lu_solve(&a, &b)?,
    };

    let values: Vec<f64> = (0..n).map(|i| x[(i, 0)]).collect();
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(Error::SingularSystem(format!(
            "non-finite solution value for unknown {i}"
        )));
    }

    tracing::debug!(
        unknowns = n,
        solver = %kind,
        residual = system.residual(&values),
        "Sparse solve finished"
    );
    Ok(values)
}

fn lu_solve(a: &SparseColMat<usize, f64>, b: &Mat<f64>) -> Result<Mat<f64>> {
    let lu = factorize(|| a.as_ref().sp_lu())
        .map_err(|reason| Error::SingularSystem(format!("LU factorization failed: {reason}")))?;
    Ok(lu.solve(b.as_ref()))
}

/// Runs a faer factorization. faer reports structural singularity as an
/// error but panics on an exactly zero numeric pivot; both become `Err`.
fn factorize<T, E, F>(f: F) -> std::result::Result<T, String>
where
    E: Debug,
    F: FnOnce() -> std::result::Result<T, E>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(factors)) => Ok(factors),
        Ok(Err(e)) => Err(format!("{e:?}")),
        Err(_) => Err("zero pivot".to_string()),
    }
}

/// Sign to apply before a Cholesky solve, or `None` if Cholesky is unsuitable.
fn cholesky_sign(system: &LinearSystem) -> Option<f64> {
    if !system.is_symmetric(SYMMETRY_TOLERANCE) {
        return None;
    }
    system.diagonal_sign()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::Row;

    fn row(entries: &[(usize, f64)], rhs: f64) -> Row {
        Row {
            entries: entries.to_vec(),
            rhs,
        }
    }

    fn tridiagonal(n: usize) -> LinearSystem {
        let rows = (0..n)
            .map(|i| {
                let mut entries = vec![(i, 2.0)];
                if i > 0 {
                    entries.push((i - 1, -1.0));
                }
                if i + 1 < n {
                    entries.push((i + 1, -1.0));
                }
                row(&entries, 1.0)
            })
            .collect();
        LinearSystem::from_rows(rows)
    }

    #[test]
    fn test_lu_solves_small_system() {
        // [2 1; 1 3] x = [3; 5] => x = [0.8, 1.4]
        let system = LinearSystem::from_rows(vec![
            row(&[(0, 2.0), (1, 1.0)], 3.0),
            row(&[(0, 1.0), (1, 3.0)], 5.0),
        ]);
        let x = solve(system, SolverKind::Lu).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_matches_lu() {
        let lu = solve(tridiagonal(20), SolverKind::Lu).unwrap();
        let llt = solve(tridiagonal(20), SolverKind::Cholesky).unwrap();
        for (a, b) in lu.iter().zip(&llt) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn test_cholesky_negative_definite() {
        let mut system = tridiagonal(10);
        let expected = solve(system.clone(), SolverKind::Lu).unwrap();
        system.negate();
        let x = solve(system, SolverKind::Cholesky).unwrap();
        for (a, b) in expected.iter().zip(&x) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cholesky_falls_back_on_asymmetric() {
        let system = LinearSystem::from_rows(vec![
            row(&[(0, 4.0), (1, 1.0)], 5.0),
            row(&[(1, 2.0)], 2.0),
        ]);
        assert!(!system.is_symmetric(SYMMETRY_TOLERANCE));
        let x = solve(system, SolverKind::Cholesky).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_matrix_is_reported() {
        let system = LinearSystem::from_rows(vec![
            row(&[(0, 1.0), (1, 2.0)], 1.0),
            row(&[(0, 2.0), (1, 4.0)], 3.0),
        ]);
        let err = solve(system, SolverKind::Lu).unwrap_err();
        assert!(matches!(err, Error::SingularSystem(_)));
    }

    #[test]
    fn test_singular_cholesky_request_is_reported() {
        // Symmetric with a positive diagonal, so Cholesky is tried first,
        // fails, and the LU fallback meets a zero pivot.
        let system = LinearSystem::from_rows(vec![
            row(&[(0, 1.0), (1, 1.0)], 1.0),
            row(&[(0, 1.0), (1, 1.0)], 2.0),
        ]);
        let err = solve(system, SolverKind::Cholesky).unwrap_err();
        assert!(matches!(err, Error::SingularSystem(_)));
    }

    #[test]
    fn test_factorize_maps_panic_to_error() {
        let result: std::result::Result<(), String> =
            factorize(|| -> std::result::Result<(), ()> { panic!("pivot") });
        assert_eq!(result, Err("zero pivot".to_string()));
    }

    #[test]
    fn test_empty_system() {
        let x = solve(LinearSystem::from_rows(Vec::new()), SolverKind::Lu).unwrap();
        assert!(x.is_empty());
    }
}
