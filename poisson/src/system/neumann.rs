//! Experimental rows.
//!
//! A hole pixel with at least one VALID 4-neighbor is pinned to the mean of
//! those neighbors. Every other hole pixel gets the variational row. The
//! matrix is not symmetric, since pinned rows drop their hole neighbors.

use super::{variational, Inputs, Row};

pub(super) fn row(inputs: &Inputs<'_>, id: usize) -> Row {
    let (x, y) = inputs.vars.pixel(id);
    if !inputs.mask.has_valid_4_neighbor(x, y) {
        return variational::row(inputs, id);
    }

    let mut row = Row::with_rhs(0.0);
    let mut count = 0.0;
    for (qx, qy) in inputs.mask.valid_4_neighbors(x, y) {
        row.rhs += inputs.target[(qx, qy)];
        count += 1.0;
    }
    row.add(id, count);
    row
}
