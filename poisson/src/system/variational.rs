//! Edge-based rows.
//!
//! Each in-bounds 4-neighbor `q` of `p` contributes one edge of the energy
//! `sum (u_p - u_q - v_pq)^2`, where `v_pq` is the mean of the guidance at `p`
//! and `q` projected onto `p - q`. The diagonal counts the edges, hole
//! neighbors get -1 and valid neighbors move their value to the right-hand
//! side. The resulting matrix is symmetric.

use crate::mask::NEIGHBORS_4;

use super::{Inputs, Row};

pub(super) fn row(inputs: &Inputs<'_>, id: usize) -> Row {
    let (x, y) = inputs.vars.pixel(id);
    let (px, py) = inputs.guidance.gradient(x, y);
    let mut row = Row::with_rhs(0.0);
    let mut edges = 0.0;

    for &(dx, dy) in &NEIGHBORS_4 {
        let (qx, qy) = (x as i64 + dx, y as i64 + dy);
        if !inputs.target.contains(qx, qy) {
            continue;
        }
        let (qx, qy) = (qx as usize, qy as usize);
        edges += 1.0;

        match inputs.vars.id(qx, qy) {
            Some(j) => row.add(j, -1.0),
            None => row.rhs += inputs.target[(qx, qy)],
        }

        let (gx, gy) = inputs.guidance.gradient(qx, qy);
        let (ax, ay) = ((px + gx) * 0.5, (py + gy) * 0.5);
        row.rhs -= ax * dx as f64 + ay * dy as f64;
    }

    row.add(id, edges);
    row
}
