//! Kernel-based rows.
//!
//! `b[i]` starts at the guidance Laplacian of the pixel. Every in-bounds tap
//! either lands on another unknown (coefficient) or on a known pixel, whose
//! weighted value moves to the right-hand side. Out-of-bounds taps are skipped.

use super::{Inputs, Row};

pub(super) fn row(inputs: &Inputs<'_>, id: usize) -> Row {
    let (x, y) = inputs.vars.pixel(id);
    let mut row = Row::with_rhs(inputs.guidance.laplacian(x, y));

    for tap in inputs.kernel.taps() {
        let (qx, qy) = (x as i64 + tap.dx, y as i64 + tap.dy);
        if !inputs.target.contains(qx, qy) {
            continue;
        }
        let (qx, qy) = (qx as usize, qy as usize);
        match inputs.vars.id(qx, qy) {
            Some(j) => row.add(j, tap.weight),
            None => row.rhs -= inputs.target[(qx, qy)] * tap.weight,
        }
    }

    row
}
