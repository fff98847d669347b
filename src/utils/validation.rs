//! Topology validation utilities.
//!
//! This module provides the closed-form edge counts of an area tiling and
//! the self check that compares them with a built topology.

use crate::topology::{AreaTiling, EdgeClass, Topology, TopologyError};

/// Expected number of links per class, possibly negative for tilings that
/// cannot describe the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedEdgeCounts {
    pub intra: i64,
    pub inter: i64,
    pub border: i64,
}

impl ExpectedEdgeCounts {
    pub fn get(&self, class: EdgeClass) -> i64 {
        match class {
            EdgeClass::Intra => self.intra,
            EdgeClass::Inter => self.inter,
            EdgeClass::Border => self.border,
        }
    }
}

/// Closed-form link counts for a `rows x cols` toroidal grid under `tiling`
///
/// Each area of `h x w` nodes has `2*h*w - (h + w)` internal links and
/// `2*(h + w)` links crossing its boundary. Everything else is backbone.
/// Without a stripe every node belongs to some area and all links are intra.
/// `tiling` must pass [`AreaTiling::check`].
///
/// # Examples
/// ```
/// use quaggasim::topology::AreaTiling;
/// use quaggasim::utils::validation::expected_edge_counts;
///
/// let counts = expected_edge_counts(&AreaTiling::default(), 6, 6);
/// assert_eq!((counts.intra, counts.inter, counts.border), (16, 24, 32));
/// ```
pub fn expected_edge_counts(tiling: &AreaTiling, rows: u32, cols: u32) -> ExpectedEdgeCounts {
    let total = 2 * rows as i64 * cols as i64;
    if tiling.stripe_width == 0 {
        return ExpectedEdgeCounts {
            intra: total,
            inter: 0,
            border: 0,
        };
    }

    let h = tiling.area_height as i64;
    let w = tiling.area_width as i64;
    let n_area = tiling.area_count() as i64;

    let intra = (2 * h * w - (h + w)) * n_area;
    let border = 2 * (h + w) * n_area;
    ExpectedEdgeCounts {
        intra,
        inter: total - intra - border,
        border,
    }
}

/// Check that the tiling describes the grid of `topology` and that its link
/// buckets match the closed-form counts.
///
/// A mismatch means the tiling does not describe the grid and the scenario
/// must not be used. Without a backbone stripe every link is intra whatever
/// the grid size, so the dimensions are compared first.
pub fn verify_edge_counts(topology: &Topology) -> Result<(), TopologyError> {
    let tiling = topology.tiling();
    if tiling.grid_rows() != topology.rows() || tiling.grid_cols() != topology.cols() {
        return Err(TopologyError::GridMismatch {
            rows: topology.rows(),
            cols: topology.cols(),
            tiling_rows: tiling.grid_rows(),
            tiling_cols: tiling.grid_cols(),
        });
    }

    let expected = expected_edge_counts(topology.tiling(), topology.rows(), topology.cols());
    let actual = topology.counts();

    for class in EdgeClass::ALL {
        if expected.get(class) != actual.get(class) as i64 {
            return Err(TopologyError::EdgeCountMismatch {
                class,
                expected: expected.get(class),
                actual: actual.get(class),
            });
        }
    }

    log::info!(
        "Edge counts verified: {} intra, {} inter, {} border / {}",
        actual.intra,
        actual.inter,
        actual.border,
        actual.total()
    );
    Ok(())
}

/// Warn when explicit grid dimensions differ from the ones the tiling was
/// designed for. The loader only warns; [`verify_edge_counts`] rejects the
/// scenario when it is built.
pub fn check_grid_matches_tiling(tiling: &AreaTiling, rows: u32, cols: u32) -> bool {
    let matches = tiling.grid_rows() == rows && tiling.grid_cols() == cols;
    if !matches {
        log::warn!(
            "Grid is {}x{} but the area tiling describes a {}x{} grid",
            rows,
            cols,
            tiling.grid_rows(),
            tiling.grid_cols()
        );
    }
    matches
}
