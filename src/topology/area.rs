//! Area classification.
//!
//! Maps grid positions to OSPF areas and classifies links by the areas
//! of their endpoints. Everything here is a pure function of the tiling.

use super::types::{AreaTiling, EdgeClass, NodeId};

/// Area of the node at `(row, col)`.
///
/// Returns 0 when the position falls into the backbone stripe of its tile,
/// otherwise the 1-based, row-major number of the tile's area. `row` and
/// `col` must lie inside the grid and the tiling must have non-zero tile
/// dimensions.
pub fn area_id(tiling: &AreaTiling, row: u32, col: u32) -> u32 {
    let ax = row / tiling.tile_height();
    let axr = row % tiling.tile_height();
    let ay = col / tiling.tile_width();
    let ayr = col % tiling.tile_width();
    if axr >= tiling.area_height || ayr >= tiling.area_width {
        return 0;
    }
    // Saturates only on grids far larger than the tiling describes
    ax.saturating_mul(tiling.area_cols).saturating_add(ay).saturating_add(1)
}

/// Area of `node` in a grid with `cols` columns
pub fn area_of(tiling: &AreaTiling, cols: u32, node: NodeId) -> u32 {
    let (row, col) = node.position(cols);
    area_id(tiling, row, col)
}

/// An edge class together with the oriented endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedEdge {
    pub class: EdgeClass,
    pub first: NodeId,
    pub second: NodeId,
}

/// Classify the link between two adjacent nodes.
///
/// Border links are oriented so the in-area node comes first. Two nodes of
/// different leaf areas can only touch when there is no backbone stripe;
/// such links are treated as intra-area links of the first node's area.
pub fn classify_edge(tiling: &AreaTiling, cols: u32, a: NodeId, b: NodeId) -> ClassifiedEdge {
    let area_a = area_of(tiling, cols, a);
    let area_b = area_of(tiling, cols, b);

    let (class, first, second) = match (area_a, area_b) {
        (0, 0) => (EdgeClass::Inter, a, b),
        (_, 0) => (EdgeClass::Border, a, b),
        (0, _) => (EdgeClass::Border, b, a),
        (x, y) => {
            if x != y {
                if tiling.stripe_width > 0 {
                    log::warn!(
                        "Node {} (area {}) is adjacent to node {} (area {}) despite a backbone stripe; the tiling does not match the grid",
                        a, x, b, y
                    );
                } else {
                    log::debug!("Areas {} and {} touch between nodes {} and {}", x, y, a, b);
                }
            }
            (EdgeClass::Intra, a, b)
        }
    };

    ClassifiedEdge { class, first, second }
}
