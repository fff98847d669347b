//! Topology type definitions.
//!
//! This file contains the node, tiling and edge types shared by the
//! area classifier, the grid builder and the address plan.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::area;

/// Identifier of a simulated router, `0..rows*cols` in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Build the id of the node at `(row, col)` in a grid with `cols` columns
    pub fn from_position(row: u32, col: u32, cols: u32) -> Self {
        NodeId(row * cols + col)
    }

    /// Logical `(row, col)` position of this node in a grid with `cols` columns
    pub fn position(self, cols: u32) -> (u32, u32) {
        (self.0 / cols, self.0 % cols)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repeating area pattern laid over the grid.
///
/// Each tile is `(area_height + stripe_width) x (area_width + stripe_width)`
/// nodes. The top-left `area_height x area_width` block of a tile belongs to
/// a leaf area, the remaining stripe belongs to the backbone (area 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaTiling {
    pub area_height: u32,
    pub area_width: u32,
    #[serde(default)]
    pub stripe_width: u32,
    pub area_rows: u32,
    pub area_cols: u32,
}

impl AreaTiling {
    /// A tiling with one area covering the whole `rows x cols` grid and no
    /// backbone stripe. Every node ends up in area 1.
    pub fn single_area(rows: u32, cols: u32) -> Self {
        Self {
            area_height: rows,
            area_width: cols,
            stripe_width: 0,
            area_rows: 1,
            area_cols: 1,
        }
    }

    // Sizes saturate instead of overflowing; `check` rejects such tilings

    pub fn tile_height(&self) -> u32 {
        self.area_height.saturating_add(self.stripe_width)
    }

    pub fn tile_width(&self) -> u32 {
        self.area_width.saturating_add(self.stripe_width)
    }

    /// Number of grid rows this tiling is designed for
    pub fn grid_rows(&self) -> u32 {
        self.tile_height().saturating_mul(self.area_rows)
    }

    /// Number of grid columns this tiling is designed for
    pub fn grid_cols(&self) -> u32 {
        self.tile_width().saturating_mul(self.area_cols)
    }

    /// Number of leaf areas (area 0 excluded)
    pub fn area_count(&self) -> u32 {
        self.area_rows.saturating_mul(self.area_cols)
    }

    /// Check that every area is non-empty and that the grid this tiling
    /// describes, and its `2 * rows * cols` links, can be numbered in `u32`.
    pub fn check(&self) -> Result<(), TopologyError> {
        if self.area_height == 0 || self.area_width == 0 || self.area_rows == 0 || self.area_cols == 0 {
            return Err(TopologyError::DegenerateTiling { tiling: *self });
        }
        let rows = self
            .area_height
            .checked_add(self.stripe_width)
            .and_then(|h| h.checked_mul(self.area_rows));
        let cols = self
            .area_width
            .checked_add(self.stripe_width)
            .and_then(|w| w.checked_mul(self.area_cols));
        let links = rows
            .zip(cols)
            .and_then(|(rows, cols)| rows.checked_mul(cols))
            .and_then(|nodes| nodes.checked_mul(2));
        if links.is_none() {
            return Err(TopologyError::TilingTooLarge { tiling: *self });
        }
        Ok(())
    }

    pub fn area_size(&self) -> u32 {
        self.area_height * self.area_width
    }
}

impl Default for AreaTiling {
    fn default() -> Self {
        Self {
            area_height: 2,
            area_width: 2,
            stripe_width: 1,
            area_rows: 2,
            area_cols: 2,
        }
    }
}

/// Class of a grid link, derived from the areas of its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeClass {
    /// Both endpoints inside a leaf area
    Intra,
    /// Both endpoints on the backbone
    Inter,
    /// One leaf-area endpoint (listed first) and one backbone endpoint
    Border,
}

impl EdgeClass {
    pub const ALL: [EdgeClass; 3] = [EdgeClass::Intra, EdgeClass::Inter, EdgeClass::Border];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeClass::Intra => "intra",
            EdgeClass::Inter => "inter",
            EdgeClass::Border => "border",
        }
    }
}

impl fmt::Display for EdgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-to-point link between two grid neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// First endpoint (the in-area node for border links)
    pub a: NodeId,
    pub b: NodeId,
    /// Position of this edge inside its class bucket
    pub link_id: u32,
    /// Global creation index across all classes
    pub seq: u32,
}

impl Edge {
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    /// The endpoint opposite to `node`, if `node` is on this edge
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Number of edges per class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EdgeCounts {
    pub intra: usize,
    pub inter: usize,
    pub border: usize,
}

impl EdgeCounts {
    pub fn total(&self) -> usize {
        self.intra + self.inter + self.border
    }

    pub fn get(&self, class: EdgeClass) -> usize {
        match class {
            EdgeClass::Intra => self.intra,
            EdgeClass::Inter => self.inter,
            EdgeClass::Border => self.border,
        }
    }
}

/// Errors raised while building or checking a grid topology
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("Grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u32, cols: u32 },
    #[error("Grid of {rows}x{cols} nodes has too many links to number")]
    GridTooLarge { rows: u32, cols: u32 },
    #[error("Area tiling has an empty area or no areas ({tiling:?})")]
    DegenerateTiling { tiling: AreaTiling },
    #[error("Area tiling describes a grid too large to number ({tiling:?})")]
    TilingTooLarge { tiling: AreaTiling },
    #[error("Grid is {rows}x{cols} but the area tiling describes a {tiling_rows}x{tiling_cols} grid")]
    GridMismatch {
        rows: u32,
        cols: u32,
        tiling_rows: u32,
        tiling_cols: u32,
    },
    #[error("{class} link number does not match: expected {expected}, built {actual}")]
    EdgeCountMismatch {
        class: EdgeClass,
        expected: i64,
        actual: usize,
    },
}

/// A toroidal grid partitioned into areas, with its links bucketed by class.
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) rows: u32,
    pub(crate) cols: u32,
    pub(crate) tiling: AreaTiling,
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) intra: Vec<Edge>,
    pub(crate) inter: Vec<Edge>,
    pub(crate) border: Vec<Edge>,
}

impl Topology {
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn tiling(&self) -> &AreaTiling {
        &self.tiling
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn intra_edges(&self) -> &[Edge] {
        &self.intra
    }

    pub fn inter_edges(&self) -> &[Edge] {
        &self.inter
    }

    pub fn border_edges(&self) -> &[Edge] {
        &self.border
    }

    pub fn edges(&self, class: EdgeClass) -> &[Edge] {
        match class {
            EdgeClass::Intra => &self.intra,
            EdgeClass::Inter => &self.inter,
            EdgeClass::Border => &self.border,
        }
    }

    pub fn counts(&self) -> EdgeCounts {
        EdgeCounts {
            intra: self.intra.len(),
            inter: self.inter.len(),
            border: self.border.len(),
        }
    }

    /// All edges tagged with their class, in the order they were created
    pub fn edges_in_creation_order(&self) -> Vec<(EdgeClass, &Edge)> {
        let mut all: Vec<(EdgeClass, &Edge)> = EdgeClass::ALL
            .iter()
            .flat_map(|class| self.edges(*class).iter().map(move |edge| (*class, edge)))
            .collect();
        all.sort_by_key(|(_, edge)| edge.seq);
        all
    }

    /// Area of a node (0 for the backbone)
    pub fn area_of(&self, node: NodeId) -> u32 {
        area::area_of(&self.tiling, self.cols, node)
    }

    pub fn area_count(&self) -> u32 {
        self.tiling.area_count()
    }

    pub fn nodes_in_area(&self, area: u32) -> Vec<NodeId> {
        self.nodes
            .iter()
            .copied()
            .filter(|node| self.area_of(*node) == area)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_position_round_trip() {
        let node = NodeId::from_position(2, 3, 6);
        assert_eq!(node, NodeId(15));
        assert_eq!(node.position(6), (2, 3));
    }

    #[test]
    fn test_default_tiling_dimensions() {
        let tiling = AreaTiling::default();
        assert_eq!(tiling.grid_rows(), 6);
        assert_eq!(tiling.grid_cols(), 6);
        assert_eq!(tiling.area_count(), 4);
        assert_eq!(tiling.area_size(), 4);
    }

    #[test]
    fn test_edge_other_endpoint() {
        let edge = Edge { a: NodeId(1), b: NodeId(7), link_id: 0, seq: 3 };
        assert_eq!(edge.other(NodeId(1)), Some(NodeId(7)));
        assert_eq!(edge.other(NodeId(7)), Some(NodeId(1)));
        assert_eq!(edge.other(NodeId(2)), None);
    }
}
