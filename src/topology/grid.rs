//! Toroidal grid construction.
//!
//! Every node links to its east and south neighbour, wrapping around both
//! axes, so a `rows x cols` grid always has `2 * rows * cols` links. Links
//! are bucketed by class in creation order; the bucket position becomes the
//! link id used for address allocation.

use log::{debug, info};

use super::area::{classify_edge, ClassifiedEdge};
use super::types::{AreaTiling, Edge, EdgeClass, NodeId, Topology, TopologyError};

/// Build a `rows x cols` toroidal grid partitioned by `tiling`.
///
/// The result is fully deterministic: nodes are visited in row-major order
/// and each node contributes its east link before its south link.
pub fn build_grid(rows: u32, cols: u32, tiling: &AreaTiling) -> Result<Topology, TopologyError> {
    if rows == 0 || cols == 0 {
        return Err(TopologyError::EmptyGrid { rows, cols });
    }
    tiling.check()?;
    let node_count = rows
        .checked_mul(cols)
        .filter(|n| n.checked_mul(2).is_some())
        .ok_or(TopologyError::GridTooLarge { rows, cols })?;

    let mut topology = Topology {
        rows,
        cols,
        tiling: *tiling,
        nodes: (0..node_count).map(NodeId).collect(),
        intra: Vec::new(),
        inter: Vec::new(),
        border: Vec::new(),
    };

    let mut seq = 0;
    for row in 0..rows {
        for col in 0..cols {
            let id = NodeId::from_position(row, col, cols);
            let east = NodeId::from_position(row, (col + 1) % cols, cols);
            let south = NodeId::from_position((row + 1) % rows, col, cols);
            debug!("Node {} - {} {}", id, east, south);

            for neighbor in [east, south] {
                push_edge(&mut topology, classify_edge(tiling, cols, id, neighbor), seq);
                seq += 1;
            }
        }
    }

    let counts = topology.counts();
    info!(
        "Built {}x{} grid: {} nodes, {} intra, {} inter, {} border links",
        rows,
        cols,
        node_count,
        counts.intra,
        counts.inter,
        counts.border
    );

    Ok(topology)
}

fn push_edge(topology: &mut Topology, classified: ClassifiedEdge, seq: u32) {
    let bucket = match classified.class {
        EdgeClass::Intra => &mut topology.intra,
        EdgeClass::Inter => &mut topology.inter,
        EdgeClass::Border => &mut topology.border,
    };
    let link_id = bucket.len() as u32;
    bucket.push(Edge {
        a: classified.first,
        b: classified.second,
        link_id,
        seq,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiling_counts() {
        let tiling = AreaTiling::default();
        let topology = build_grid(tiling.grid_rows(), tiling.grid_cols(), &tiling).unwrap();

        let counts = topology.counts();
        assert_eq!(topology.node_count(), 36);
        assert_eq!(counts.total(), 72);
        // 4 areas of 2x2: 4 intra and 8 border links each
        assert_eq!(counts.intra, 16);
        assert_eq!(counts.border, 32);
        assert_eq!(counts.inter, 24);
    }

    #[test]
    fn test_four_by_four_without_stripes() {
        let tiling = AreaTiling {
            area_height: 2,
            area_width: 2,
            stripe_width: 0,
            area_rows: 2,
            area_cols: 2,
        };
        let topology = build_grid(4, 4, &tiling).unwrap();

        assert_eq!(topology.area_count(), 4);
        assert!(topology.nodes().iter().all(|n| topology.area_of(*n) != 0));

        let counts = topology.counts();
        assert_eq!(counts.intra, 32);
        assert_eq!(counts.inter, 0);
        assert_eq!(counts.border, 0);
    }

    #[test]
    fn test_link_ids_follow_bucket_order() {
        let tiling = AreaTiling::default();
        let topology = build_grid(6, 6, &tiling).unwrap();

        for class in EdgeClass::ALL {
            let edges = topology.edges(class);
            for (i, edge) in edges.iter().enumerate() {
                assert_eq!(edge.link_id as usize, i);
            }
            assert!(edges.windows(2).all(|w| w[0].seq < w[1].seq));
        }
    }

    #[test]
    fn test_creation_order_covers_every_sequence_number() {
        let tiling = AreaTiling::default();
        let topology = build_grid(6, 6, &tiling).unwrap();

        let ordered = topology.edges_in_creation_order();
        assert_eq!(ordered.len(), 72);
        for (i, (_, edge)) in ordered.iter().enumerate() {
            assert_eq!(edge.seq as usize, i);
        }
        // Node 0 creates the first two links: east to 1, south to 6
        assert_eq!(ordered[0].1.endpoints(), (NodeId(0), NodeId(1)));
        assert_eq!(ordered[1].1.endpoints(), (NodeId(0), NodeId(6)));
    }

    #[test]
    fn test_border_links_start_inside_an_area() {
        let tiling = AreaTiling::default();
        let topology = build_grid(6, 6, &tiling).unwrap();

        for edge in topology.border_edges() {
            assert_ne!(topology.area_of(edge.a), 0);
            assert_eq!(topology.area_of(edge.b), 0);
        }
        for edge in topology.inter_edges() {
            assert_eq!(topology.area_of(edge.a), 0);
            assert_eq!(topology.area_of(edge.b), 0);
        }
    }

    #[test]
    fn test_builds_are_reproducible() {
        let tiling = AreaTiling::default();
        let first = build_grid(6, 6, &tiling).unwrap();
        let second = build_grid(6, 6, &tiling).unwrap();
        assert_eq!(first.intra_edges(), second.intra_edges());
        assert_eq!(first.inter_edges(), second.inter_edges());
        assert_eq!(first.border_edges(), second.border_edges());
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let tiling = AreaTiling::default();
        assert_eq!(
            build_grid(0, 4, &tiling).unwrap_err(),
            TopologyError::EmptyGrid { rows: 0, cols: 4 }
        );
    }

    #[test]
    fn test_oversized_tiling_is_rejected() {
        let tiling = AreaTiling {
            area_height: 4_000_000_000,
            area_width: 2,
            stripe_width: 1_000_000_000,
            area_rows: 2,
            area_cols: 2,
        };
        assert_eq!(
            build_grid(6, 6, &tiling).unwrap_err(),
            TopologyError::TilingTooLarge { tiling }
        );

        let empty = AreaTiling { area_rows: 0, ..AreaTiling::default() };
        assert_eq!(
            build_grid(6, 6, &empty).unwrap_err(),
            TopologyError::DegenerateTiling { tiling: empty }
        );
    }

    #[test]
    fn test_ring_of_one_column() {
        // A 128x1 ring: every node links to itself eastwards and to the next row southwards
        let tiling = AreaTiling::single_area(128, 1);
        let topology = build_grid(128, 1, &tiling).unwrap();
        assert_eq!(topology.counts().intra, 256);
        assert_eq!(topology.nodes_in_area(1).len(), 128);
    }
}
