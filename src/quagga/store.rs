//! Per-node protocol configuration store.

use std::collections::BTreeMap;

use super::types::{ProtocolConfig, ProtocolKind, ProtocolRecord};
use crate::topology::NodeId;

/// The configuration records attached to one node, at most one per kind.
///
/// Records are created on first use through [`ProtocolConfigStore::get_or_create`]
/// and live as long as the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfigStore {
    node: NodeId,
    records: BTreeMap<ProtocolKind, ProtocolConfig>,
}

impl ProtocolConfigStore {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            records: BTreeMap::new(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Record of `kind`, created empty if the node has none yet
    pub fn get_or_create(&mut self, kind: ProtocolKind) -> &mut ProtocolConfig {
        let node = self.node;
        self.records.entry(kind).or_insert_with(|| {
            log::debug!("Node {}: creating {} record", node, kind);
            ProtocolConfig::new(kind, node)
        })
    }

    pub fn get(&self, kind: ProtocolKind) -> Option<&ProtocolConfig> {
        self.records.get(&kind)
    }

    pub fn contains(&self, kind: ProtocolKind) -> bool {
        self.records.contains_key(&kind)
    }

    /// Kinds present on this node, in daemon order
    pub fn kinds(&self) -> impl Iterator<Item = ProtocolKind> + '_ {
        self.records.keys().copied()
    }

    /// Records present on this node, in daemon order
    pub fn records(&self) -> impl Iterator<Item = &ProtocolConfig> {
        self.records.values()
    }

    /// Typed read access
    pub fn record<T: ProtocolRecord>(&self) -> Option<&T> {
        self.records.get(&T::KIND).and_then(T::from_config)
    }

    /// Typed write access, creating the record if needed
    pub fn record_mut<T: ProtocolRecord>(&mut self) -> &mut T {
        match T::from_config_mut(self.get_or_create(T::KIND)) {
            Some(record) => record,
            // get_or_create keys records by their own kind
            None => unreachable!("record stored under the wrong kind"),
        }
    }
}

/// One empty store per node
pub fn stores_for(nodes: &[NodeId]) -> Vec<ProtocolConfigStore> {
    nodes.iter().map(|node| ProtocolConfigStore::new(*node)).collect()
}
