// Thu Oct 15 2026 - Alex

use crate::symbol::export::ExportTable;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

pub const DEFAULT_MAX_HOPS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStatus {
    Resolved,
    Cycle,
    DepthExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardChain {
    /// Ultimate target, or the symbol itself when unresolved.
    pub target: String,
    pub hops: usize,
    pub status: ChainStatus,
}

impl ForwardChain {
    pub fn is_resolved(&self) -> bool {
        self.status == ChainStatus::Resolved
    }
}

pub type ForwardMap = IndexMap<String, ForwardChain>;

/// Follows `forwarded_to` links for every forwarded export. A chain stops at
/// the first name that is not itself a forwarded export of this table.
pub fn resolve_forwarders(table: &ExportTable, max_hops: usize) -> ForwardMap {
    let mut map = ForwardMap::new();

    for export in table.iter() {
        if let Some(first) = export.forwarded_to.as_deref() {
            if first == export.name {
                map.insert(export.name.clone(), unresolved(&export.name, 1, ChainStatus::Cycle));
                continue;
            }
            let chain = follow_chain(table, &export.name, first, max_hops.max(1));
            map.insert(export.name.clone(), chain);
        }
    }

    let unresolved_count = map.values().filter(|c| !c.is_resolved()).count();
    if unresolved_count > 0 {
        log::warn!("{} forwarder chains could not be resolved", unresolved_count);
    }

    map
}

fn follow_chain(table: &ExportTable, start: &str, first: &str, max_hops: usize) -> ForwardChain {
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(start);

    let mut current = first;
    let mut hops = 1;

    loop {
        if !visited.insert(current) {
            return unresolved(start, hops, ChainStatus::Cycle);
        }
        match table.get(current).and_then(|s| s.forwarded_to.as_deref()) {
            Some(next) => {
                if hops >= max_hops {
                    return unresolved(start, hops, ChainStatus::DepthExceeded);
                }
                current = next;
                hops += 1;
            }
            None => {
                return ForwardChain {
                    target: current.to_string(),
                    hops,
                    status: ChainStatus::Resolved,
                }
            }
        }
    }
}

fn unresolved(start: &str, hops: usize, status: ChainStatus) -> ForwardChain {
    ForwardChain { target: start.to_string(), hops, status }
}
