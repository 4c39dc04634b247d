//! Edge classification (two-way vs one-way) and focus-dependent visibility.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::location::Location;
use crate::types::LocationId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: LocationId,
    pub to: LocationId,
    pub is_two_way: bool,
}

impl Edge {
    pub fn touches(&self, id: &LocationId) -> bool {
        &self.from == id || &self.to == id
    }

    /// Two-way edges always show; one-way edges only next to the focused location.
    pub fn is_visible(&self, focus: Option<&LocationId>) -> bool {
        self.is_two_way || focus.is_some_and(|focused| self.touches(focused))
    }
}

/// One edge per connected unordered pair, in the order their first exit appears.
pub fn classify(locations: &[Location]) -> Vec<Edge> {
    let mut targets: BTreeMap<&LocationId, BTreeSet<&LocationId>> = BTreeMap::new();
    for location in locations {
        targets
            .entry(&location.id)
            .or_default()
            .extend(location.exits.iter().map(|exit| &exit.target));
    }

    let mut recorded = BTreeSet::new();
    let mut edges = Vec::new();
    for location in locations {
        for exit in &location.exits {
            let (from, to) = (&location.id, &exit.target);
            if from == to {
                continue;
            }
            let Some(reverse) = targets.get(to) else {
                debug!(from = %from, to = %to, "exit target missing from snapshot");
                continue;
            };
            let pair = if from < to { (from, to) } else { (to, from) };
            if !recorded.insert(pair) {
                continue;
            }
            let is_two_way = reverse.contains(from);
            edges.push(Edge { from: from.clone(), to: to.clone(), is_two_way });
        }
    }
    edges
}

pub fn visible_edges<'a>(edges: &'a [Edge], focus: Option<&LocationId>) -> Vec<&'a Edge> {
    edges.iter().filter(|edge| edge.is_visible(focus)).collect()
}
