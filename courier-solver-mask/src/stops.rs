//! Bit assignment and precedence masks shared by the finders.

use std::collections::HashMap;

use courier_core::{Category, Fixed, Graph, GraphNode, ObjectId, PrecedenceMap, SolveError};

/// Largest stop count a `u64` visited-set can track.
pub(crate) const MASK_CAPACITY: usize = 64;

/// Stable enumeration of a graph's non-agent nodes.
///
/// Destinations take the low bits in graph order, origins follow. Every
/// lookup is keyed by the node's slot in [`Graph::nodes`].
#[derive(Debug)]
pub(crate) struct StopIndex<'g, N> {
    nodes: &'g [N],
    slots: HashMap<&'g N, usize>,
    bits: Vec<u64>,
    required: Vec<u64>,
    stops: Vec<usize>,
    full: u64,
}

impl<'g, N: GraphNode> StopIndex<'g, N> {
    /// Enumerate stops and resolve every destination's requirements.
    ///
    /// Fails when the graph holds more than `capacity` stops or when a
    /// destination requires an origin that is not a node of the graph.
    pub(crate) fn new(
        graph: &'g Graph<N>,
        precedence: &PrecedenceMap,
        capacity: usize,
    ) -> Result<Self, SolveError> {
        let nodes = graph.nodes();
        let slots: HashMap<&N, usize> = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node, slot))
            .collect();
        let stops: Vec<usize> = [Category::Destination, Category::Origin]
            .into_iter()
            .flat_map(|category| {
                nodes
                    .iter()
                    .enumerate()
                    .filter(move |(_, node)| node.category() == category)
                    .map(|(slot, _)| slot)
            })
            .collect();
        let capacity = capacity.min(MASK_CAPACITY);
        if stops.len() > capacity {
            return Err(SolveError::TooManyStops {
                stops: stops.len(),
                capacity,
            });
        }

        let mut bits = vec![0_u64; nodes.len()];
        let mut origin_bits: HashMap<ObjectId, u64> = HashMap::new();
        for (position, &slot) in stops.iter().enumerate() {
            let flag = bit_flag(position);
            if let Some(entry) = bits.get_mut(slot) {
                *entry = flag;
            }
            if let Some(node) = nodes.get(slot).filter(|node| node.category() == Category::Origin) {
                origin_bits.insert(node.object_id(), flag);
            }
        }

        let mut required = vec![0_u64; nodes.len()];
        for (slot, node) in nodes.iter().enumerate() {
            if node.category() != Category::Destination {
                continue;
            }
            let mut mask = 0_u64;
            for origin in precedence.requirements(&node.object_id()) {
                let flag = origin_bits
                    .get(origin)
                    .ok_or(SolveError::MissingReference {
                        destination: node.object_id(),
                        origin: *origin,
                    })?;
                mask |= flag;
            }
            if let Some(entry) = required.get_mut(slot) {
                *entry = mask;
            }
        }

        let full = u32::try_from(MASK_CAPACITY.saturating_sub(stops.len()))
            .ok()
            .and_then(|spare| u64::MAX.checked_shr(spare))
            .unwrap_or(0);
        Ok(Self {
            nodes,
            slots,
            bits,
            required,
            stops,
            full,
        })
    }

    /// Number of stops.
    pub(crate) fn len(&self) -> usize {
        self.stops.len()
    }

    /// Mask with every stop visited.
    pub(crate) const fn full_mask(&self) -> u64 {
        self.full
    }

    /// Slot of `node` in the graph.
    pub(crate) fn slot(&self, node: &N) -> Option<usize> {
        self.slots.get(node).copied()
    }

    /// Node at `slot`.
    pub(crate) fn node(&self, slot: usize) -> Option<&'g N> {
        self.nodes.get(slot)
    }

    /// Graph slot of the stop holding `position` in the enumeration.
    pub(crate) fn stop_slot(&self, position: usize) -> Option<usize> {
        self.stops.get(position).copied()
    }

    /// Visited-set bit of the node at `slot`; zero for the agent.
    pub(crate) fn bit(&self, slot: usize) -> u64 {
        self.bits.get(slot).copied().unwrap_or(0)
    }

    /// Whether the node at `slot` may be entered having visited `mask`.
    pub(crate) fn allows(&self, slot: usize, mask: u64) -> bool {
        let required = self.required.get(slot).copied().unwrap_or(0);
        required & !mask == 0
    }
}

/// Cost on arrival at `node` after travelling `weight` from a state costing
/// `cost`. Origins cannot be served before their ready time.
pub(crate) fn arrival_cost<N: GraphNode>(node: &N, cost: Fixed, weight: Fixed) -> Fixed {
    let travelled = cost + weight;
    match node.category() {
        Category::Origin => travelled.max(node.ready_time()),
        Category::Destination | Category::Agent => travelled,
    }
}

fn bit_flag(position: usize) -> u64 {
    u32::try_from(position)
        .ok()
        .and_then(|shift| 1_u64.checked_shl(shift))
        .unwrap_or(0)
}
