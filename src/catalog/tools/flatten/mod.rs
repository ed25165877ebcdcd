use crate::catalog::tools::model::{BLACKHOLE_SHARD, CategoryNode, CategoryRecord};

/// Order in which the tree walk emits records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Node first, then its children left to right.
    PreOrder,
    /// Children pushed in document order onto a LIFO stack, so siblings come
    /// out last-to-first.
    Stack,
}

/// Depth reported for nodes that carry no child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafDepth {
    /// Keep the true depth.
    Actual,
    /// Drop the depth so the record is exported with the sentinel level.
    Sentinel,
}

/// What happens to nodes eligible for a filter lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    /// Requests are collected but never executed.
    Scheduled,
    /// Requests are collected and executed once the tree walk is done.
    Executed,
}

/// Knobs that distinguish the sequential and the concurrent exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalPolicy {
    pub order: TraversalOrder,
    pub leaf_depth: LeafDepth,
    pub enrichment: Enrichment,
}

impl TraversalPolicy {
    /// Blocking exporter: pre-order walk, childless nodes lose their depth and
    /// filter lookups are never performed.
    pub const fn sequential() -> Self {
        Self {
            order: TraversalOrder::PreOrder,
            leaf_depth: LeafDepth::Sentinel,
            enrichment: Enrichment::Scheduled,
        }
    }

    /// Async exporter: stack walk, true depth everywhere and filter lookups
    /// joined after each root.
    pub const fn concurrent() -> Self {
        Self {
            order: TraversalOrder::Stack,
            leaf_depth: LeafDepth::Actual,
            enrichment: Enrichment::Executed,
        }
    }

    pub fn executes_enrichment(&self) -> bool {
        self.enrichment == Enrichment::Executed
    }
}

/// A filter lookup requested by one node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRequest {
    pub node_id: i64,
    pub shard: String,
    pub query: String,
}

impl EnrichmentRequest {
    /// Returns a request when the node has a usable shard and a query.
    pub fn for_node(node: &CategoryNode) -> Option<Self> {
        let shard = node.shard.as_deref().filter(|shard| is_routable_shard(shard))?;
        let query = node.query.as_deref().filter(|query| !query.is_empty())?;
        Some(Self {
            node_id: node.id,
            shard: shard.to_string(),
            query: query.to_string(),
        })
    }
}

fn is_routable_shard(shard: &str) -> bool {
    !shard.is_empty() && shard != BLACKHOLE_SHARD
}

/// Output of walking one root block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedTree {
    pub records: Vec<CategoryRecord>,
    /// Filter lookups in the order their nodes were visited.
    pub enrichments: Vec<EnrichmentRequest>,
}

/// Walks the tree rooted at `root` and emits one record per node.
///
/// The root block is at depth 1 and each descent adds one. Both orders use
/// an explicit stack, so deep menus cannot overflow the call stack.
pub fn flatten_tree(root: &CategoryNode, policy: &TraversalPolicy) -> FlattenedTree {
    let mut flattened = FlattenedTree::default();
    let mut stack: Vec<(&CategoryNode, u32)> = vec![(root, 1)];

    while let Some((node, depth)) = stack.pop() {
        flattened.records.push(record_for(node, depth, policy));

        if let Some(request) = EnrichmentRequest::for_node(node) {
            flattened.enrichments.push(request);
        }

        if let Some(children) = &node.children {
            let next = depth + 1;
            match policy.order {
                TraversalOrder::PreOrder => {
                    stack.extend(children.iter().rev().map(|child| (child, next)))
                }
                TraversalOrder::Stack => stack.extend(children.iter().map(|child| (child, next))),
            }
        }
    }

    flattened
}

fn record_for(node: &CategoryNode, depth: u32, policy: &TraversalPolicy) -> CategoryRecord {
    match policy.leaf_depth {
        LeafDepth::Sentinel if !node.has_children_field() => {
            CategoryRecord::leaf(node.id, node.name.clone())
        }
        _ => CategoryRecord::at_depth(node.id, node.name.clone(), depth),
    }
}
