use serde::{Deserialize, Serialize};

/// Level written for records that have no depth in the taxonomy.
pub const SENTINEL_LEVEL: u32 = 99;

/// Routing shard value used by the catalog for nodes without a listing page.
pub const BLACKHOLE_SHARD: &str = "blackhole";

/// A node of the category tree as served by the catalog menu endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    /// Child categories. `None` when the document carries no child list at
    /// all, which is not the same thing as an empty list.
    #[serde(
        default,
        rename = "childs",
        alias = "children",
        skip_serializing_if = "Option::is_none"
    )]
    pub children: Option<Vec<CategoryNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CategoryNode {
    /// Creates a node without children or routing information.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            children: None,
            shard: None,
            query: None,
            url: None,
        }
    }

    /// Attaches a child list, creating it if the node had none.
    pub fn with_children(mut self, children: Vec<CategoryNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Sets the routing shard and query used to address the filter endpoint.
    pub fn with_routing(mut self, shard: impl Into<String>, query: impl Into<String>) -> Self {
        self.shard = Some(shard.into());
        self.query = Some(query.into());
        self
    }

    /// Whether the node carries a child list at all.
    pub fn has_children_field(&self) -> bool {
        self.children.is_some()
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOrigin {
    /// Visited while walking the category tree.
    Taxonomy,
    /// Synthesized from the category facet of a filter response.
    Filter,
}

/// One flattened row of the exported taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    /// Depth in the source tree, 1-based at the root block. `None` when the
    /// record has no recorded depth.
    pub depth: Option<u32>,
    pub origin: RecordOrigin,
}

impl CategoryRecord {
    /// Record for a node visited at the given depth.
    pub fn at_depth(id: i64, name: impl Into<String>, depth: u32) -> Self {
        Self {
            id,
            name: name.into(),
            depth: Some(depth),
            origin: RecordOrigin::Taxonomy,
        }
    }

    /// Record for a tree leaf whose depth is not reported.
    pub fn leaf(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            depth: None,
            origin: RecordOrigin::Taxonomy,
        }
    }

    /// Record synthesized from a filter facet entry.
    pub fn from_filter(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            depth: None,
            origin: RecordOrigin::Filter,
        }
    }

    /// Legacy level column: the depth, or [`SENTINEL_LEVEL`] when there is none.
    pub fn level(&self) -> u32 {
        self.depth.unwrap_or(SENTINEL_LEVEL)
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == RecordOrigin::Filter
    }
}

/// The flattened records of one root block.
#[derive(Debug, Clone, PartialEq)]
pub struct RootGroup {
    pub name: String,
    pub records: Vec<CategoryRecord>,
}

/// Every root group of a run, in the order of the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxonomyExport {
    pub groups: Vec<RootGroup>,
}

impl TaxonomyExport {
    pub fn push(&mut self, name: impl Into<String>, records: Vec<CategoryRecord>) {
        self.groups.push(RootGroup {
            name: name.into(),
            records,
        });
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }
}
