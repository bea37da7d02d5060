use serde::{Deserialize, Serialize};

/// Backend-side description of the agent's execution topology, fetched for
/// display during verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInfo {
    #[serde(default)]
    pub node_count: usize,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub checkpointer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpointer_type: Option<String>,
    #[serde(default)]
    pub publisher: bool,
    #[serde(default)]
    pub store: bool,
    #[serde(default)]
    pub interrupt_before: Vec<String>,
    #[serde(default)]
    pub interrupt_after: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphInfo {
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_interrupts(&self) -> bool {
        !self.interrupt_before.is_empty() || !self.interrupt_after.is_empty()
    }
}
