//! Wire-shaped records mirroring the external JSON input/output model,
//! kept snake_case so `serde_json` round-trips without per-field renames.

use serde::{Deserialize, Serialize};

/// A source range in the caller's line/column terms, with no byte offset
/// (the orchestrator supplies the original file text separately; offsets
/// are resolved against it when a range needs to be sliced).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangeDto {
    pub from_line: u32,
    pub to_line: u32,
    pub from_col: u32,
    pub to_col: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportErrorDto {
    pub node_id: u32,
    pub name: String,
    pub node_range: RangeDto,
    pub is_type: bool,
    pub is_term: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleHeadDto {
    pub id: u32,
    pub name: String,
    pub module: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleDto {
    pub id: u32,
    pub head: RuleHeadDto,
    pub body: String,
    pub is_axiom: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeEdgeDto {
    pub parent: u32,
    pub child: u32,
}
