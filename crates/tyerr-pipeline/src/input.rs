//! Deserializing the external `PipelineInput` record and converting it
//! into `tyerr-inventory`'s `Input`, resolving every `RangeDto` against the
//! original source text to get the byte offsets `tyerr-report` needs.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use tyerr_common::error::FatalError;
use tyerr_common::span::{Position, Range};
use tyerr_inventory::{Input, NodeGraph, Rule, RuleHead, RuleKind, TypeVarConstraint};

use crate::dto::{ImportErrorDto, NodeEdgeDto, RangeDto, RuleDto};

/// The full external request record (§6's Input model). `source` is not
/// one of that section's itemized fields, but the report builder's source
/// slicing plainly needs the file text, so it travels alongside the rest
/// of the structural input (see DESIGN.md).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineInput {
    pub base_modules: Vec<String>,
    pub rules: Vec<RuleDto>,
    pub declarations: Vec<String>,
    pub type_vars: FxHashMap<String, FxHashMap<String, Vec<String>>>,
    pub arguments: FxHashMap<String, Vec<String>>,
    pub node_depth: FxHashMap<u32, u32>,
    pub max_depth: u32,
    pub classes: FxHashMap<String, Vec<String>>,
    pub node_graph: Vec<NodeEdgeDto>,
    pub node_range: FxHashMap<u32, RangeDto>,
    pub parsing_errors: Vec<RangeDto>,
    pub import_errors: Vec<ImportErrorDto>,
    pub source: String,
}

/// Byte offset of the start of each 1-based source line (index 0 unused).
pub fn line_offsets(source: &str) -> Vec<u32> {
    let mut offsets = vec![0u32, 0u32];
    let mut pos = 0u32;
    for line in source.split_inclusive('\n') {
        pos += line.len() as u32;
        offsets.push(pos);
    }
    offsets
}

fn position(offsets: &[u32], line: u32, col: u32) -> Position {
    let start = offsets.get(line as usize).copied().unwrap_or(0);
    Position::new(start + (col - 1), line, col)
}

pub fn to_range(offsets: &[u32], dto: &RangeDto) -> Range {
    Range::new(position(offsets, dto.from_line, dto.from_col), position(offsets, dto.to_line, dto.to_col))
}

pub fn range_to_dto(range: &Range) -> RangeDto {
    RangeDto {
        from_line: range.from.line,
        to_line: range.to.line,
        from_col: range.from.column,
        to_col: range.to.column,
    }
}

fn convert_rule(dto: &RuleDto) -> Result<Rule, FatalError> {
    let kind = match dto.head.kind.as_str() {
        "type" => RuleKind::Type,
        "instance" => RuleKind::Instance,
        other => return Err(FatalError::MalformedInput(format!("unrecognized rule head type `{other}`"))),
    };
    Ok(Rule {
        id: dto.id,
        head: RuleHead { id: dto.head.id, name: dto.head.name.clone(), module: dto.head.module.clone(), kind },
        body: dto.body.clone(),
        is_axiom: dto.is_axiom,
    })
}

/// Builds `tyerr-inventory`'s `Input` plus the byte-offset-resolved
/// `node_range` map the report builder and cluster analyzer need directly
/// (the inventory takes ownership of its own copy; this one is kept
/// alongside for the rest of the pipeline).
pub fn to_inventory_input(raw: &PipelineInput) -> Result<(Input, FxHashMap<u32, Range>), FatalError> {
    let offsets = line_offsets(&raw.source);
    let node_range: FxHashMap<u32, Range> = raw.node_range.iter().map(|(&id, dto)| (id, to_range(&offsets, dto))).collect();

    let rules = raw.rules.iter().map(convert_rule).collect::<Result<Vec<_>, _>>()?;

    let type_vars = raw
        .type_vars
        .iter()
        .map(|(decl, vars)| {
            let constraints = vars
                .iter()
                .map(|(var_name, classes)| TypeVarConstraint { var_name: var_name.clone(), classes: classes.clone() })
                .collect();
            (decl.clone(), constraints)
        })
        .collect();

    let node_graph = NodeGraph::new(raw.node_graph.iter().map(|e| (e.parent, e.child)).collect());

    let input = Input {
        base_modules: raw.base_modules.iter().cloned().collect::<FxHashSet<_>>(),
        rules,
        declarations: raw.declarations.clone(),
        type_vars,
        arguments: raw.arguments.clone(),
        node_depth: raw.node_depth.clone(),
        classes: raw.classes.clone(),
        node_graph,
        node_range: node_range.clone(),
        max_level: raw.max_depth,
    };
    Ok((input, node_range))
}
