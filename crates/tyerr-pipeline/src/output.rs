//! The external response shape: one of the four `stage` variants from
//! §6's Output model.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::dto::{ImportErrorDto, RangeDto};

#[derive(Debug, Clone, Serialize)]
pub struct CriticalNodeDto {
    pub display_name: String,
    pub range: RangeDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixDto {
    pub mcs: Vec<u32>,
    pub local_type: FxHashMap<u32, String>,
    pub global_type: FxHashMap<String, String>,
    pub snapshot: Vec<tyerr_report::SnapshotLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeErrorDto {
    pub critical_nodes: FxHashMap<u32, CriticalNodeDto>,
    pub fixes: Vec<FixDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stage", rename_all = "kebab-case")]
pub enum PipelineOutput {
    Parse { errors: Vec<RangeDto> },
    Import { errors: Vec<ImportErrorDto> },
    TypeCheck { errors: Vec<TypeErrorDto> },
    WellTyped { inferred_types: FxHashMap<String, String> },
}
