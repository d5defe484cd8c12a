//! Label taxonomy: suffix-encoded defect states and base component names

pub mod label;
pub mod vocabulary;

pub use label::{
    resolve_base_names, validate_base_name, DetectionState, ParsedLabel, DELIMITER,
    MISALIGNED_CODE, MISSING_CODE,
};
pub use vocabulary::Vocabulary;
