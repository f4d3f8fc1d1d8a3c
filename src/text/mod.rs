//! Text processing: normalization and highlight segments

pub mod highlight;
pub mod normalizer;
pub mod offsets;

pub use highlight::{
    resolve_active, tokenize, tokenize_with, ActiveOffset, Desync, NormalizedSpan, Segment,
    SegmentTable,
};
pub use normalizer::normalize;
pub use offsets::OffsetUnit;
