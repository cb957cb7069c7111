#[path = "integration/common/mod.rs"]
mod common;

#[path = "integration/pipeline.rs"]
mod pipeline;

#[path = "integration/conversion.rs"]
mod conversion;

#[path = "integration/error_cases.rs"]
mod error_cases;
