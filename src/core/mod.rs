//! Core processing building blocks: grayscale and filtering ops, area resize,
//! CLAHE, the staged pipeline, and save helpers. These are internal primitives
//! consumed by the high-level `api` module.
pub mod params;
pub mod processing;
