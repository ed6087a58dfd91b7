pub mod clahe;
pub mod filters;
pub mod ops;
pub mod pipeline;
pub mod resize;
pub mod save;
