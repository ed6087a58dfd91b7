//! I/O layer: the `reader` decodes input images of any supported format into
//! RGB arrays, and `writers` encode gray (and RGB inspection) outputs as
//! JPEG or PNG.
pub mod reader;
pub use reader::read_color_image;

pub mod writers;
