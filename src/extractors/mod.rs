mod html_heuristic;
mod image;
mod json_ld;

pub use html_heuristic::HtmlHeuristicExtractor;
pub use image::{absolutize, ImageResolver};
pub use json_ld::JsonLdExtractor;
