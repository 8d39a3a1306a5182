// Comic path: scrape a comic page, compose the comic with a QR code and caption,
// serve it as JPEG.

pub mod compose;
pub mod handlers;
pub mod output;
pub mod source;

pub use source::{ComicSource, SofterWorldSource};
