// Text layout: font metrics, rectangle geometry, and the shrink-to-fit wrapper.
// Everything here is pure and synchronous; callers run it inside spawn_blocking
// together with the rest of the image composition.

pub mod font_metrics;
pub mod geometry;
pub mod text_fit;

// Re-export the public API consumed by the render, comic, and weather modules.
pub use font_metrics::{load_font, FontMetrics, SizedFont};
pub use geometry::{fit_image, Rect};
pub use text_fit::{fit_text, HorizontalAlign, LayoutRequest, TextLayout, VerticalAlign};
