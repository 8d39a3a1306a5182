// Raster output: an RGB canvas with text drawing, QR code generation, and the
// decode/resize/encode helpers used by the comic and weather paths.

pub mod canvas;
pub mod qr;

pub use canvas::{decode_image, resize_exact, Canvas, BLACK, WHITE};
pub use qr::generate_qr;
