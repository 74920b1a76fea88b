//! SketchPad Render Library
//!
//! Rasterization of saved pages and the raster converters used by the save
//! pipeline. The built-in converter (tiny-skia + png) needs the
//! `builtin-raster` feature; Ghostscript is detected at runtime.

mod converter;

#[cfg(feature = "builtin-raster")]
mod encode;
#[cfg(feature = "builtin-raster")]
mod renderer;

pub use converter::{GhostscriptConverter, detect_converter};

#[cfg(feature = "builtin-raster")]
pub use converter::BuiltinConverter;
#[cfg(feature = "builtin-raster")]
pub use encode::encode_png;
#[cfg(feature = "builtin-raster")]
pub use renderer::{MAX_PIXMAP_EDGE, Pixmap, RasterOptions, RenderResult, RendererError, rasterize};
