//! PNG encoding of rasterized pages.

use crate::renderer::{Pixmap, RenderResult, RendererError};

/// Encode a pixmap as RGBA8 PNG bytes.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::EncodeFailed(format!("PNG header: {}", e)))?;
        writer
            .write_image_data(&pixmap.to_rgba8())
            .map_err(|e| RendererError::EncodeFailed(format!("PNG data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| RendererError::EncodeFailed(format!("PNG finish: {}", e)))?;
    }
    Ok(png_data)
}
