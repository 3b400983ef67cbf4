/// Narrowest the palette panel gets, in logical pixels.
pub const MIN_PALETTE_WIDTH: f32 = 200.0;

/// Side-by-side split of the surface, in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Split {
    pub palette_width: f32,
    /// Area the sheet itself covers inside the panel, from its top-left.
    pub palette_view: (f32, f32),
    pub map_x: f32,
    pub map_width: f32,
    pub height: f32,
}

/// Palette on the left, wide enough for the scaled sprite sheet; the map
/// takes the rest.
///
/// `sheet` is the sprite sheet size in pixels, `scale` the tile render
/// scale, `dpi` the window scale factor. The palette view never extends
/// past the sheet, so the panel margin stays empty.
pub fn split(surface: (f32, f32), sheet: Option<(u32, u32)>, scale: f32, dpi: f32) -> Split {
    let (width, height) = surface;
    let (sheet_w, sheet_h) = sheet.map_or((0.0, 0.0), |(w, h)| (w as f32 * scale, h as f32 * scale));
    let palette_width = (MIN_PALETTE_WIDTH.max(sheet_w) * dpi).min(width).max(0.0);
    let palette_view = (
        (sheet_w * dpi).min(palette_width),
        (sheet_h * dpi).min(height).max(0.0),
    );

    Split {
        palette_width,
        palette_view,
        map_x: palette_width,
        map_width: width - palette_width,
        height,
    }
}
