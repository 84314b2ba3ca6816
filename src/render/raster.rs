use std::{collections::HashMap, sync::Arc};

use crate::{
    fonts::face::FontFace,
    foundation::math::mul_div255_u16,
    text::engine::TextBrushRgba8,
};

/// Rasterizes shaped lines with `vello_cpu` and blends them onto an RGBA canvas.
///
/// Font data is cached per face for the lifetime of the rasterizer.
#[derive(Default)]
pub struct TextRasterizer {
    fonts: HashMap<(usize, u32), vello_cpu::peniko::FontData>,
}

impl TextRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn font_data(&mut self, face: &FontFace) -> vello_cpu::peniko::FontData {
        let key = (Arc::as_ptr(face.bytes()) as usize, face.index());
        self.fonts
            .entry(key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes().as_ref().clone()),
                    face.index(),
                )
            })
            .clone()
    }

    /// Draw `layout` with its top-left corner at `origin` (canvas pixels).
    ///
    /// Parts of the line outside the canvas are clipped.
    pub fn draw_line(
        &mut self,
        canvas: &mut image::RgbaImage,
        layout: &parley::Layout<TextBrushRgba8>,
        face: &FontFace,
        origin: (i64, i64),
    ) {
        let width = layout.width().ceil();
        let height = layout.height().ceil();
        if !(width >= 1.0 && height >= 1.0) {
            return;
        }
        let w = width.min(f32::from(u16::MAX)) as u16;
        let h = height.min(f32::from(u16::MAX)) as u16;

        let font = self.font_data(face);
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .normalized_coords(run.run().normalized_coords())
                    .fill_glyphs(glyphs);
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        blend_premul_over(canvas, pixmap.data_as_u8_slice(), u32::from(w), u32::from(h), origin);
    }
}

/// Composite a premultiplied RGBA8 tile over a straight-alpha canvas at `origin`.
pub fn blend_premul_over(
    canvas: &mut image::RgbaImage,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    origin: (i64, i64),
) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for sy in 0..src_h {
        let dy = origin.1 + i64::from(sy);
        if dy < 0 || dy >= ch {
            continue;
        }
        for sx in 0..src_w {
            let dx = origin.0 + i64::from(sx);
            if dx < 0 || dx >= cw {
                continue;
            }
            let i = ((sy * src_w + sx) * 4) as usize;
            let Some(s) = src.get(i..i + 4) else {
                return;
            };
            if s[3] == 0 {
                continue;
            }
            let dst = canvas.get_pixel_mut(dx as u32, dy as u32);
            dst.0 = premul_over_straight([s[0], s[1], s[2], s[3]], dst.0);
        }
    }
}

/// Source-over of a premultiplied pixel onto a straight-alpha pixel.
pub(crate) fn premul_over_straight(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = u16::from(src[3]);
    if sa == 255 {
        return src;
    }
    let inv = 255 - sa;
    let da = mul_div255_u16(u16::from(dst[3]), inv);
    let out_a = sa + da;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let premul = u32::from(src[c]) + u32::from(mul_div255_u16(u16::from(dst[c]), da));
        out[c] = ((premul * 255 + u32::from(out_a) / 2) / u32::from(out_a)).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
