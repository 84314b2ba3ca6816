use std::{collections::HashMap, sync::Arc};

use crate::{
    fonts::face::{FontFace, ResolvedFont},
    foundation::error::{AppshotsError, AppshotsResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Stateful helper for shaping single lines with resolved fonts.
///
/// The font collection is private to the engine (no system fonts), so every
/// shaped glyph comes from the face that will rasterize it.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<(usize, u32), String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext {
                collection: parley::fontique::Collection::new(
                    parley::fontique::CollectionOptions {
                        shared: false,
                        system_fonts: false,
                    },
                ),
                source_cache: parley::fontique::SourceCache::default(),
            },
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> AppshotsResult<String> {
        let key = (Arc::as_ptr(face.bytes()) as usize, face.index());
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes().as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| AppshotsError::validation("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AppshotsError::validation("registered font family has no name"))?
            .to_string();
        self.families.insert(key, name.clone());
        Ok(name)
    }

    /// Shape `text` as one unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        brush: TextBrushRgba8,
    ) -> AppshotsResult<parley::Layout<TextBrushRgba8>> {
        let size_px = font.size_px();
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(AppshotsError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(font.face())?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(font.layout_weight()),
        ));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }

    /// Advance width of `text` in pixels, `None` when it cannot be measured.
    pub fn measure_width(&mut self, text: &str, font: &ResolvedFont) -> Option<f32> {
        match self.layout_line(text, font, TextBrushRgba8::BLACK) {
            Ok(layout) => Some(layout.width()),
            Err(e) => {
                tracing::debug!(error = %e, "text measurement failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
