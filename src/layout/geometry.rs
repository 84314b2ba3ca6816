/// Horizontal margin (both sides combined) kept free of caption text.
pub const TEXT_SIDE_MARGIN_PX: u32 = 200;
/// Extra leading added to the title size to get the line pitch.
pub const LINE_LEADING_PX: i64 = 20;
/// Gap subtracted once from the block height (no gap after the last line).
pub const LINE_GAP_PX: i64 = 20;

/// Where the scaled phone image lands on the background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhonePlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PhonePlacement {
    /// Horizontal center of the phone image, used to center caption lines.
    pub fn center_x(&self) -> i64 {
        self.x + i64::from(self.width) / 2
    }
}

/// Scale the phone image and anchor it horizontally centered, bottom-aligned
/// to the background plus `phone_y_offset`.
///
/// Scaled dimensions truncate toward zero and never drop below one pixel.
pub fn position_phone(
    background: (u32, u32),
    phone: (u32, u32),
    scale_factor: f64,
    phone_y_offset: i32,
) -> PhonePlacement {
    let scale = |v: u32| ((f64::from(v) * scale_factor) as u32).max(1);
    let width = scale(phone.0);
    let height = scale(phone.1);
    let (bg_w, bg_h) = (i64::from(background.0), i64::from(background.1));
    PhonePlacement {
        x: (bg_w - i64::from(width)).div_euclid(2),
        y: bg_h - i64::from(height) + i64::from(phone_y_offset),
        width,
        height,
    }
}

/// Caption wrap width for a background of `background_width`.
pub fn max_text_width(background_width: u32) -> f32 {
    background_width.saturating_sub(TEXT_SIDE_MARGIN_PX) as f32
}

/// Line pitch for a given title size.
pub fn line_height(font_size_title: u32) -> i64 {
    i64::from(font_size_title) + LINE_LEADING_PX
}

/// Top-left origin for each caption line.
///
/// The block is vertically centered on `anchor_y`; each line is centered on
/// `center_x` using its own width.
pub fn center_text_block(
    line_widths: &[i64],
    center_x: i64,
    line_height: i64,
    anchor_y: i64,
) -> Vec<(i64, i64)> {
    let total = line_widths.len() as i64 * line_height - LINE_GAP_PX;
    let top = anchor_y - total.div_euclid(2);
    line_widths
        .iter()
        .enumerate()
        .map(|(idx, w)| (center_x - w.div_euclid(2), top + idx as i64 * line_height))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
