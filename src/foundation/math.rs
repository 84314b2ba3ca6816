pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Blend a straight-alpha foreground channel over an opaque background channel.
pub(crate) fn blend_straight_u8(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    mul_div255_u8(u16::from(fg), a).saturating_add(mul_div255_u8(u16::from(bg), 255 - a))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
