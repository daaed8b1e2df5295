use crate::color::Rgb;

/// Linearly blend two colors
///
/// # Arguments
/// * `a` - Color at `amount_of_b == 0.0`
/// * `b` - Color at `amount_of_b == 1.0`
/// * `amount_of_b` - Blend factor, clamped to `0.0..=1.0`
///
/// Channels are truncated towards zero, so blending towards a darker color
/// settles one step earlier than blending towards a brighter one.
#[inline]
pub fn linear_blend(a: Rgb, b: Rgb, amount_of_b: f32) -> Rgb {
    let amount = amount_of_b.clamp(0.0, 1.0);
    Rgb {
        r: blend_channel(a.r, b.r, amount),
        g: blend_channel(a.g, b.g, amount),
        b: blend_channel(a.b, b.b, amount),
    }
}

/// Scale every channel of a color by `factor` (clamped to `0.0..=1.0`)
#[inline]
pub fn scale_color(color: Rgb, factor: f32) -> Rgb {
    let factor = factor.clamp(0.0, 1.0);
    Rgb {
        r: scale_channel(color.r, factor),
        g: scale_channel(color.g, factor),
        b: scale_channel(color.b, factor),
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_channel(a: u8, b: u8, amount: f32) -> u8 {
    let delta = f32::from(b) - f32::from(a);
    (f32::from(a) + delta * amount).clamp(0.0, 255.0) as u8
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_channel(value: u8, factor: f32) -> u8 {
    (f32::from(value) * factor).clamp(0.0, 255.0) as u8
}
