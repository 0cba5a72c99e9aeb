use crate::foundation::core::Rect;
use crate::foundation::math::mul_div255_u8;
use crate::render::surface::Surface;

pub(crate) type PremulRgba8 = [u8; 4];

/// `src` over `dst`, with `src` scaled by `opacity` first.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Linear mix from `a` (t = 0) to `b` (t = 1).
pub(crate) fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255_u8(u16::from(a[i]), it);
        let bv = mul_div255_u8(u16::from(b[i]), tt);
        out[i] = av.saturating_add(bv);
    }
    out
}

/// Normalized position of a destination pixel center inside the target rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Uv {
    pub(crate) u: f64,
    pub(crate) v: f64,
}

/// Visit every destination pixel whose center lies inside `rect` and composite the color
/// returned by `shade` over it.
///
/// `rect` is in destination pixel coordinates and is clipped to the surface. `shade` receives
/// the pixel center normalized to `[0, 1)` on both axes.
pub(crate) fn composite_rect(
    dst: &mut Surface,
    rect: Rect,
    opacity: f32,
    mut shade: impl FnMut(Uv) -> PremulRgba8,
) {
    let rect = rect.abs();
    let (rw, rh) = (rect.width(), rect.height());
    if !(rw > 0.0 && rh > 0.0) || opacity <= 0.0 {
        return;
    }

    let (w, h) = (dst.width(), dst.height());
    let x_start = rect.x0.floor().max(0.0) as u32;
    let y_start = rect.y0.floor().max(0.0) as u32;
    let x_end = (rect.x1.ceil().max(0.0) as u32).min(w);
    let y_end = (rect.y1.ceil().max(0.0) as u32).min(h);

    for y in y_start..y_end {
        let v = (f64::from(y) + 0.5 - rect.y0) / rh;
        if !(0.0..1.0).contains(&v) {
            continue;
        }
        for x in x_start..x_end {
            let u = (f64::from(x) + 0.5 - rect.x0) / rw;
            if !(0.0..1.0).contains(&u) {
                continue;
            }
            let src = shade(Uv { u, v });
            let d = dst.pixel_mut(x, y);
            let out = over([d[0], d[1], d[2], d[3]], src, opacity);
            d.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
