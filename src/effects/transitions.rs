//! Built-in render functions.
//!
//! Every function draws the blend of `a` (outgoing) and `b` (incoming) into `rect` of `dst`
//! for an eased offset in `[0, 1]`. At offset 0 the result is `a` alone and at offset 1 it is
//! `b` alone. Masks are evaluated at destination pixel centers in the rectangle's normalized
//! space, and both buffers are sampled with nearest-neighbour lookup.

use std::f64::consts::TAU;

use crate::effects::composite::{PremulRgba8, Uv, composite_rect, crossfade, over};
use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::foundation::math::hash_unit;
use crate::render::surface::Surface;

/// Signature shared by built-in render functions.
pub(crate) type BuiltinRender = fn(&mut Surface, &Surface, &Surface, f64, Rect);

const DISSOLVE_SEED: u64 = 0x6c61_6e74_6572_6e00;
const GRID_CELLS: f64 = 8.0;
const BLIND_BANDS: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    Left,
    Right,
    Up,
    Down,
}

/// Every built-in render function, keyed by its lower-case name.
pub(crate) fn builtin_renders() -> [(&'static str, BuiltinRender); 24] {
    [
        ("none", cut),
        ("fade", fade),
        ("dissolve", dissolve),
        ("wipeleft", |d, a, b, t, r| wipe(d, a, b, t, r, Dir::Left)),
        ("wiperight", |d, a, b, t, r| wipe(d, a, b, t, r, Dir::Right)),
        ("wipeup", |d, a, b, t, r| wipe(d, a, b, t, r, Dir::Up)),
        ("wipedown", |d, a, b, t, r| wipe(d, a, b, t, r, Dir::Down)),
        ("slideleft", |d, a, b, t, r| slide(d, a, b, t, r, Dir::Left)),
        (
            "slideright",
            |d, a, b, t, r| slide(d, a, b, t, r, Dir::Right),
        ),
        ("slideup", |d, a, b, t, r| slide(d, a, b, t, r, Dir::Up)),
        ("slidedown", |d, a, b, t, r| slide(d, a, b, t, r, Dir::Down)),
        ("pushleft", |d, a, b, t, r| push(d, a, b, t, r, Dir::Left)),
        ("pushright", |d, a, b, t, r| push(d, a, b, t, r, Dir::Right)),
        ("pushup", |d, a, b, t, r| push(d, a, b, t, r, Dir::Up)),
        ("pushdown", |d, a, b, t, r| push(d, a, b, t, r, Dir::Down)),
        ("zoomin", zoom_in),
        ("zoomout", zoom_out),
        ("circle", circle),
        ("rectangle", rectangle),
        ("diamond", diamond),
        ("grid", grid),
        ("blinds", blinds),
        ("radar", radar),
        ("spin", spin),
    ]
}

/// Draw `a` alone, ignoring the offset.
pub(crate) fn passthrough(dst: &mut Surface, a: &Surface, _b: &Surface, _t: f64, rect: Rect) {
    composite_rect(dst, rect, 1.0, |p| a.sample_uv(p.u, p.v));
}

/// Pick `b` wherever `reveal` holds, `a` elsewhere.
fn reveal(
    dst: &mut Surface,
    a: &Surface,
    b: &Surface,
    t: f64,
    rect: Rect,
    mask: impl Fn(Uv, f64) -> bool,
) {
    let t = t.clamp(0.0, 1.0);
    composite_rect(dst, rect, 1.0, |p| {
        let show_b = t >= 1.0 || (t > 0.0 && mask(p, t));
        if show_b {
            b.sample_uv(p.u, p.v)
        } else {
            a.sample_uv(p.u, p.v)
        }
    });
}

fn cut(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    reveal(dst, a, b, t, rect, |_, _| false);
}

fn fade(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    let t = t.clamp(0.0, 1.0) as f32;
    composite_rect(dst, rect, 1.0, |p| {
        crossfade(a.sample_uv(p.u, p.v), b.sample_uv(p.u, p.v), t)
    });
}

fn dissolve(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    let (w, h) = (b.width(), b.height());
    reveal(dst, a, b, t, rect, |p, t| {
        let x = (p.u * f64::from(w)) as u32;
        let y = (p.v * f64::from(h)) as u32;
        f64::from(hash_unit(DISSOLVE_SEED, x, y)) < t
    });
}

fn wipe(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect, dir: Dir) {
    reveal(dst, a, b, t, rect, |p, t| match dir {
        Dir::Left => p.u >= 1.0 - t,
        Dir::Right => p.u < t,
        Dir::Up => p.v >= 1.0 - t,
        Dir::Down => p.v < t,
    });
}

fn slide(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect, dir: Dir) {
    shift(dst, a, b, t, rect, dir, false);
}

fn push(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect, dir: Dir) {
    shift(dst, a, b, t, rect, dir, true);
}

/// Move `b` in from the side `dir` names; with `push`, `a` moves out ahead of it.
fn shift(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect, dir: Dir, push: bool) {
    let t = t.clamp(0.0, 1.0);
    let rest = 1.0 - t;
    let b_shift = match dir {
        Dir::Left => Vec2::new(rest, 0.0),
        Dir::Right => Vec2::new(-rest, 0.0),
        Dir::Up => Vec2::new(0.0, rest),
        Dir::Down => Vec2::new(0.0, -rest),
    };
    let a_shift = if push {
        match dir {
            Dir::Left => Vec2::new(-t, 0.0),
            Dir::Right => Vec2::new(t, 0.0),
            Dir::Up => Vec2::new(0.0, -t),
            Dir::Down => Vec2::new(0.0, t),
        }
    } else {
        Vec2::ZERO
    };

    composite_rect(dst, rect, 1.0, |p| {
        if t >= 1.0 {
            return b.sample_uv(p.u, p.v);
        }
        let ap = a.sample_uv(p.u - a_shift.x, p.v - a_shift.y);
        let bp = b.sample_uv(p.u - b_shift.x, p.v - b_shift.y);
        over(ap, bp, 1.0)
    });
}

/// Sample `src` through the inverse of a transform applied to it in rectangle pixel space.
fn sample_transformed(src: &Surface, p: Uv, size: Vec2, inverse: Affine) -> PremulRgba8 {
    let q = inverse * Point::new(p.u * size.x, p.v * size.y);
    src.sample_uv(q.x / size.x, q.y / size.y)
}

/// Scale (and rotate) about the rectangle center.
fn about_center(size: Vec2, scale: f64, angle: f64) -> Affine {
    let c = size * 0.5;
    Affine::translate(c) * Affine::rotate(angle) * Affine::scale(scale) * Affine::translate(-c)
}

fn zoom_in(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    let t = t.clamp(0.0, 1.0);
    let size = rect_size(rect);
    let inverse = about_center(size, t.max(1e-6), 0.0).inverse();
    composite_rect(dst, rect, 1.0, |p| {
        if t <= 0.0 {
            a.sample_uv(p.u, p.v)
        } else if t >= 1.0 {
            b.sample_uv(p.u, p.v)
        } else {
            let bp = sample_transformed(b, p, size, inverse);
            over(a.sample_uv(p.u, p.v), bp, 1.0)
        }
    });
}

fn zoom_out(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    let t = t.clamp(0.0, 1.0);
    let size = rect_size(rect);
    let inverse = about_center(size, (1.0 - t).max(1e-6), 0.0).inverse();
    composite_rect(dst, rect, 1.0, |p| shrink_over(a, b, p, t, size, inverse));
}

fn circle(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    let size = rect_size(rect);
    let half = size * 0.5;
    let max_dist = half.hypot().max(1e-6);
    reveal(dst, a, b, t, rect, |p, t| {
        let d = Vec2::new((p.u - 0.5) * size.x, (p.v - 0.5) * size.y);
        d.hypot() < t * max_dist
    });
}

fn rectangle(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    reveal(dst, a, b, t, rect, |p, t| {
        (p.u - 0.5).abs() * 2.0 < t && (p.v - 0.5).abs() * 2.0 < t
    });
}

fn diamond(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    reveal(dst, a, b, t, rect, |p, t| {
        (p.u - 0.5).abs() + (p.v - 0.5).abs() < t
    });
}

fn grid(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    reveal(dst, a, b, t, rect, |p, t| {
        let cu = (p.u * GRID_CELLS).fract();
        let cv = (p.v * GRID_CELLS).fract();
        (cu - 0.5).abs() * 2.0 < t && (cv - 0.5).abs() * 2.0 < t
    });
}

fn blinds(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    reveal(dst, a, b, t, rect, |p, t| (p.v * BLIND_BANDS).fract() < t);
}

fn radar(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    let size = rect_size(rect);
    reveal(dst, a, b, t, rect, |p, t| {
        // Clockwise from twelve o'clock.
        let dx = (p.u - 0.5) * size.x;
        let dy = (p.v - 0.5) * size.y;
        let sweep = dx.atan2(-dy).rem_euclid(TAU) / TAU;
        sweep < t
    });
}

fn spin(dst: &mut Surface, a: &Surface, b: &Surface, t: f64, rect: Rect) {
    let t = t.clamp(0.0, 1.0);
    let size = rect_size(rect);
    let inverse = about_center(size, (1.0 - t).max(1e-6), t * TAU).inverse();
    composite_rect(dst, rect, 1.0, |p| shrink_over(a, b, p, t, size, inverse));
}

/// `a` shrinking (and possibly turning) away over a static `b`.
fn shrink_over(
    a: &Surface,
    b: &Surface,
    p: Uv,
    t: f64,
    size: Vec2,
    inverse: Affine,
) -> PremulRgba8 {
    if t <= 0.0 {
        a.sample_uv(p.u, p.v)
    } else if t >= 1.0 {
        b.sample_uv(p.u, p.v)
    } else {
        let ap = sample_transformed(a, p, size, inverse);
        over(b.sample_uv(p.u, p.v), ap, 1.0)
    }
}

fn rect_size(rect: Rect) -> Vec2 {
    let rect = rect.abs();
    Vec2::new(rect.width().max(1e-6), rect.height().max(1e-6))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
