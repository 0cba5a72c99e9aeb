use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_half_opacity_mixes_with_dst() {
    let out = over([0, 0, 255, 255], [255, 0, 0, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!(out[0] > 100 && out[0] < 160);
    assert!(out[2] > 100 && out[2] < 160);
}

#[test]
fn crossfade_endpoints_and_midpoint() {
    let a = [255, 0, 0, 255];
    let b = [0, 0, 255, 255];
    assert_eq!(crossfade(a, b, 0.0), a);
    assert_eq!(crossfade(a, b, 1.0), b);
    assert_eq!(crossfade(a, b, 0.5), [127, 0, 128, 255]);
}

#[test]
fn composite_rect_visits_covered_pixels_only() {
    let mut dst = Surface::new(4, 4).unwrap();
    let mut seen = Vec::new();
    composite_rect(&mut dst, Rect::new(1.0, 1.0, 3.0, 2.0), 1.0, |p| {
        seen.push((p.u, p.v));
        [9, 9, 9, 255]
    });
    assert_eq!(seen, vec![(0.25, 0.5), (0.75, 0.5)]);
    assert_eq!(dst.pixel(1, 1), [9, 9, 9, 255]);
    assert_eq!(dst.pixel(2, 1), [9, 9, 9, 255]);
    assert_eq!(dst.pixel(0, 1), [0, 0, 0, 0]);
    assert_eq!(dst.pixel(1, 2), [0, 0, 0, 0]);
}

#[test]
fn composite_rect_clips_to_surface() {
    let mut dst = Surface::new(2, 2).unwrap();
    let mut count = 0;
    composite_rect(&mut dst, Rect::new(-2.0, -2.0, 2.0, 2.0), 1.0, |p| {
        assert!(p.u >= 0.5 && p.v >= 0.5);
        count += 1;
        [1, 1, 1, 255]
    });
    assert_eq!(count, 4);
}

#[test]
fn composite_rect_ignores_empty_rect() {
    let mut dst = Surface::new(2, 2).unwrap();
    composite_rect(&mut dst, Rect::new(1.0, 1.0, 1.0, 2.0), 1.0, |_| {
        panic!("empty rect must not be shaded")
    });
}
