use super::*;

#[test]
fn pixel_size_rejects_empty() {
    assert!(PixelSize::new(0, 4).is_err());
    assert!(PixelSize::new(4, 0).is_err());
    let s = PixelSize::new(3, 2).unwrap();
    assert_eq!(s.rgba_len(), 24);
    assert_eq!(s.to_rect(), Rect::new(0.0, 0.0, 3.0, 2.0));
}

#[test]
fn straight_to_premul_rounds() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
