use std::collections::HashMap;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::sprite::dsl::SpriteBuilder;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn solid_image(px: [u8; 4]) -> PreparedImage {
    PreparedImage::from_premul(2, 2, px.repeat(4)).unwrap()
}

fn images() -> HashMap<String, PreparedImage> {
    let mut images = HashMap::new();
    images.insert("red".to_string(), solid_image(RED));
    images.insert("blue".to_string(), solid_image(BLUE));
    // 2x1 sheet: red cell, blue cell.
    images.insert(
        "sheet".to_string(),
        PreparedImage::from_premul(2, 1, [RED, BLUE].concat()).unwrap(),
    );
    images
}

fn fade_timeline(easing: Option<&str>) -> SpriteTimeline {
    let mut incoming = SpriteFrame::new("blue", 1.0).with_transition("fade", 1.0);
    incoming.easing = easing.map(str::to_string);
    SpriteBuilder::new()
        .still("red", 1.0)
        .frame(incoming)
        .build()
        .unwrap()
}

fn size() -> PixelSize {
    PixelSize::new(2, 2).unwrap()
}

fn draw(
    renderer: &mut SpriteRenderer,
    timeline: &SpriteTimeline,
    t: f64,
) -> LanternResult<Surface> {
    let mut dst = Surface::new(2, 2)?;
    let rect = dst.bounds();
    renderer.render(
        timeline,
        t,
        &images(),
        &TransitionRegistry::with_builtins(),
        &mut dst,
        rect,
    )?;
    Ok(dst)
}

#[test]
fn static_segments_draw_directly() {
    let tl = fade_timeline(None);
    let mut r = SpriteRenderer::new(size());
    let dst = draw(&mut r, &tl, 0.5).unwrap();
    assert_eq!(dst.pixel(0, 0), RED);
    assert_eq!(r.buffers().capture_count(), 0);

    let dst = draw(&mut r, &tl, 2.5).unwrap();
    assert_eq!(dst.pixel(1, 1), BLUE);
}

#[test]
fn transition_windows_blend_captured_frames() {
    let tl = fade_timeline(None);
    let mut r = SpriteRenderer::new(size());
    let dst = draw(&mut r, &tl, 1.5).unwrap();
    assert_eq!(dst.pixel(0, 0), [127, 0, 128, 255]);
    assert_eq!(r.buffers().captured_frame(BufferSlot::A), Some(0));
    assert_eq!(r.buffers().captured_frame(BufferSlot::B), Some(1));
    assert_eq!(r.buffers().capture_count(), 2);
}

#[test]
fn buffers_recapture_only_when_frame_changes() {
    let tl = SpriteBuilder::new()
        .looping(true)
        .still("red", 1.0)
        .transition_to("blue", 1.0, "fade", 1.0)
        .transition_to("red", 1.0, "wipeleft", 1.0)
        .build()
        .unwrap();
    let mut r = SpriteRenderer::new(size());
    for t in [1.1, 1.4, 1.9] {
        draw(&mut r, &tl, t).unwrap();
    }
    assert_eq!(r.buffers().capture_count(), 2);

    // 1 -> 2: A and B both change.
    draw(&mut r, &tl, 3.5).unwrap();
    assert_eq!(r.buffers().capture_count(), 4);
    assert_eq!(r.buffers().captured_frame(BufferSlot::A), Some(1));
    assert_eq!(r.buffers().captured_frame(BufferSlot::B), Some(2));
}

#[test]
fn incoming_easing_remaps_offset() {
    let tl = fade_timeline(Some("easeInQuad"));
    let mut r = SpriteRenderer::new(size());
    let dst = draw(&mut r, &tl, 1.5).unwrap();
    assert_eq!(dst.pixel(0, 0), [191, 0, 64, 255]);
}

#[test]
fn crops_select_sheet_cells() {
    let tl = SpriteBuilder::new()
        .cell("sheet", Rect::new(0.0, 0.0, 1.0, 1.0), 1.0)
        .cell("sheet", Rect::new(1.0, 0.0, 2.0, 1.0), 1.0)
        .build()
        .unwrap();
    let mut r = SpriteRenderer::new(size());
    assert_eq!(draw(&mut r, &tl, 0.2).unwrap().pixel(1, 1), RED);
    assert_eq!(draw(&mut r, &tl, 1.2).unwrap().pixel(0, 0), BLUE);
}

#[test]
fn frame_opacity_is_applied() {
    let tl = SpriteBuilder::new()
        .frame(SpriteFrame::new("red", 1.0).with_opacity(0.5))
        .build()
        .unwrap();
    let mut r = SpriteRenderer::new(size());
    assert_eq!(
        draw(&mut r, &tl, 0.0).unwrap().pixel(0, 0),
        [128, 0, 0, 128]
    );
}

#[test]
fn missing_images_are_resource_errors() {
    let tl = SpriteBuilder::new().still("ghost", 1.0).build().unwrap();
    let mut r = SpriteRenderer::new(size());
    assert!(matches!(
        draw(&mut r, &tl, 0.0),
        Err(LanternError::Resource(_))
    ));
}

#[test]
fn clearing_buffers_forces_recapture() {
    let tl = fade_timeline(None);
    let mut buffers = FrameBuffers::new();
    let imgs = images();
    buffers
        .ensure(BufferSlot::A, &tl, 0, &imgs, size())
        .unwrap();
    buffers
        .ensure(BufferSlot::A, &tl, 0, &imgs, size())
        .unwrap();
    assert_eq!(buffers.capture_count(), 1);
    buffers.clear();
    assert_eq!(buffers.captured_frame(BufferSlot::A), None);
    let s = buffers
        .ensure(BufferSlot::A, &tl, 0, &imgs, size())
        .unwrap();
    assert_eq!(s.pixel(0, 0), RED);
    assert_eq!(buffers.capture_count(), 2);
    let missing = buffers.ensure(BufferSlot::B, &tl, 9, &imgs, size());
    assert!(missing.is_err());
}
