use crate::assets::manager::ImageSource;
use crate::effects::registry::TransitionRegistry;
use crate::foundation::core::{PixelSize, Rect};
use crate::foundation::error::{LanternError, LanternResult};
use crate::render::surface::Surface;
use crate::sprite::frame::SpriteFrame;
use crate::sprite::timeline::{SpriteTimeline, TimelinePhase, TimelineState};

/// Which of the two capture buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferSlot {
    /// Outgoing frame.
    A,
    /// Incoming frame.
    B,
}

#[derive(Clone, Debug)]
struct Capture {
    frame: usize,
    surface: Surface,
}

/// Double-buffered off-screen captures of the two frames being blended.
///
/// A buffer is redrawn only when the frame index it holds changes.
#[derive(Clone, Debug, Default)]
pub struct FrameBuffers {
    a: Option<Capture>,
    b: Option<Capture>,
    captures: u64,
}

impl FrameBuffers {
    /// Empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame index currently held by `slot`.
    pub fn captured_frame(&self, slot: BufferSlot) -> Option<usize> {
        self.slot(slot).as_ref().map(|c| c.frame)
    }

    /// Number of captures performed since creation.
    pub fn capture_count(&self) -> u64 {
        self.captures
    }

    /// Drop both captures.
    pub fn clear(&mut self) {
        self.a = None;
        self.b = None;
    }

    /// Capture `frame` into `slot` unless it already holds that frame at `size`.
    pub fn ensure(
        &mut self,
        slot: BufferSlot,
        timeline: &SpriteTimeline,
        frame: usize,
        images: &impl ImageSource,
        size: PixelSize,
    ) -> LanternResult<&Surface> {
        let fresh = matches!(
            self.slot(slot),
            Some(c) if c.frame == frame && c.surface.size() == size
        );
        if !fresh {
            let surface = capture_frame(timeline, frame, images, size)?;
            self.captures += 1;
            tracing::trace!(?slot, frame, "captured sprite frame");
            *self.slot_mut(slot) = Some(Capture { frame, surface });
        }
        self.surface(slot)
            .ok_or_else(|| LanternError::render("frame buffer missing after capture"))
    }

    /// Captured surface in `slot`.
    pub fn surface(&self, slot: BufferSlot) -> Option<&Surface> {
        self.slot(slot).as_ref().map(|c| &c.surface)
    }

    fn slot(&self, slot: BufferSlot) -> &Option<Capture> {
        match slot {
            BufferSlot::A => &self.a,
            BufferSlot::B => &self.b,
        }
    }

    fn slot_mut(&mut self, slot: BufferSlot) -> &mut Option<Capture> {
        match slot {
            BufferSlot::A => &mut self.a,
            BufferSlot::B => &mut self.b,
        }
    }
}

/// Draws a sprite timeline at sampled times.
///
/// Static segments draw the frame's image straight into the target rectangle. Transition
/// windows capture both frames at the sprite size and hand them to the registry.
#[derive(Clone, Debug)]
pub struct SpriteRenderer {
    size: PixelSize,
    buffers: FrameBuffers,
}

impl SpriteRenderer {
    /// Renderer capturing frames at `size`.
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            buffers: FrameBuffers::new(),
        }
    }

    /// Capture size.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Capture buffers.
    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// Sample `timeline` at `t` and draw the result into `rect` of `dst`.
    pub fn render<'t>(
        &mut self,
        timeline: &'t SpriteTimeline,
        t: f64,
        images: &impl ImageSource,
        registry: &TransitionRegistry,
        dst: &mut Surface,
        rect: Rect,
    ) -> LanternResult<TimelineState<'t>> {
        let state = timeline.state_for_time(t)?;
        match state.phase() {
            TimelinePhase::Static { frame, .. } => {
                let f = frame_at(timeline, frame)?;
                let image = image_for(images, f)?;
                dst.draw_image(&image, f.crop, rect, f.opacity() as f32);
            }
            TimelinePhase::Transitioning {
                name,
                from,
                to,
                offset,
            } => {
                self.buffers
                    .ensure(BufferSlot::A, timeline, from, images, self.size)?;
                self.buffers
                    .ensure(BufferSlot::B, timeline, to, images, self.size)?;
                let (Some(a), Some(b)) = (
                    self.buffers.surface(BufferSlot::A),
                    self.buffers.surface(BufferSlot::B),
                ) else {
                    return Err(LanternError::render("frame buffers missing after capture"));
                };
                let eased = registry.ease(frame_at(timeline, to)?.easing.as_deref(), offset);
                registry.render_transition(name, dst, a, b, eased, rect)?;
            }
        }
        Ok(state)
    }
}

fn frame_at(timeline: &SpriteTimeline, index: usize) -> LanternResult<&SpriteFrame> {
    timeline.frame(index).ok_or_else(|| {
        LanternError::validation(format!(
            "frame index {index} is out of range for {} frames",
            timeline.len()
        ))
    })
}

fn image_for(
    images: &impl ImageSource,
    frame: &SpriteFrame,
) -> LanternResult<crate::assets::decode::PreparedImage> {
    images.image(&frame.source).ok_or_else(|| {
        LanternError::resource(format!("image '{}' is not available", frame.source))
    })
}

fn capture_frame(
    timeline: &SpriteTimeline,
    index: usize,
    images: &impl ImageSource,
    size: PixelSize,
) -> LanternResult<Surface> {
    let frame = frame_at(timeline, index)?;
    let image = image_for(images, frame)?;
    let mut surface = Surface::new(size.width, size.height)?;
    surface.draw_image(&image, frame.crop, size.to_rect(), frame.opacity() as f32);
    Ok(surface)
}

#[cfg(test)]
#[path = "../../tests/unit/render/sprite_renderer.rs"]
mod tests;
