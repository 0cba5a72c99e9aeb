//! Lantern is a 2D presentation runtime for timed bitmap sequences.
//!
//! It covers three pieces:
//!
//! - A [`ResourceManager`] that loads locale-aware assets one at a time and reports progress
//!   and batch completion.
//! - A [`SpriteTimeline`] that maps elapsed time to a frame, a transition name and a blend
//!   offset, with looping and non-looping end conditions.
//! - A [`TransitionRegistry`] of frame-to-frame render functions and easings, driven by
//!   [`SpriteRenderer`] for timeline playback and [`OneShotTransition`] for discrete frame
//!   changes.
//!
//! Pixels are premultiplied RGBA8 throughout.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
/// Runtime configuration.
pub mod config;
pub(crate) mod effects;
pub(crate) mod render;
pub(crate) mod sprite;

pub use crate::animation::ease::Ease;
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::events::{
    EventBus, LoadCompleted, LoadPhase, LoadProgress, LoadStatus, SubscriptionId,
};
pub use crate::assets::fetch::{FsFetcher, MemoryFetcher, ResourceFetcher, normalize_rel_path};
pub use crate::assets::locale::find_best_resource;
pub use crate::assets::manager::{ImageSource, LoadCounters, ResourceManager};
pub use crate::assets::resource::{LoadState, Resource, ResourceData, ResourceId, ResourceKind};
pub use crate::config::{LoaderOpts, OneShotOpts, RuntimeConfig};
pub use crate::effects::registry::{EasingFn, RenderFn, TransitionRegistry};
pub use crate::foundation::core::{Affine, PixelSize, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{LanternError, LanternResult};
pub use crate::render::one_shot::{ActiveTransition, OneShotTransition, TransitionState};
pub use crate::render::sprite_renderer::{BufferSlot, FrameBuffers, SpriteRenderer};
pub use crate::render::surface::Surface;
pub use crate::sprite::dsl::{SpriteBuilder, timeline_from_json};
pub use crate::sprite::frame::SpriteFrame;
pub use crate::sprite::timeline::{SpriteTimeline, TimelinePhase, TimelineState};
