//! Animation System
//!
//! Keyframe animation for scene nodes:
//! - [`KeyframeTrack`]: timed values with linear / step / cubic-spline sampling
//! - [`AnimationClip`]: a named set of tracks targeting nodes by name
//! - [`AnimationAction`]: playback state of one clip (time, loop mode, clamping)
//! - [`AnimationMixer`]: advances actions, writes node transforms and queues
//!   [`MixerEvent`]s such as "finished"

pub mod values;
pub mod tracks;
pub mod clip;
pub mod action;
pub mod binding;
pub mod binder;
pub mod mixer;

pub use action::{ActionTransition, AnimationAction, LoopMode};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::{ActionHandle, AnimationMixer, MixerEvent};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
