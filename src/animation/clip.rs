use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

#[derive(Debug, Clone)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
        }
    }
}

/// A complete track definition: target metadata plus keyframe data.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

/// A named, reusable set of tracks (for example a key-press motion).
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Longest track end time, in seconds.
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Looks a clip up by its exact name.
    ///
    /// A missing clip is not an error: callers treat `None` as "no animation
    /// available".
    #[must_use]
    pub fn find_by_name<'a>(clips: &'a [Arc<AnimationClip>], name: &str) -> Option<&'a Arc<AnimationClip>> {
        clips.iter().find(|clip| clip.name == name)
    }
}
