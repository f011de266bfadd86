use std::sync::Arc;

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

/// What happened to an action during one [`AnimationAction::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTransition {
    /// A `Once` action reached the end of its clip.
    Finished,
    /// A `Loop` or `PingPong` action wrapped around.
    Looped,
}

/// A playable instance of a clip bound to nodes of a scene.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    /// When a `Once` action finishes, keep applying its final pose instead of
    /// disabling it.
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            clamp_when_finished: false,
            paused: false,
            enabled: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Rewinds to the start and clears the paused state.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.paused = false;
        self.enabled = true;
        for cursor in &mut self.track_cursors {
            cursor.reset();
        }
        self
    }

    /// Starts (or resumes) playback.
    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.paused = false;
        self
    }

    /// Stops playback and rewinds. The action stops influencing its targets.
    pub fn stop(&mut self) -> &mut Self {
        self.enabled = false;
        self.paused = false;
        self.time = 0.0;
        self
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    /// `true` while the action is advancing time.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled && !self.paused
    }

    /// Advances time by `dt` and applies the loop mode.
    pub fn update(&mut self, dt: f32) -> Option<ActionTransition> {
        if !self.is_running() {
            return None;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            // A zero-length clip is finished as soon as it starts.
            return if self.loop_mode == LoopMode::Once {
                self.finish(0.0)
            } else {
                None
            };
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.finish(duration)
                } else if self.time < 0.0 {
                    self.finish(0.0)
                } else {
                    None
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                    Some(ActionTransition::Looped)
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                    Some(ActionTransition::Looped)
                } else {
                    None
                }
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let mut t = self.time % double_duration;
                if t < 0.0 {
                    t += double_duration;
                }
                let wrapped = self.time >= double_duration || self.time < 0.0;
                // Keep the raw accumulator bounded; the sampled time is mirrored below.
                self.time = t;
                if wrapped { Some(ActionTransition::Looped) } else { None }
            }
        }
    }

    /// Time used for sampling tracks. For `PingPong` the second half of the
    /// cycle is mirrored.
    #[must_use]
    pub fn sample_time(&self) -> f32 {
        let duration = self.clip.duration;
        if self.loop_mode == LoopMode::PingPong && self.time > duration {
            duration * 2.0 - self.time
        } else {
            self.time
        }
    }

    /// `true` when the mixer should write this action's values this frame.
    #[must_use]
    pub(crate) fn is_influencing(&self) -> bool {
        self.enabled && self.weight > 0.0
    }

    /// Number of tracks in the clip.
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.clip.tracks.len()
    }

    fn finish(&mut self, at: f32) -> Option<ActionTransition> {
        self.time = at;
        self.paused = true;
        if !self.clamp_when_finished {
            self.enabled = false;
        }
        Some(ActionTransition::Finished)
    }
}
