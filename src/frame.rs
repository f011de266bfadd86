//! Per-frame update
//!
//! One [`FrameScheduler::tick`] per displayed frame: advance animations,
//! apply camera controls, resolve the fly-away, render.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationMixer;
use crate::input::Input;
use crate::keys::{KeyController, KeyId};
use crate::navigation::Navigator;
use crate::render::Renderer;
use crate::scene::Scene;
use crate::utils::{OrbitControls, Timer};

/// Clock values for one frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameState {
    /// Time since the app started. Fly-away timestamps use this clock.
    pub time: f32,
    pub dt: f32,
    pub frame_count: u64,
}

impl FrameState {
    #[must_use]
    pub fn from_timer(timer: &Timer) -> Self {
        Self {
            time: timer.elapsed_seconds(),
            dt: timer.dt_seconds(),
            frame_count: timer.frame_count,
        }
    }
}

/// Shape of the fly-away camera move. Offsets are applied every frame and
/// grow with the elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyAwayParams {
    /// Units per second of elapsed time subtracted from `z` each frame.
    pub backward_speed: f32,
    /// Units per second of elapsed time subtracted from `y` each frame.
    pub drop_speed: f32,
    pub shake_frequency: f32,
    pub shake_amplitude: f32,
    /// Degrees.
    pub target_fov: f32,
    /// Fraction of the remaining fov distance covered each frame.
    pub fov_lerp: f32,
}

impl Default for FlyAwayParams {
    fn default() -> Self {
        Self {
            backward_speed: 5.0,
            drop_speed: 2.0,
            shake_frequency: 5.0,
            shake_amplitude: 0.1,
            target_fov: 100.0,
            fov_lerp: 0.05,
        }
    }
}

/// Everything a tick touches, borrowed from the owner for the duration of
/// the call.
pub struct FrameContext<'a, R: Renderer, N: Navigator> {
    pub scene: &'a mut Scene,
    pub keys: &'a mut [KeyController],
    /// Decorative mixers (looping clips nobody waits on).
    pub ambient: &'a mut [AnimationMixer],
    pub controls: Option<&'a mut OrbitControls>,
    pub input: &'a Input,
    pub renderer: &'a mut R,
    pub navigator: &'a mut N,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Key whose fly-away moved the camera this frame.
    pub driving: Option<KeyId>,
    /// Key that navigated this frame. Set at most once per key, ever.
    pub navigated: Option<KeyId>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pub fly_away: FlyAwayParams,
}

impl FrameScheduler {
    #[must_use]
    pub fn new(fly_away: FlyAwayParams) -> Self {
        Self { fly_away }
    }

    pub fn tick<R: Renderer, N: Navigator>(&self, ctx: FrameContext<'_, R, N>, frame: FrameState) -> TickReport {
        let FrameContext {
            scene,
            keys,
            ambient,
            controls,
            input,
            renderer,
            navigator,
        } = ctx;
        let dt = frame.dt;
        let now = frame.time;

        // 1. Animations
        for mixer in ambient.iter_mut() {
            mixer.update(dt, scene);
            mixer.drain_events().for_each(drop);
        }
        for key in keys.iter_mut() {
            key.advance(scene, dt, now);
        }

        // 2. Camera controls
        if let Some(controls) = controls
            && let Some((transform, camera)) = scene.query_main_camera_bundle()
        {
            controls.update(transform, input, camera.fov, dt);
        }

        // 3. Fly-away
        let report = self.resolve_fly_away(scene, keys, navigator, now);

        // 4. Render
        scene.update_matrix_world();
        if let Some(camera) = scene.main_camera() {
            renderer.render(scene, camera);
        }

        report
    }

    /// Lets the highest-priority airborne key drive the camera, and
    /// navigates when its threshold is crossed.
    pub fn resolve_fly_away<N: Navigator>(
        &self,
        scene: &mut Scene,
        keys: &mut [KeyController],
        navigator: &mut N,
        now: f32,
    ) -> TickReport {
        let mut report = TickReport::default();

        let Some(key) = keys
            .iter_mut()
            .filter(|k| k.fly().is_airborne())
            .min_by_key(|k| k.id().rank())
        else {
            return report;
        };
        let Some(elapsed) = key.fly_elapsed(now) else {
            return report;
        };
        report.driving = Some(key.id());

        if let Some((transform, camera)) = scene.query_main_camera_bundle() {
            let p = &self.fly_away;
            transform.position.z -= elapsed * p.backward_speed;
            transform.position.y -= elapsed * p.drop_speed;
            transform.position.x += (elapsed * p.shake_frequency).sin() * p.shake_amplitude;

            camera.fov += (p.target_fov - camera.fov) * p.fov_lerp;
            camera.update_projection_matrix();
        }

        if let Some(url) = key.try_depart(now) {
            let url = url.to_string();
            log::info!("{} key: navigating to {url}", key.id());
            if let Err(err) = navigator.navigate(&url) {
                log::error!("{} key: navigation failed: {err}", key.id());
            }
            report.navigated = Some(key.id());
        }

        report
    }
}
