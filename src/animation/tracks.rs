use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// How many keyframes the cursor scans linearly before falling back to a
/// binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe interval a track was sampled in, so that
/// sequential playback samples in O(1).
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

impl KeyframeCursor {
    pub fn reset(&mut self) {
        self.last_index = 0;
    }
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// For `CubicSpline` the length is `times.len() * 3`
    /// (in-tangent, value, out-tangent per keyframe).
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Timestamp of the last keyframe, `0.0` for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Stateless sampling through a binary search.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.times.is_empty() {
            return self.values.first().copied();
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        let idx = next_idx.saturating_sub(1);
        Some(self.sample_at_frame(idx, time))
    }

    /// Samples the track, starting the keyframe search from `cursor` and
    /// updating it.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        if len == 0 {
            return self.values.first().copied();
        }
        if len == 1 {
            return Some(*self.get_value_at(0));
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found_index = if time >= t_curr {
            // Forward playback: scan a few intervals to the right.
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    if time >= self.times[len - 1] {
                        res = Some(len - 1);
                    }
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Reverse playback or a reset back to zero: scan to the left.
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                if i < offset {
                    break;
                }
                let idx = i - offset;
                if time >= self.times[idx] {
                    res = Some(idx);
                    break;
                }
            }
            res
        };

        let final_index = found_index.unwrap_or_else(|| {
            // Large jump: fall back to a binary search.
            let next_idx = self.times.partition_point(|&t| t <= time);
            next_idx.saturating_sub(1)
        });
        cursor.last_index = final_index;

        Some(self.sample_at_frame(final_index, time))
    }

    fn get_value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            _ => &self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();

        if index >= len - 1 {
            return *self.get_value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => *self.get_value_at(index),
            InterpolationMode::Linear => {
                T::interpolate_linear(*self.get_value_at(index), *self.get_value_at(next_idx), t)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                let v0 = self.values[i_prev + 1];
                let out_tangent0 = self.values[i_prev + 2];
                let in_tangent1 = self.values[i_next];
                let v1 = self.values[i_next + 1];

                T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, t, dt)
            }
        }
    }
}
