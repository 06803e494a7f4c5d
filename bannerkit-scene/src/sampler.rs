//! Keyframe sampling: linear, step, and cubic-Hermite interpolation over a
//! sorted track, with clamp or loop extrapolation outside the keyframe range.

use bannerkit_syntax::brlan::{DataType, Keyframe, Track};

/// Sample a track at frame `f`. `wrap` selects extrapolation policy outside the
/// track's own frame range: `true` wraps `f` into `[kf[0].frame, kf[last].frame)`
/// before sampling (the animation's loop-extrapolation policy), `false` clamps to
/// the nearest endpoint value.
pub fn sample_track(track: &Track, f: f32, wrap: bool) -> f32 {
    sample_keyframes(&track.keyframes, track.data_type, f, wrap)
}

fn sample_keyframes(keyframes: &[Keyframe], data_type: DataType, f: f32, wrap: bool) -> f32 {
    match keyframes.len() {
        0 => return 0.0,
        1 => return keyframes[0].value,
        _ => {}
    }

    let first = keyframes[0].frame;
    let last = keyframes[keyframes.len() - 1].frame;

    let f = if wrap && last > first {
        let span = last - first;
        first + (f - first).rem_euclid(span)
    } else {
        f
    };

    if f <= first {
        return keyframes[0].value;
    }
    if f >= last {
        return keyframes[keyframes.len() - 1].value;
    }

    match data_type {
        DataType::Step => {
            // Select the last keyframe with frame <= f (floor select).
            let idx = keyframes
                .iter()
                .rposition(|kf| kf.frame <= f)
                .unwrap_or(0);
            keyframes[idx].value
        }
        DataType::Linear => {
            let i = segment_index(keyframes, f);
            let (l, r) = (keyframes[i], keyframes[i + 1]);
            let t = (f - l.frame) / (r.frame - l.frame);
            l.value + (r.value - l.value) * t
        }
        DataType::Hermite => {
            let i = segment_index(keyframes, f);
            let (l, r) = (keyframes[i], keyframes[i + 1]);
            let t = (f - l.frame) / (r.frame - l.frame);
            hermite(t, l.value, l.blend, r.value, r.blend)
        }
    }
}

fn segment_index(keyframes: &[Keyframe], f: f32) -> usize {
    keyframes
        .windows(2)
        .position(|w| f >= w[0].frame && f <= w[1].frame)
        .unwrap_or(0)
}

/// `H(t) = (2t³-3t²+1)·vL + (t³-2t²+t)·mL + (-2t³+3t²)·vR + (t³-t²)·mR`.
fn hermite(t: f32, v_l: f32, m_l: f32, v_r: f32, m_r: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    (2.0 * t3 - 3.0 * t2 + 1.0) * v_l
        + (t3 - 2.0 * t2 + t) * m_l
        + (-2.0 * t3 + 3.0 * t2) * v_r
        + (t3 - t2) * m_r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_track(points: &[(f32, f32)]) -> Track {
        Track {
            target_group: 0,
            opcode: 0,
            data_type: DataType::Linear,
            keyframes: points
                .iter()
                .map(|&(frame, value)| Keyframe {
                    frame,
                    value,
                    blend: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn empty_track_samples_to_zero() {
        let track = linear_track(&[]);
        assert_eq!(sample_track(&track, 10.0, false), 0.0);
    }

    #[test]
    fn single_keyframe_is_constant() {
        let track = linear_track(&[(0.0, 42.0)]);
        assert_eq!(sample_track(&track, 1000.0, false), 42.0);
    }

    #[test]
    fn clamps_outside_range() {
        let track = linear_track(&[(0.0, 0.0), (60.0, 255.0)]);
        assert_eq!(sample_track(&track, -10.0, false), 0.0);
        assert_eq!(sample_track(&track, 1000.0, false), 255.0);
    }

    #[test]
    fn linear_interpolates_between_keyframes() {
        let track = linear_track(&[(0.0, 0.0), (60.0, 255.0)]);
        assert!((sample_track(&track, 30.0, false) - 127.5).abs() < 1e-3);
    }

    #[test]
    fn hermite_symmetric_midpoint_matches_spec_scenario() {
        let track = Track {
            target_group: 0,
            opcode: 0,
            data_type: DataType::Hermite,
            keyframes: vec![
                Keyframe { frame: 0.0, value: 0.0, blend: 0.0 },
                Keyframe { frame: 10.0, value: 100.0, blend: 0.0 },
            ],
        };
        assert!((sample_track(&track, 5.0, false) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn hermite_matches_keyframe_values_at_boundaries() {
        let track = Track {
            target_group: 0,
            opcode: 0,
            data_type: DataType::Hermite,
            keyframes: vec![
                Keyframe { frame: 0.0, value: 3.0, blend: 1.0 },
                Keyframe { frame: 10.0, value: 7.0, blend: -1.0 },
            ],
        };
        assert!((sample_track(&track, 0.0, false) - 3.0).abs() < 1e-4);
        assert!((sample_track(&track, 10.0, false) - 7.0).abs() < 1e-4);
    }

    #[test]
    fn step_floor_selects() {
        let track = Track {
            target_group: 0,
            opcode: 0,
            data_type: DataType::Step,
            keyframes: vec![
                Keyframe { frame: 0.0, value: 1.0, blend: 0.0 },
                Keyframe { frame: 10.0, value: 2.0, blend: 0.0 },
                Keyframe { frame: 20.0, value: 3.0, blend: 0.0 },
            ],
        };
        assert_eq!(sample_track(&track, 15.0, false), 2.0);
        assert_eq!(sample_track(&track, 20.0, false), 3.0);
    }

    #[test]
    fn wrap_extrapolation_loops_past_the_end() {
        let track = linear_track(&[(0.0, 0.0), (10.0, 100.0)]);
        // f=15 wraps to 5 within [0,10) -> halfway value.
        assert!((sample_track(&track, 15.0, true) - 50.0).abs() < 1e-3);
    }
}
