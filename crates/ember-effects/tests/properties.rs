//! Property-based tests for the stereo saturator.
//!
//! Random parameter sets must give finite output, and with the safety clip
//! on the output never leaves ±1.

use ember_core::{Algorithm, FilterSlope, OversampleQuality};
use ember_effects::{Saturator, SaturatorParams};
use proptest::prelude::*;

fn params_strategy() -> impl Strategy<Value = SaturatorParams> {
    (
        (0usize..Algorithm::COUNT, 0usize..5, 0usize..4),
        (-18.0f64..18.0, 0.0f64..24.0, 0.0f64..=1.0),
        (20.0f64..20000.0, 20.0f64..20000.0, 20.0f64..20000.0, 20.0f64..20000.0),
        (0.0f64..=100.0, -18.0f64..18.0, any::<bool>()),
    )
        .prop_map(
            |(
                (algo, quality, slope),
                (input_gain_db, drive_db, character),
                (pre_low_cut_hz, pre_high_cut_hz, post_low_cut_hz, post_high_cut_hz),
                (mix_percent, output_gain_db, safety_clip),
            )| SaturatorParams {
                input_gain_db,
                auto_gain: false,
                bypass: false,
                pre_low_cut_hz,
                pre_high_cut_hz,
                algorithm: Algorithm::ALL[algo],
                drive_db,
                character,
                quality: OversampleQuality::ALL[quality],
                post_low_cut_hz,
                post_high_cut_hz,
                post_slope: FilterSlope::ALL[slope],
                mix_percent,
                output_gain_db,
                safety_clip,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn output_is_finite_and_clipped(
        params in params_strategy(),
        input in prop::collection::vec(-1.0f32..=1.0f32, 64..512),
    ) {
        let mut sat = Saturator::new(48000.0);
        sat.set_params(params);

        for _ in 0..4 {
            let mut left = input.clone();
            let mut right: Vec<f32> = input.iter().map(|s| -s).collect();
            sat.process_block(&mut left, &mut right);
            for &y in left.iter().chain(&right) {
                prop_assert!(y.is_finite(), "{:?} produced {}", params.algorithm, y);
                if params.safety_clip {
                    prop_assert!(y.abs() <= 1.0);
                } else {
                    prop_assert!(y.abs() < 1e6, "{:?} blew up: {}", params.algorithm, y);
                }
            }
        }
    }

    #[test]
    fn clamped_params_are_idempotent(params in params_strategy(), scale in 0.0f64..4.0) {
        let wild = SaturatorParams {
            input_gain_db: params.input_gain_db * scale,
            drive_db: params.drive_db * scale,
            character: params.character * scale,
            mix_percent: params.mix_percent * scale,
            ..params
        };
        let once = wild.clamped();
        prop_assert_eq!(once.clamped(), once);
    }
}
