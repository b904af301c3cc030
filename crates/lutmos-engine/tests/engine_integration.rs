//! Integration tests for the lookup-table engine.

use std::sync::Arc;

use approx::assert_relative_eq;
use lutmos_core::{Quantity, SampleRow};
use lutmos_interp::{Kernel, RbfConfig};
use lutmos_engine::{
    EngineConfig, ErrorKind, EstimateMethod, EstimateMode, LengthAnswer, LutEngine, PlaneSelection,
};

const BIASES: [f64; 3] = [0.2, 0.4, 0.8];
const GM_IDS: [f64; 4] = [5.0, 10.0, 15.0, 20.0];
const LENGTHS: [f64; 4] = [100.0, 200.0, 400.0, 800.0];

/// Synthetic device surfaces, affine in gm/Id and length on every plane.
fn surface(quantity: Quantity, gm_id: f64, length: f64, bias: f64) -> f64 {
    match quantity {
        Quantity::IdW => 50.0 - 2.0 * gm_id + length / 100.0 + 10.0 * bias,
        Quantity::Gmro => 5.0 + gm_id / 2.0 + length / 20.0 + 10.0 * bias,
        Quantity::Ft => 30.0 + 3.0 * gm_id - length / 50.0 + 20.0 * bias,
    }
}

fn rows(quantity: Quantity, bias: f64) -> Vec<SampleRow> {
    LENGTHS
        .iter()
        .flat_map(|&l| GM_IDS.map(|g| SampleRow::new(g, l, surface(quantity, g, l, bias))))
        .collect()
}

fn record_all(lut: &mut LutEngine) {
    for quantity in Quantity::ALL {
        for bias in BIASES {
            lut.record(quantity, bias, rows(quantity, bias))
                .expect("record should accept clean rows");
        }
    }
}

fn built_engine(config: EngineConfig) -> LutEngine {
    let mut lut = LutEngine::with_config(config);
    record_all(&mut lut);
    lut.rebuild().expect("rebuild should succeed");
    lut
}

#[test]
fn test_exact_at_training_points() {
    let lut = built_engine(EngineConfig::default());
    for quantity in Quantity::ALL {
        for &l in &LENGTHS {
            for &g in &GM_IDS {
                let value = lut.predict(quantity, g, 0.4, l).unwrap();
                assert_relative_eq!(
                    value,
                    surface(quantity, g, l, 0.4),
                    max_relative = 1e-6
                );
            }
        }
    }
}

#[test]
fn test_affine_surface_off_grid() {
    let lut = built_engine(EngineConfig::default());
    let value = lut.predict(Quantity::Ft, 12.5, 0.8, 300.0).unwrap();
    assert_relative_eq!(
        value,
        surface(Quantity::Ft, 12.5, 300.0, 0.8),
        max_relative = 1e-4
    );
}

/// Below the lowest plane and above the highest one the query is pinned to
/// the boundary plane.
#[test]
fn test_clamping_to_boundary_planes() {
    let lut = built_engine(EngineConfig::default());
    for quantity in Quantity::ALL {
        let low = lut.predict(quantity, 12.0, 0.2, 300.0).unwrap();
        let high = lut.predict(quantity, 12.0, 0.8, 300.0).unwrap();
        for bias in [0.1, 0.0, -1.0] {
            assert_eq!(lut.predict(quantity, 12.0, bias, 300.0).unwrap(), low);
        }
        for bias in [0.9, 1.5] {
            assert_eq!(lut.predict(quantity, 12.0, bias, 300.0).unwrap(), high);
        }
    }
}

#[test]
fn test_linear_blend_between_planes() {
    let lut = built_engine(EngineConfig::default());
    let (g, l) = (8.0, 250.0);
    let y1 = lut.predict(Quantity::Gmro, g, 0.4, l).unwrap();
    let y2 = lut.predict(Quantity::Gmro, g, 0.8, l).unwrap();

    for t in [0.1, 0.25, 0.5, 0.9] {
        let bias = 0.4 + t * 0.4;
        let blended = lut.predict(Quantity::Gmro, g, bias, l).unwrap();
        assert_relative_eq!(blended, y1 + t * (y2 - y1), max_relative = 1e-9);
    }

    let detailed = lut.predict_detailed(Quantity::Gmro, g, 0.6, l).unwrap();
    match detailed.selection {
        PlaneSelection::Blend { lower, upper, t } => {
            assert_eq!((lower, upper), (0.4, 0.8));
            assert_relative_eq!(t, 0.5, epsilon = 1e-12);
        }
        other => panic!("expected blend, got {:?}", other),
    }
}

#[test]
fn test_predict_all_matches_single_predictions() {
    let lut = built_engine(EngineConfig::default());
    let figures = lut.predict_all(11.0, 0.3, 520.0).unwrap();
    for (quantity, value) in figures.iter() {
        assert_eq!(value, lut.predict(quantity, 11.0, 0.3, 520.0).unwrap());
    }
}

#[test]
fn test_unknown_quantity_name() {
    let lut = built_engine(EngineConfig::default());
    let err = lut.predict_by_name("vth", 10.0, 0.4, 200.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidQuantity);
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut lut = built_engine(EngineConfig::default());
    let before = lut.predict_all(9.0, 0.55, 333.0).unwrap();
    lut.rebuild().unwrap();
    let after = lut.predict_all(9.0, 0.55, 333.0).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_parallel_and_sequential_rebuild_agree() {
    let parallel = built_engine(EngineConfig::default());
    let sequential = built_engine(EngineConfig::default().with_parallel_rebuild(false));
    for bias in [0.1, 0.2, 0.3, 0.8] {
        assert_eq!(
            parallel.predict_all(14.0, bias, 650.0).unwrap(),
            sequential.predict_all(14.0, bias, 650.0).unwrap()
        );
    }
}

/// At gm/Id 10 on the 0.4 V plane gmro is 14 + L/20, i.e. 19, 24, 34, 54 over
/// the four lengths.
#[test]
fn test_length_round_trip() {
    let lut = built_engine(EngineConfig::default());

    match lut
        .estimate_length(10.0, 29.0, 0.4, EstimateMode::Continuous)
        .unwrap()
    {
        LengthAnswer::Continuous {
            continuous_nm,
            discrete_nm,
        } => {
            assert_relative_eq!(continuous_nm, 300.0, epsilon = 1e-9);
            assert_eq!(discrete_nm, 400);
        }
        other => panic!("expected continuous answer, got {:?}", other),
    }

    // On a tabulated value the lower bracket wins and the discrete answer is
    // its upper end.
    let answer = lut
        .estimate_length(10.0, 19.0, 0.4, EstimateMode::Discrete)
        .unwrap();
    assert_eq!(answer, LengthAnswer::Discrete(200));

    let detailed = lut.estimate_length_detailed(10.0, 24.0, 0.4).unwrap();
    assert_eq!(detailed.bracket_count, 2);
    assert_eq!(
        detailed.method,
        EstimateMethod::Bracketed {
            lower: 100,
            upper: 200
        }
    );
    assert_eq!(detailed.discrete_nm, 200);
    assert_eq!(detailed.curve.len(), LENGTHS.len());
}

#[test]
fn test_length_estimate_snaps_bias() {
    let lut = built_engine(EngineConfig::default());
    // 0.3 is equidistant from 0.2 and 0.4; the lower plane is used.
    let detailed = lut.estimate_length_detailed(10.0, 30.0, 0.3).unwrap();
    assert_eq!(detailed.plane_bias, 0.2);
    let detailed = lut.estimate_length_detailed(10.0, 30.0, 5.0).unwrap();
    assert_eq!(detailed.plane_bias, 0.8);
}

#[test]
fn test_length_outside_curve_uses_nearest() {
    let lut = built_engine(EngineConfig::default());
    let detailed = lut.estimate_length_detailed(10.0, 500.0, 0.4).unwrap();
    assert_eq!(detailed.method, EstimateMethod::Nearest);
    assert_eq!(detailed.discrete_nm, 800);
    assert_eq!(detailed.continuous_nm, 800.0);
}

#[test]
fn test_queries_before_rebuild() {
    let mut lut = LutEngine::new();
    record_all(&mut lut);
    assert!(lut.needs_rebuild());

    let err = lut.predict(Quantity::IdW, 10.0, 0.4, 200.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotBuilt);
    let err = lut
        .estimate_length(10.0, 20.0, 0.4, EstimateMode::Discrete)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotBuilt);
}

#[test]
fn test_missing_quantities_are_data_errors() {
    let mut lut = LutEngine::new();
    lut.record(Quantity::IdW, 0.4, rows(Quantity::IdW, 0.4))
        .unwrap();
    lut.rebuild().unwrap();

    let err = lut.predict(Quantity::Ft, 10.0, 0.4, 200.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    let err = lut
        .estimate_length(10.0, 20.0, 0.4, EstimateMode::Discrete)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
}

#[test]
fn test_nan_bias_falls_back_to_last_plane() {
    let lut = built_engine(EngineConfig::default());
    let prediction = lut
        .predict_detailed(Quantity::IdW, 10.0, f64::NAN, 200.0)
        .unwrap();
    assert_eq!(prediction.selection, PlaneSelection::Fallback { bias: 0.8 });
    assert_eq!(
        prediction.value,
        lut.predict(Quantity::IdW, 10.0, 0.8, 200.0).unwrap()
    );
}

#[test]
fn test_bias_tolerance_widens_exact_match() {
    let strict = built_engine(EngineConfig::default());
    let loose = built_engine(EngineConfig::default().with_bias_tolerance(1e-9));
    let bias = 0.4 + 1e-12;

    let selection = strict
        .predict_detailed(Quantity::Gmro, 10.0, bias, 200.0)
        .unwrap()
        .selection;
    assert!(matches!(selection, PlaneSelection::Blend { .. }));

    let selection = loose
        .predict_detailed(Quantity::Gmro, 10.0, bias, 200.0)
        .unwrap()
        .selection;
    assert_eq!(selection, PlaneSelection::Exact { bias: 0.4 });
}

#[test]
fn test_shared_engine_across_threads() {
    let lut = Arc::new(built_engine(EngineConfig::default()));
    let expected = lut.predict_all(10.0, 0.5, 300.0).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lut = Arc::clone(&lut);
            std::thread::spawn(move || lut.predict_all(10.0, 0.5, 300.0).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

/// Repeated samples at a single coordinate cannot define a surface, even for
/// a kernel that needs no polynomial tail.
#[test]
fn test_coincident_samples_fail_rebuild() {
    let config = EngineConfig::default().with_rbf(
        RbfConfig::new(Kernel::Gaussian)
            .with_epsilon(1.0)
            .with_degree(-1),
    );
    let mut lut = LutEngine::with_config(config);
    lut.record(
        Quantity::Ft,
        0.4,
        [SampleRow::new(10.0, 100.0, 1.0), SampleRow::new(10.0, 100.0, 3.0)],
    )
    .unwrap();

    let err = lut.rebuild().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(!lut.is_built());
    let err = lut.predict(Quantity::Ft, 10.0, 0.4, 100.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotBuilt);
}
