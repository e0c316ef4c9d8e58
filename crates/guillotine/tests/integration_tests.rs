//! Integration tests for u-guillotine.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use u_guillotine::{
    BboxOptimization, Bin, BinOrigin, Box2D, Config, Error, ErrorCode, PackEngine, Packing,
    PresortStrategy, Solver, StackingMode,
};

fn panels(specs: &[(f64, f64, usize)]) -> Vec<Box2D> {
    let mut boxes = Vec::new();
    for (kind, &(length, width, count)) in specs.iter().enumerate() {
        for i in 0..count {
            boxes.push(Box2D::new(format!("P{}-{}", kind, i), length, width));
        }
    }
    boxes
}

fn mixed_job() -> Vec<Box2D> {
    panels(&[
        (600.0, 400.0, 3),
        (450.0, 300.0, 4),
        (800.0, 150.0, 5),
        (250.0, 250.0, 6),
        (1200.0, 90.0, 2),
        (300.0, 120.0, 7),
    ])
}

fn assert_valid_layout(packing: &Packing, requested: &[Box2D]) {
    for bin in &packing.bins {
        let envelope = bin.trimmed_envelope();
        for (i, a) in bin.boxes.iter().enumerate() {
            assert!(!a.is_superbox, "superbox {:?} left in output", a);
            assert!(envelope.contains(a), "{:?} outside {:?}", a, envelope);
            for b in &bin.boxes[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.id, b.id);
            }
            for leftover in &bin.leftovers {
                let as_box = {
                    let mut r = Box2D::new("leftover", leftover.length, leftover.width);
                    r.x = leftover.x;
                    r.y = leftover.y;
                    r
                };
                assert!(!a.overlaps(&as_box), "{} overlaps a leftover", a.id);
            }
        }
        for cut in &bin.cuts {
            assert_eq!(cut.bin_index, bin.index);
            assert!(cut.length > 0.0);
        }
    }

    // Every requested box is either placed with a consistent orientation or
    // reported unplaced.
    for original in requested {
        let placed: Vec<&Box2D> = packing
            .bins
            .iter()
            .flat_map(|b| &b.boxes)
            .filter(|b| b.id == original.id)
            .collect();
        let unplaced = packing
            .unplaced
            .iter()
            .filter(|b| b.id == original.id)
            .count();
        assert_eq!(placed.len() + unplaced, 1, "box {} accounted once", original.id);

        if let Some(p) = placed.first() {
            if p.rotated {
                assert_eq!((p.length, p.width), (original.width, original.length));
            } else {
                assert_eq!((p.length, p.width), (original.length, original.width));
            }
        }
    }
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_scenario_a_single_sheet() {
        let engine = PackEngine::new(Config::new().with_kerf(3.0));
        let bins = vec![Bin::new(2000.0, 1000.0)];
        let boxes = panels(&[(400.0, 300.0, 5)]);

        let packing = engine.run(&bins, &boxes).unwrap();

        assert!(packing.all_placed());
        assert_eq!(packing.placed_count(), 5);
        assert_eq!(packing.performance.bins_used, 1);
        assert!(packing.performance.leftover_count >= 1);
        assert_valid_layout(&packing, &boxes);
    }

    #[test]
    fn test_scenario_b_oversized_only() {
        let engine = PackEngine::new(Config::new().with_kerf(4.0).with_base_bin(1000.0, 1000.0));
        let boxes = panels(&[(1200.0, 200.0, 3)]);

        let result = engine.run(&[], &boxes);
        assert!(matches!(result, Err(Error::NoPlacementPossible)));
        assert_eq!(ErrorCode::from(&result), ErrorCode::NoPlacementPossible);
    }

    #[test]
    fn test_scenario_b_oversized_with_placeable() {
        let engine = PackEngine::new(Config::new().with_kerf(4.0).with_base_bin(1000.0, 1000.0));
        let mut boxes = panels(&[(1200.0, 200.0, 3)]);
        boxes.push(Box2D::new("small", 100.0, 100.0));

        let result = engine.run(&[], &boxes);
        assert_eq!(ErrorCode::from(&result), ErrorCode::None);

        let packing = result.unwrap();
        assert_eq!(packing.placed_count(), 1);
        assert_eq!(packing.unplaced_count(), 3);
        assert!(packing.unplaced.iter().all(|b| b.length == 1200.0));
        assert_eq!(packing.bins[0].origin, BinOrigin::AutoGenerated);
    }

    #[test]
    fn test_scenario_c_stacking() {
        let config = Config::new()
            .with_kerf(4.0)
            .with_base_bin(2000.0, 1000.0)
            .with_stacking(StackingMode::AlongLength);
        let engine = PackEngine::new(config);
        let boxes: Vec<Box2D> = [300.0, 250.0, 200.0, 150.0, 100.0]
            .iter()
            .enumerate()
            .map(|(i, &l)| Box2D::new(format!("S{}", i), l, 100.0))
            .collect();

        let packing = engine.run(&[], &boxes).unwrap();
        assert!(packing.all_placed());
        assert_eq!(packing.performance.bins_used, 1);

        let bin = &packing.bins[0];
        assert_eq!(bin.boxes.len(), 5);
        let secondary: Vec<_> = bin.cuts.iter().filter(|c| !c.is_primary).collect();
        assert_eq!(secondary.len(), 4);

        let mut strip: Vec<&Box2D> = bin.boxes.iter().collect();
        strip.sort_by(|a, b| a.x.total_cmp(&b.x));
        for pair in strip.windows(2) {
            assert_abs_diff_eq!(pair[0].y, pair[1].y);
            assert_abs_diff_eq!(pair[0].x + pair[0].length + 4.0, pair[1].x, epsilon = 1e-9);
        }
        assert_valid_layout(&packing, &boxes);
    }

    #[test]
    fn test_scenario_d_no_bin() {
        let engine = PackEngine::new(Config::new().with_kerf(3.0));
        let result = engine.run(&[], &panels(&[(100.0, 100.0, 2)]));
        assert!(matches!(result, Err(Error::NoBin)));
        assert_eq!(ErrorCode::from(&result), ErrorCode::NoBin);
    }
}

mod property_tests {
    use super::*;

    #[test]
    fn test_mixed_job_layout() {
        let config = Config::new()
            .with_kerf(4.0)
            .with_trimming(10.0)
            .with_base_bin(2800.0, 2070.0);
        let boxes = mixed_job();
        let packing = PackEngine::new(config).run(&[], &boxes).unwrap();

        assert!(packing.all_placed());
        assert_valid_layout(&packing, &boxes);
        for bin in &packing.bins {
            assert_eq!((bin.length, bin.width), (2800.0, 2070.0));
            assert!(!bin.is_trimmed);
            assert_eq!(bin.trim_margin, 10.0);
        }
    }

    #[test]
    fn test_area_accounts_for_kerf() {
        // Every dimension is a multiple of the kerf, so no remainder is
        // clamped and no piece narrower than a kerf is dropped: boxes,
        // leftovers and saw strips tile the trimmed sheet exactly.
        let kerf = 5.0;
        for stacking in [StackingMode::None, StackingMode::AlongLength] {
            let config = Config::new()
                .with_kerf(kerf)
                .with_trimming(5.0)
                .with_stacking(stacking)
                .with_base_bin(1500.0, 1000.0);
            let boxes = mixed_job();
            let packing = PackEngine::new(config).run(&[], &boxes).unwrap();
            assert!(packing.all_placed());

            for bin in &packing.bins {
                let boxes_area: f64 = bin.boxes.iter().map(Box2D::area).sum();
                let leftover_area: f64 = bin.leftovers.iter().map(Bin::area).sum();
                let kerf_area: f64 = bin.cuts.iter().map(|c| c.length * kerf).sum();
                let accounted = boxes_area + leftover_area + kerf_area;
                assert!(
                    accounted <= bin.trimmed_area() + 1e-6,
                    "{:?}: {} exceeds {}",
                    stacking,
                    accounted,
                    bin.trimmed_area()
                );
                assert!(
                    accounted >= bin.trimmed_area() - 1e-6,
                    "{:?}: {} lost from {}",
                    stacking,
                    bin.trimmed_area() - accounted,
                    bin.trimmed_area()
                );
            }
        }
    }

    #[test]
    fn test_area_conserved_without_kerf() {
        let config = Config::new().with_base_bin(1500.0, 1000.0);
        let boxes = mixed_job();
        let packing = PackEngine::new(config).run(&[], &boxes).unwrap();

        for bin in &packing.bins {
            let boxes_area: f64 = bin.boxes.iter().map(Box2D::area).sum();
            let leftover_area: f64 = bin.leftovers.iter().map(Bin::area).sum();
            assert_relative_eq!(boxes_area + leftover_area, bin.trimmed_area(), max_relative = 1e-9);
        }
    }

    #[test]
    fn test_no_rotation_keeps_orientation() {
        let config = Config::new()
            .with_kerf(2.0)
            .with_rotation(false)
            .with_base_bin(2000.0, 1000.0);
        let boxes = mixed_job();
        let packing = PackEngine::new(config).run(&[], &boxes).unwrap();

        assert!(packing
            .bins
            .iter()
            .flat_map(|b| &b.boxes)
            .all(|b| !b.rotated));
        assert_valid_layout(&packing, &boxes);
    }

    #[test]
    fn test_bbox_and_stacking_layout() {
        let config = Config::new()
            .with_kerf(3.0)
            .with_base_bin(2440.0, 1220.0)
            .with_stacking(StackingMode::AlongWidth)
            .with_bbox_optimization(BboxOptimization::Always)
            .with_presort(PresortStrategy::LengthDesc);
        let boxes = mixed_job();
        let packing = PackEngine::new(config).run(&[], &boxes).unwrap();

        assert!(packing.all_placed());
        assert_valid_layout(&packing, &boxes);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let config = Config::new()
            .with_kerf(3.0)
            .with_base_bin(2000.0, 1000.0)
            .with_stacking(StackingMode::AlongLength);
        let boxes = mixed_job();

        let sequential = PackEngine::new(config.clone().with_threads(1))
            .run(&[], &boxes)
            .unwrap();
        let parallel = PackEngine::new(config.clone().with_threads(0))
            .run(&[], &boxes)
            .unwrap();
        let pooled = PackEngine::new(config.with_threads(3))
            .run(&[], &boxes)
            .unwrap();

        assert_eq!(sequential.strategy_label(), parallel.strategy_label());
        assert_eq!(sequential.bins, parallel.bins);
        assert_eq!(sequential.bins, pooled.bins);
        assert_eq!(sequential.performance, parallel.performance);
    }

    #[test]
    fn test_input_is_not_modified() {
        let bins = vec![Bin::new(1000.0, 1000.0)];
        let boxes = mixed_job();
        let before = boxes.clone();

        let engine = PackEngine::new(Config::new().with_base_bin(1000.0, 1000.0));
        engine.solve(&bins, &boxes).unwrap();

        assert_eq!(boxes, before);
        assert!(bins[0].boxes.is_empty());
    }

    #[test]
    fn test_summary_totals() {
        let engine = PackEngine::new(Config::new().with_kerf(3.0));
        let bins = vec![Bin::new(2000.0, 1000.0)];
        let mut boxes = panels(&[(400.0, 300.0, 5)]);
        boxes.push(Box2D::new("huge", 3000.0, 3000.0));

        let summary = engine.run(&bins, &boxes).unwrap().summary();
        assert_eq!(summary.total_requested, 6);
        assert_eq!(summary.total_placed, 5);
        assert_relative_eq!(summary.utilization_percent, 30.0, max_relative = 1e-9);
    }
}
