//! Property tests for the class/unit geometry

use proptest::prelude::*;

use lvq_core::lrate::LRateFunction;
use lvq_core::lvq::{Lvq, LvqAlgorithm, LvqConfig};
use lvq_core::vector::VectorMetric;

fn learner(classes: usize, units_per_class: usize) -> Lvq {
    Lvq::new(LvqConfig {
        algorithm: LvqAlgorithm::Lvq1,
        lrate: LRateFunction::Constant { rate: 0.1 },
        metric: VectorMetric::Euclidean,
        output_classes: classes,
        units_per_class,
        window_width: 0.5,
        epsilon: 0.5,
    })
    .unwrap()
}

proptest! {
    #[test]
    fn every_class_owns_exactly_m_units(
        classes in 1usize..12,
        units_per_class in 1usize..8,
    ) {
        let lvq = learner(classes, units_per_class);
        let mut per_class = vec![0usize; classes];
        for unit in 1..=classes * units_per_class {
            let class = lvq.class_of_unit(unit);
            prop_assert!((1..=classes).contains(&class));
            per_class[class - 1] += 1;
        }
        prop_assert!(per_class.iter().all(|&n| n == units_per_class));
    }

    #[test]
    fn unit_blocks_are_contiguous(
        classes in 1usize..8,
        units_per_class in 1usize..8,
    ) {
        let lvq = learner(classes, units_per_class);
        let mut last = 1;
        for unit in 1..=classes * units_per_class {
            let class = lvq.class_of_unit(unit);
            // Classes appear in non-decreasing order along the layer
            prop_assert!(class >= last);
            prop_assert!(class - last <= 1);
            last = class;
        }
        prop_assert_eq!(last, classes);
    }
}
