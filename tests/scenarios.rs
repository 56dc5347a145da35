use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;

use xsgrid::configuration::{
    Configuration,
    ToleranceConfiguration
};
use xsgrid::error::griderror::GridError;
use xsgrid::grid::aggregator::aggregate;
use xsgrid::grid::grid::Grid;
use xsgrid::grid::gridgenerator::GridGenerator;
use xsgrid::grid::resampler::resample;
use xsgrid::grid::uniongridbuilder::UnionGridBuilder;
use xsgrid::math::function::analyticfunction::AnalyticFunction;
use xsgrid::math::function::evaluatablefunction::EvaluatableFunction;
use xsgrid::math::function::sumfunction::SumFunction;
use xsgrid::math::function::tabularfunction::TabularFunction;
use xsgrid::math::interpolation::InterpolationPolicy;
use xsgrid::search::gridsearcher::{
    BinarySearchGridSearcher,
    GridSearcher
};
use xsgrid::search::hashbasedgridsearcher::HashBasedGridSearcher;
use xsgrid::table::generationunit::GenerationUnit;
use xsgrid::table::tablegenerator::TableGenerator;

fn linlin(relative: f64, distance: f64) -> GridGenerator {
    let tolerance = ToleranceConfiguration::new(relative, distance, f64::MIN_POSITIVE).unwrap();
    GridGenerator::new(tolerance, InterpolationPolicy::LinLin).unwrap()
}

fn step(x: f64) -> f64 {
    if x < 1.0 { 0.0 } else { 10.0 }
}

#[test]
fn inverse_square_is_dense_near_the_singularity() {
    let inverse_square = |x: f64| 1.0 / (x * x);
    let f = AnalyticFunction::new(inverse_square);
    let grid = linlin(1e-3, 1e-13).refine(&[1e-5, 20.0], &f).unwrap();
    let points = grid.points();

    assert_eq!(grid.front(), 1e-5);
    assert_eq!(grid.back(), 20.0);
    assert!(points[1] - points[0] < points[points.len() - 1] - points[points.len() - 2]);
    let below_1e_4 = points.iter().filter(|&&x| x < 1e-4).count();
    let above_10 = points.iter().filter(|&&x| x > 10.0).count();
    assert!(below_1e_4 > 0 && above_10 > 0);

    for pair in points.windows(2) {
        let xm = 0.5 * (pair[0] + pair[1]);
        let estimate = 0.5 * (inverse_square(pair[0]) + inverse_square(pair[1]));
        let truth = inverse_square(xm);
        assert!((truth - estimate).abs() / truth <= 1e-3 * (1.0 + 1e-9), "interval {pair:?}");
    }
}

#[test]
fn step_and_constant_share_a_grid() {
    let distance = 1e-9;
    let constant: Arc<dyn EvaluatableFunction> = Arc::new(AnalyticFunction::constant(5.0));
    let jump: Arc<dyn EvaluatableFunction> = Arc::new(AnalyticFunction::new(step));
    let union = UnionGridBuilder::new(linlin(1e-3, distance))
        .build(&[0.0, 2.0], &[constant.clone(), jump.clone()])
        .unwrap();
    let grid = union.grid();
    let points = grid.points();

    let at = points.iter().position(|&x| x == 1.0).unwrap();
    let below = points[at - 1];
    assert!(below < 1.0);
    assert!(1.0 - below <= 2.0 * distance);
    assert!(points.windows(2).all(|pair| pair[1] - pair[0] > distance));
    assert_eq!(union.threshold_indices(), &[Some(0), Some(at)]);

    let mut arrays = BTreeMap::new();
    arrays.insert("constant".to_owned(), resample(grid, constant.as_ref()).unwrap());
    arrays.insert("step".to_owned(), resample(grid, jump.as_ref()).unwrap());
    let total = aggregate("total", grid, &arrays, &["constant", "step"]).unwrap();

    assert!(total.has_shared_energy_grid());
    for (x, value) in points.iter().zip(total.values()) {
        let expected = if *x < 1.0 { 5.0 } else { 15.0 };
        assert_eq!(*value, expected, "x = {x}");
    }
}

#[test]
fn hashed_lookup_agrees_with_binary_search() {
    let grid = Arc::new(Grid::new((0..=100).map(f64::from).collect()).unwrap());
    let hashed = HashBasedGridSearcher::new(grid.clone(), 4).unwrap();
    let plain = BinarySearchGridSearcher::new(grid);

    assert_eq!(hashed.find_lower_bound_index(50.5).unwrap(), 50);
    assert_eq!(plain.find_lower_bound_index(50.5).unwrap(), 50);
    assert!(matches!(
        hashed.find_lower_bound_index(100.5),
        Err(GridError::OutOfBounds { .. })
    ));
}

#[test]
fn union_grid_does_not_depend_on_function_order() {
    let a: Arc<dyn EvaluatableFunction> = Arc::new(AnalyticFunction::new(|x: f64| (-x).exp()));
    let b: Arc<dyn EvaluatableFunction> = Arc::new(AnalyticFunction::new(|x: f64| 1.5 + (3.0 * x).sin()));
    let c: Arc<dyn EvaluatableFunction> = Arc::new(
        TabularFunction::from_points(
            InterpolationPolicy::LinLin,
            &[(0.7, 0.1), (1.3, 2.0), (2.0, 0.4), (4.0, 0.3)],
        )
        .unwrap(),
    );
    let builder = UnionGridBuilder::new(linlin(1e-3, 1e-9));
    let orders = [
        [&a, &b, &c],
        [&a, &c, &b],
        [&b, &a, &c],
        [&b, &c, &a],
        [&c, &a, &b],
        [&c, &b, &a],
    ];

    let reference = builder
        .build(&[0.0, 4.0], &[a.clone(), b.clone(), c.clone()])
        .unwrap();
    for order in orders {
        let functions: Vec<Arc<dyn EvaluatableFunction>> = order.iter().map(|f| Arc::clone(*f)).collect();
        let union = builder.build(&[0.0, 4.0], &functions).unwrap();
        assert_eq!(union.grid().points(), reference.grid().points());
    }

    for f in [&a, &b, &c] {
        let alone = builder.generator().refine(&[0.0, 4.0], f.as_ref()).unwrap();
        assert!(reference.grid().contains_all(alone.points()));
    }
}

#[test]
fn refining_a_union_grid_again_adds_nothing() {
    let a: Arc<dyn EvaluatableFunction> = Arc::new(AnalyticFunction::new(|x: f64| x.sqrt() + 0.1));
    let b: Arc<dyn EvaluatableFunction> = Arc::new(AnalyticFunction::new(|x: f64| 1.0 / (1.0 + x)));
    let builder = UnionGridBuilder::new(linlin(1e-4, 1e-12));
    let union = builder.build(&[0.0, 1.0, 9.0], &[a.clone(), b.clone()]).unwrap();

    for function in [&a, &b] {
        let mut points = union.grid().points().to_vec();
        let summary = builder.generator().refine_in_place(&mut points, function.as_ref()).unwrap();
        assert_eq!(summary.points_added, 0);
        assert_eq!(points, union.grid().points());
    }

    let total = SumFunction::new(vec![a, b]).unwrap();
    let grid = builder.generator().refine(union.grid().points(), &total).unwrap();
    assert!(grid.contains_all(union.grid().points()));
    assert_relative_eq!(total.evaluate(4.0), 2.1 + 0.2, max_relative = 1e-12);
}

#[test]
fn generated_table_serves_concurrent_lookups() {
    let configuration = Configuration {
        tolerance: ToleranceConfiguration::new(1e-3, 1e-10, f64::MIN_POSITIVE).unwrap(),
        hash_bins: 32,
        ..Configuration::default()
    };
    let generator = TableGenerator::new(configuration).unwrap();
    let unit = GenerationUnit::new("O")
        .with_mandatory_points(&[0.0, 1.0, 2.0])
        .with_function("constant", Arc::new(AnalyticFunction::constant(5.0)))
        .with_function("step", Arc::new(AnalyticFunction::new(step)))
        .with_composite("total", &["constant", "step"]);
    let table = Arc::new(generator.generate(&unit).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for k in 0..500 {
                    let x = (k as f64 + 0.25 * t as f64) / 250.0;
                    let value = table.evaluate("total", x).unwrap();
                    if x < 0.999 {
                        assert_relative_eq!(value, 5.0);
                    } else if x >= 1.0 {
                        assert_relative_eq!(value, 15.0);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
