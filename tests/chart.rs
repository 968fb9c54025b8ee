use diesel_heat_balance::chart::{nice_ticks, render_image, ChartError, HeatBalanceChart, Marker};
use diesel_heat_balance::engine::{run_batch, EngineConstants, ReadingInput};

fn sample_chart(loads: &[f64]) -> HeatBalanceChart {
    let inputs: Vec<ReadingInput> = loads
        .iter()
        .map(|&load| ReadingInput {
            load_current_a: load,
            fuel_time_s: 25.0,
            water_inlet_c: 25.0,
            water_outlet_c: 45.0,
            water_mass_kg: 1.0,
            gas_inlet_c: 150.0,
            gas_outlet_c: 300.0,
            manometer_high_cm: 10.0,
            manometer_low_cm: 4.0,
        })
        .collect();
    let run = run_batch(&inputs, &EngineConstants::default()).expect("run");
    HeatBalanceChart::from_results(&run.results)
}

#[test]
fn four_cumulative_series_with_distinct_markers() {
    let chart = sample_chart(&[5.0, 10.0, 15.0]);
    assert_eq!(chart.x_kw, vec![1.1, 2.2, 3.3]);
    assert_eq!(chart.series.len(), 4);
    let markers: Vec<Marker> = chart.series.iter().map(|s| s.marker).collect();
    assert_eq!(
        markers,
        vec![Marker::Circle, Marker::Square, Marker::Triangle, Marker::Diamond]
    );
    assert_eq!(chart.series[0].label, "BP (Cumulative %)");
    assert!(chart.series.iter().all(|s| s.values.len() == 3));
    // 누적값이므로 계열 순서대로 커진다.
    assert!(chart.series[0].values[0] < chart.series[2].values[0]);
}

#[test]
fn bounds_pad_the_data_range() {
    let chart = sample_chart(&[5.0, 15.0]);
    let b = chart.bounds().expect("bounds");
    assert!(b.x_min < 1.1 && b.x_max > 3.3);
    assert!(b.y_min < chart.series[0].values[0]);
    assert!(b.y_max > 99.0);
}

#[test]
fn single_point_still_has_a_range() {
    let chart = sample_chart(&[5.0]);
    let b = chart.bounds().expect("bounds");
    assert!(b.x_max > b.x_min);
    assert!(b.y_max > b.y_min);
}

#[test]
fn non_finite_points_are_skipped() {
    let mut chart = sample_chart(&[5.0, 10.0]);
    chart.series[2].values[1] = f64::NAN;
    let pts: Vec<_> = chart.points(&chart.series[2]).collect();
    assert!(pts[0].is_some());
    assert!(pts[1].is_none());
}

#[test]
fn ticks_use_round_steps() {
    assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    let ticks = nice_ticks(1.05, 3.35, 8);
    assert!(ticks.first().is_some_and(|t| *t >= 1.05));
    assert!(ticks.last().is_some_and(|t| *t <= 3.35));
    assert!(nice_ticks(1.0, 1.0, 5).is_empty());
}

#[test]
fn rendered_image_has_requested_size_and_series_colour() {
    let chart = sample_chart(&[5.0, 10.0, 15.0]);
    let img = render_image(&chart, 400, 300).expect("image");
    assert_eq!(img.dimensions(), (400, 300));
    let blue = chart.series[0].color;
    assert!(img.pixels().any(|p| p.0 == blue));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
}

#[test]
fn empty_or_tiny_charts_are_rejected() {
    let empty = HeatBalanceChart::from_results(&[]);
    assert!(matches!(render_image(&empty, 400, 300), Err(ChartError::NoData)));
    let chart = sample_chart(&[5.0]);
    assert!(matches!(
        render_image(&chart, 100, 300),
        Err(ChartError::InvalidSize { width: 100, height: 300 })
    ));
}

#[test]
fn ticks_stop_when_step_is_below_float_resolution() {
    // 1e16 부근의 ulp는 2이므로 간격 1은 표현할 수 없다.
    assert!(nice_ticks(1e16, 1e16 + 8.0, 8).is_empty());
    let ticks = nice_ticks(1.0e16, 1.0e16 + 40.0, 8);
    assert!(ticks.len() <= 8 * 4 + 2);
}

#[test]
fn huge_loads_still_render() {
    let chart = sample_chart(&[4.6e16, 4.6e16 + 40.0]);
    let b = chart.bounds().expect("bounds");
    assert!(nice_ticks(b.x_min, b.x_max, 8).len() <= 8 * 4 + 2);
    let img = render_image(&chart, 400, 300).expect("image");
    assert_eq!(img.dimensions(), (400, 300));
}
