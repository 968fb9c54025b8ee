use approx::assert_relative_eq;
use diesel_heat_balance::engine::{
    calculate, calculate_batch, capture_batch, flow_detail, is_valid_batch, round2, run_batch,
    validate_batch, EngineConstants, HeatBalanceError, Reading, ReadingInput,
};

fn sample_input() -> ReadingInput {
    ReadingInput {
        load_current_a: 5.0,
        fuel_time_s: 25.0,
        water_inlet_c: 25.0,
        water_outlet_c: 45.0,
        water_mass_kg: 1.0,
        gas_inlet_c: 150.0,
        gas_outlet_c: 300.0,
        manometer_high_cm: 10.0,
        manometer_low_cm: 4.0,
    }
}

fn sample_reading(index: usize, c: &EngineConstants) -> Reading {
    Reading::capture(index, &sample_input(), c)
}

#[test]
fn reference_reading_matches_hand_calculation() {
    let c = EngineConstants::default();
    let res = calculate(&sample_reading(1, &c), &c);

    let qin = (25e-6 / 25.0) * 832.0 * 3600.0 * 42886.0;
    let qcw = (1.0 / 30.0) * 3600.0 * 4.186 * 20.0;
    assert_relative_eq!(res.heat_input_kj_per_h, round2(qin));
    assert_relative_eq!(res.brake_power_kw, 1.1);
    assert_relative_eq!(res.brake_power_kj_per_h, 3960.0);
    assert_relative_eq!(res.cooling_water_kj_per_h, round2(qcw));
    assert!((res.cooling_water_kj_per_h - 10046.4).abs() < 0.01);
    assert_relative_eq!(res.brake_power_pct, round2(3960.0 * 100.0 / qin));
    assert_eq!(res.index, 1);
}

#[test]
fn exhaust_loss_uses_orifice_air_flow() {
    let c = EngineConstants::default();
    let reading = sample_reading(1, &c);
    let flow = flow_detail(&reading, &c);

    let rho_air = 1.013e5 / (287.0 * (273.0 + 150.0));
    assert_relative_eq!(flow.air_density_kg_per_m3, rho_air, max_relative = 1e-12);
    let area = std::f64::consts::PI / 4.0 * 0.0254_f64.powi(2);
    let vol = (2.0 * 9.81 * 1000.0 * 0.06 / rho_air).sqrt() * area;
    assert_relative_eq!(flow.air_volume_flow_m3_per_s, vol, max_relative = 1e-12);
    let m_air = vol * rho_air * 3600.0;
    let qex = (m_air + 1e-6 * 3600.0) * 1.005 * 150.0;

    let res = calculate(&reading, &c);
    assert_relative_eq!(res.exhaust_kj_per_h, round2(qex), epsilon = 0.011);
}

#[test]
fn losses_close_the_balance() {
    let c = EngineConstants::default();
    let res = calculate(&sample_reading(1, &c), &c);
    let sum = res.brake_power_kj_per_h
        + res.cooling_water_kj_per_h
        + res.exhaust_kj_per_h
        + res.unaccounted_kj_per_h;
    assert!((sum - res.heat_input_kj_per_h).abs() <= 0.05, "sum={sum}");
    assert!((res.unaccounted_cum_pct - 100.0).abs() <= 0.05);
}

#[test]
fn cumulative_percentages_are_sums_of_rounded_components() {
    let c = EngineConstants::default();
    let res = calculate(&sample_reading(1, &c), &c);
    assert_eq!(res.brake_power_cum_pct, res.brake_power_pct);
    assert_relative_eq!(
        res.cooling_water_cum_pct,
        round2(res.brake_power_pct + res.cooling_water_pct)
    );
    assert_relative_eq!(
        res.exhaust_cum_pct,
        round2(res.brake_power_pct + res.cooling_water_pct + res.exhaust_pct)
    );
    assert!(res.brake_power_cum_pct <= res.cooling_water_cum_pct);
    assert!(res.cooling_water_cum_pct <= res.exhaust_cum_pct);
}

#[test]
fn calculation_is_deterministic() {
    let c = EngineConstants::default();
    let reading = sample_reading(1, &c);
    assert_eq!(calculate(&reading, &c), calculate(&reading, &c));
}

#[test]
fn negative_rises_are_not_clamped() {
    let c = EngineConstants::default();
    let input = ReadingInput {
        water_inlet_c: 45.0,
        water_outlet_c: 25.0,
        ..sample_input()
    };
    let reading = Reading::capture(1, &input, &c);
    assert_eq!(reading.water_rise_c, -20.0);
    let res = calculate(&reading, &c);
    assert!(res.cooling_water_kj_per_h < 0.0);
    assert!(res.cooling_water_pct < 0.0);
}

#[test]
fn negative_manometer_difference_yields_nan_air_flow() {
    let c = EngineConstants::default();
    let input = ReadingInput {
        manometer_high_cm: 2.0,
        manometer_low_cm: 4.0,
        ..sample_input()
    };
    let res = calculate(&Reading::capture(1, &input, &c), &c);
    assert!(res.exhaust_kj_per_h.is_nan());
    assert!(res.brake_power_kj_per_h.is_finite());
}

#[test]
fn capture_copies_constants_and_numbers_from_one() {
    let c = EngineConstants {
        voltage_v: 230.0,
        ..EngineConstants::default()
    };
    let readings = capture_batch(&[sample_input(), sample_input()], &c);
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].index, 1);
    assert_eq!(readings[1].index, 2);
    assert_eq!(readings[1].voltage_v, 230.0);
    assert_eq!(readings[0].speed_rpm, 1500.0);
    assert_eq!(readings[0].orifice_diameter_m, 0.0254);
    assert_eq!(readings[0].gas_rise_c, 150.0);
    assert_eq!(readings[0].manometer_diff_cm, 6.0);
}

#[test]
fn zero_fuel_time_rejects_whole_batch() {
    let c = EngineConstants::default();
    let bad = ReadingInput {
        fuel_time_s: 0.0,
        ..sample_input()
    };
    let readings = capture_batch(&[sample_input(), bad, sample_input()], &c);
    assert!(!is_valid_batch(&readings));
    assert_eq!(
        calculate_batch(&readings, &c),
        Err(HeatBalanceError::InvalidReading {
            index: 2,
            fuel_time_s: 0.0
        })
    );
}

#[test]
fn negative_or_nan_fuel_time_is_rejected() {
    let c = EngineConstants::default();
    for t in [-1.0, f64::NAN, f64::INFINITY] {
        let input = ReadingInput {
            fuel_time_s: t,
            ..sample_input()
        };
        let readings = capture_batch(&[input], &c);
        assert!(validate_batch(&readings).is_err(), "t={t}");
    }
}

#[test]
fn tiny_positive_fuel_time_is_accepted() {
    let c = EngineConstants::default();
    let input = ReadingInput {
        fuel_time_s: 0.0001,
        ..sample_input()
    };
    let readings = capture_batch(&[input], &c);
    assert!(is_valid_batch(&readings));
    let results = calculate_batch(&readings, &c).expect("batch");
    assert!(results[0].heat_input_kj_per_h > 1e8);
}

#[test]
fn batch_keeps_reading_order() {
    let c = EngineConstants::default();
    let inputs: Vec<ReadingInput> = (1..=4)
        .map(|i| ReadingInput {
            load_current_a: i as f64 * 2.0,
            ..sample_input()
        })
        .collect();
    let run = run_batch(&inputs, &c).expect("run");
    assert_eq!(run.readings.len(), 4);
    assert_eq!(run.results.len(), 4);
    for (i, r) in run.results.iter().enumerate() {
        assert_eq!(r.index, i + 1);
        assert_relative_eq!(r.brake_power_kw, round2(220.0 * ((i + 1) as f64 * 2.0) * 1e-3));
    }
    assert!(run.results[0].brake_power_pct < run.results[3].brake_power_pct);
}

#[test]
fn empty_batch_yields_no_rows() {
    let c = EngineConstants::default();
    let run = run_batch(&[], &c).expect("run");
    assert!(run.results.is_empty());
}

#[test]
fn invalid_constants_are_reported_before_calculation() {
    let c = EngineConstants {
        calorific_value_kj_per_kg: 0.0,
        ..EngineConstants::default()
    };
    assert_eq!(
        run_batch(&[sample_input()], &c),
        Err(HeatBalanceError::InvalidConstants("calorific_value_kj_per_kg"))
    );
    let c = EngineConstants {
        voltage_v: f64::NAN,
        ..EngineConstants::default()
    };
    assert_eq!(
        c.validate(),
        Err(HeatBalanceError::InvalidConstants("voltage_v"))
    );
}

#[test]
fn orifice_area_and_sample_volume() {
    let c = EngineConstants::default();
    assert_relative_eq!(c.orifice_area_m2(), 0.000506707, epsilon = 1e-9);
    assert_relative_eq!(c.fuel_sample_volume_cc(), 25.0, epsilon = 1e-9);
}

fn varied_inputs() -> Vec<ReadingInput> {
    [
        (5.0, 30.0, 20.0, 150.0, 6.0),
        (10.0, 25.0, 22.0, 180.0, 7.0),
        (15.0, 20.0, 25.0, 210.0, 8.0),
        (20.0, 15.0, 28.0, 240.0, 9.0),
    ]
    .into_iter()
    .map(|(load, time, water_rise, gas_rise, mano)| ReadingInput {
        load_current_a: load,
        fuel_time_s: time,
        water_inlet_c: 25.0,
        water_outlet_c: 25.0 + water_rise,
        water_mass_kg: 1.0,
        gas_inlet_c: 150.0,
        gas_outlet_c: 150.0 + gas_rise,
        manometer_high_cm: 4.0 + mano,
        manometer_low_cm: 4.0,
    })
    .collect()
}

#[test]
fn cumulative_chain_never_decreases_across_varied_readings() {
    let c = EngineConstants::default();
    let run = run_batch(&varied_inputs(), &c).expect("run");
    assert_eq!(run.results.len(), 4);
    for r in &run.results {
        assert!(r.brake_power_pct >= 0.0 && r.cooling_water_pct >= 0.0);
        assert!(r.exhaust_pct >= 0.0 && r.unaccounted_pct >= 0.0, "row {}", r.index);
        assert!(r.brake_power_cum_pct <= r.cooling_water_cum_pct);
        assert!(r.cooling_water_cum_pct <= r.exhaust_cum_pct);
        assert!(r.exhaust_cum_pct <= r.unaccounted_cum_pct);
        assert!((r.unaccounted_cum_pct - 100.0).abs() <= 0.05, "row {}", r.index);
        assert_relative_eq!(
            r.cooling_water_cum_pct,
            round2(r.brake_power_pct + r.cooling_water_pct)
        );
    }
}

#[test]
fn varied_batch_is_deterministic() {
    let c = EngineConstants::default();
    let inputs = varied_inputs();
    assert_eq!(run_batch(&inputs, &c), run_batch(&inputs, &c));
}

#[test]
fn negative_gas_rise_gives_negative_exhaust_loss() {
    let c = EngineConstants::default();
    let input = ReadingInput {
        gas_inlet_c: 300.0,
        gas_outlet_c: 150.0,
        ..sample_input()
    };
    let run = run_batch(&[input], &c).expect("run");
    let r = &run.results[0];
    assert!(r.exhaust_kj_per_h < 0.0);
    assert!(r.exhaust_pct < 0.0);
}

#[test]
fn exact_halves_round_to_even() {
    assert_eq!(round2(0.125), 0.12);
    assert_eq!(round2(0.375), 0.38);
    assert_eq!(round2(-0.125), -0.12);
    assert_eq!(round2(2.5), 2.5);
}
