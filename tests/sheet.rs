use diesel_heat_balance::engine::EngineConstants;
use diesel_heat_balance::sheet::{parse_sheet, SheetError, MAX_READINGS};

const TWO_READINGS: &str = r#"
[[readings]]
load_current_a = 5.0
fuel_time_s = 25.0
water_inlet_c = 25.0
water_outlet_c = 45.0
water_mass_kg = 1.0
gas_inlet_c = 150.0
gas_outlet_c = 300.0
manometer_high_cm = 10.0
manometer_low_cm = 4.0

[[readings]]
load_current_a = 10.0
fuel_time_s = 20.0
"#;

#[test]
fn readings_parse_in_order_with_missing_fields_zeroed() {
    let sheet = parse_sheet(TWO_READINGS).expect("sheet");
    assert_eq!(sheet.readings.len(), 2);
    assert!(sheet.constants.is_none());
    assert_eq!(sheet.readings[1].load_current_a, 10.0);
    assert_eq!(sheet.readings[1].water_mass_kg, 0.0);

    let fallback = EngineConstants::default();
    let readings = sheet.readings(&sheet.effective_constants(&fallback));
    assert_eq!(readings[0].index, 1);
    assert_eq!(readings[1].index, 2);
    assert_eq!(readings[0].water_rise_c, 20.0);
}

#[test]
fn sheet_constants_override_only_given_fields() {
    let src = format!("[constants]\nvoltage_v = 230.0\n{TWO_READINGS}");
    let sheet = parse_sheet(&src).expect("sheet");
    let c = sheet.effective_constants(&EngineConstants::default());
    assert_eq!(c.voltage_v, 230.0);
    assert_eq!(c.calorific_value_kj_per_kg, 42886.0);
    assert_eq!(sheet.readings(&c)[0].voltage_v, 230.0);
}

#[test]
fn empty_sheet_is_rejected() {
    assert!(matches!(parse_sheet(""), Err(SheetError::Empty)));
}

#[test]
fn too_many_readings_are_rejected() {
    let src = "[[readings]]\nfuel_time_s = 10.0\n".repeat(MAX_READINGS + 1);
    match parse_sheet(&src) {
        Err(SheetError::TooMany { count, max }) => {
            assert_eq!(count, MAX_READINGS + 1);
            assert_eq!(max, MAX_READINGS);
        }
        other => panic!("unexpected: {other:?}"),
    }
    let src = "[[readings]]\nfuel_time_s = 10.0\n".repeat(MAX_READINGS);
    assert!(parse_sheet(&src).is_ok());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        parse_sheet("[[readings]]\nfuel_time_s = \"fast\"\n"),
        Err(SheetError::Parse(_))
    ));
}
