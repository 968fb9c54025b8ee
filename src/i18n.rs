use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";
    pub const APP_SUBTITLE: &str = "general.app_subtitle";
    pub const APP_INTRO: &str = "general.app_intro";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_ENTER_READINGS: &str = "main_menu.enter_readings";
    pub const MAIN_MENU_LOAD_SHEET: &str = "main_menu.load_sheet";
    pub const MAIN_MENU_CONSTANTS: &str = "main_menu.constants";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const READINGS_HEADING: &str = "readings.heading";
    pub const READING_COUNT: &str = "readings.count";
    pub const READING_LABEL: &str = "readings.reading";
    pub const ERROR_READING_COUNT: &str = "error.reading_count";
    pub const ERROR_FUEL_TIME: &str = "error.fuel_time";
    pub const PROMPT_SHEET_PATH: &str = "prompt.sheet_path";

    pub const FIELD_LOAD: &str = "field.load";
    pub const FIELD_FUEL_TIME: &str = "field.fuel_time";
    pub const FIELD_WATER_IN: &str = "field.water_in";
    pub const FIELD_WATER_OUT: &str = "field.water_out";
    pub const FIELD_WATER_MASS: &str = "field.water_mass";
    pub const FIELD_GAS_IN: &str = "field.gas_in";
    pub const FIELD_GAS_OUT: &str = "field.gas_out";
    pub const FIELD_MANO_HIGH: &str = "field.mano_high";
    pub const FIELD_MANO_LOW: &str = "field.mano_low";

    pub const CONSTANTS_HEADING: &str = "constants.heading";
    pub const CONST_CV: &str = "constants.cv";
    pub const CONST_FUEL_DENSITY: &str = "constants.fuel_density";
    pub const CONST_WATER_CP: &str = "constants.water_cp";
    pub const CONST_ORIFICE_AREA: &str = "constants.orifice_area";
    pub const CONST_ORIFICE_DIAMETER: &str = "constants.orifice_diameter";
    pub const CONST_WATER_DENSITY: &str = "constants.water_density";
    pub const CONST_VOLTAGE: &str = "constants.voltage";
    pub const CONST_SPEED: &str = "constants.speed";
    pub const CONST_FUEL_VOLUME: &str = "constants.fuel_volume";
    pub const CONST_ATM_PRESSURE: &str = "constants.atm_pressure";
    pub const CONST_GAS_CONSTANT: &str = "constants.gas_constant";
    pub const CONST_GAS_CP: &str = "constants.gas_cp";

    pub const INPUT_SUMMARY_HEADING: &str = "report.input_summary";
    pub const RESULTS_HEADING: &str = "report.results";
    pub const CHART_HEADING: &str = "report.chart";
    pub const CHART_LEGEND: &str = "report.chart_legend";

    pub const PROMPT_EXPORT: &str = "export.prompt";
    pub const EXPORT_DONE: &str = "export.done";
    pub const EXPORT_FAILED: &str = "export.failed";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_CURRENT_OUTPUT_DIR: &str = "settings.current_output_dir";
    pub const SETTINGS_PROMPT_OUTPUT_DIR: &str = "settings.prompt_output_dir";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const GUI_CALCULATE: &str = "gui.calculate";
    pub const GUI_EXPORT_INPUT_CSV: &str = "gui.export_input_csv";
    pub const GUI_EXPORT_RESULTS_CSV: &str = "gui.export_results_csv";
    pub const GUI_EXPORT_PNG: &str = "gui.export_png";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ko
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.overrides
            .as_ref()
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 순이며 영어 번역이 없으면 한국어로 폴백한다.
    pub fn t<'a>(&'a self, key: &str) -> &'a str {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" => Some("ko".into()),
        "ko-kr" => Some("ko-kr".into()),
        "en" => Some("en".into()),
        "en-us" | "en-uk" => Some("en-us".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().and_then(|loc| normalize_locale_string(&loc)) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵 또는 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., en-us)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., en)
    let (base, _) = lang.split_once(['-', '_'])?;
    try_load(base)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        APP_TITLE => "열정산 시험 계산기",
        APP_SUBTITLE => "전기 부하 4행정 디젤 기관",
        APP_INTRO => "시험 측정값을 입력하면 시간당 열정산 데이터 시트와 그래프를 만듭니다.",
        MAIN_MENU_TITLE => "\n=== 디젤 기관 열정산 ===",
        MAIN_MENU_ENTER_READINGS => "1) 측정값 입력",
        MAIN_MENU_LOAD_SHEET => "2) 시험 시트 파일 불러오기",
        MAIN_MENU_CONSTANTS => "3) 기관 상수 보기",
        MAIN_MENU_SETTINGS => "4) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        READINGS_HEADING => "시험 측정값 입력",
        READING_COUNT => "측정 횟수",
        READING_LABEL => "측정",
        ERROR_READING_COUNT => "측정 횟수는 1~10 사이여야 합니다.",
        ERROR_FUEL_TIME => "모든 '25cc 연료 소비 시간' 값이 0보다 큰지 확인하세요.",
        PROMPT_SHEET_PATH => "시험 시트 경로 (.toml): ",
        FIELD_LOAD => "부하 전류 (A)",
        FIELD_FUEL_TIME => "25cc 연료 소비 시간 (s)",
        FIELD_WATER_IN => "냉각수 입구 온도 (°C)",
        FIELD_WATER_OUT => "냉각수 출구 온도 (°C)",
        FIELD_WATER_MASS => "30초간 냉각수 질량 (kg)",
        FIELD_GAS_IN => "배기가스 입구 온도 (°C)",
        FIELD_GAS_OUT => "배기가스 출구 온도 (°C)",
        FIELD_MANO_HIGH => "마노미터 높은 쪽 h1 (cm)",
        FIELD_MANO_LOW => "마노미터 낮은 쪽 h2 (cm)",
        CONSTANTS_HEADING => "기관 상수",
        CONST_CV => "발열량 (Cv)",
        CONST_FUEL_DENSITY => "연료 밀도",
        CONST_WATER_CP => "물 비열",
        CONST_ORIFICE_AREA => "오리피스 면적",
        CONST_ORIFICE_DIAMETER => "오리피스 직경",
        CONST_WATER_DENSITY => "물 밀도",
        CONST_VOLTAGE => "전압",
        CONST_SPEED => "기관 회전수",
        CONST_FUEL_VOLUME => "연료 소비 측정 체적",
        CONST_ATM_PRESSURE => "대기압",
        CONST_GAS_CONSTANT => "기체상수 (R)",
        CONST_GAS_CP => "배기가스 비열",
        INPUT_SUMMARY_HEADING => "입력 데이터 요약",
        RESULTS_HEADING => "열정산 데이터 시트 (시간당 기준)",
        CHART_HEADING => "열정산 그래프",
        CHART_LEGEND => "계열: ● BP 누적 %  ■ Qcw 누적 %  ▲ Qex 누적 %  ◆ 미계측 손실 누적 %",
        PROMPT_EXPORT => "CSV/PNG로 내보낼까요? (y/N): ",
        EXPORT_DONE => "내보내기 완료:",
        EXPORT_FAILED => "내보내기 실패:",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_LANGUAGE => "현재 언어:",
        SETTINGS_PROMPT_LANGUAGE => "언어 (auto/ko/en-us, 유지하려면 엔터): ",
        SETTINGS_CURRENT_OUTPUT_DIR => "현재 출력 폴더:",
        SETTINGS_PROMPT_OUTPUT_DIR => "출력 폴더 (유지하려면 엔터): ",
        SETTINGS_SAVED => "설정이 저장되었습니다.",
        GUI_CALCULATE => "열정산 계산",
        GUI_EXPORT_INPUT_CSV => "입력 데이터 CSV 저장",
        GUI_EXPORT_RESULTS_CSV => "결과 CSV 저장",
        GUI_EXPORT_PNG => "그래프 PNG 저장",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        APP_TITLE => "Heat Balance Test Calculator",
        APP_SUBTITLE => "Four Stroke Diesel Engine with Electrical Loading",
        APP_INTRO => "Enter your test readings to generate the heat balance data sheet and graph.",
        MAIN_MENU_TITLE => "\n=== Diesel Engine Heat Balance ===",
        MAIN_MENU_ENTER_READINGS => "1) Enter test readings",
        MAIN_MENU_LOAD_SHEET => "2) Load test sheet file",
        MAIN_MENU_CONSTANTS => "3) View engine constants",
        MAIN_MENU_SETTINGS => "4) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please choose again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        READINGS_HEADING => "Test Readings Input",
        READING_COUNT => "Number of Readings",
        READING_LABEL => "Reading",
        ERROR_READING_COUNT => "Number of readings must be between 1 and 10.",
        ERROR_FUEL_TIME => {
            "Please ensure all 'Time for 25cc fuel consumption' values are greater than 0."
        }
        PROMPT_SHEET_PATH => "Test sheet path (.toml): ",
        FIELD_LOAD => "Load (Amp)",
        FIELD_FUEL_TIME => "Time for 25cc fuel consumption (s)",
        FIELD_WATER_IN => "Input Water Temperature (°C)",
        FIELD_WATER_OUT => "Output Water Temperature (°C)",
        FIELD_WATER_MASS => "Water collection in 30s (kg)",
        FIELD_GAS_IN => "Input Gas Temperature (°C)",
        FIELD_GAS_OUT => "Output Gas Temperature (°C)",
        FIELD_MANO_HIGH => "Manometer Reading High (cm)",
        FIELD_MANO_LOW => "Manometer Reading Low (cm)",
        CONSTANTS_HEADING => "Engine Constants",
        CONST_CV => "Calorific Value (Cv)",
        CONST_FUEL_DENSITY => "Fuel Density",
        CONST_WATER_CP => "Water Specific Heat",
        CONST_ORIFICE_AREA => "Orifice Area",
        CONST_ORIFICE_DIAMETER => "Orifice Diameter",
        CONST_WATER_DENSITY => "Water Density",
        CONST_VOLTAGE => "Voltage",
        CONST_SPEED => "Engine Speed",
        CONST_FUEL_VOLUME => "Fuel Consumption Volume",
        CONST_ATM_PRESSURE => "Atmospheric Pressure",
        CONST_GAS_CONSTANT => "Gas Constant (R)",
        CONST_GAS_CP => "Exhaust Gas Specific Heat",
        INPUT_SUMMARY_HEADING => "Input Data Summary",
        RESULTS_HEADING => "Heat Balance Data Sheet (Hourly Basis)",
        CHART_HEADING => "Heat Balance Graph",
        CHART_LEGEND => "Series: ● BP cum. %  ■ Qcw cum. %  ▲ Qex cum. %  ◆ Unacc. loss cum. %",
        PROMPT_EXPORT => "Export CSV/PNG? (y/N): ",
        EXPORT_DONE => "Exported:",
        EXPORT_FAILED => "Export failed:",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language:",
        SETTINGS_PROMPT_LANGUAGE => "Language (auto/ko/en-us, Enter to keep): ",
        SETTINGS_CURRENT_OUTPUT_DIR => "Current output folder:",
        SETTINGS_PROMPT_OUTPUT_DIR => "Output folder (Enter to keep): ",
        SETTINGS_SAVED => "Settings saved.",
        GUI_CALCULATE => "Calculate Heat Balance",
        GUI_EXPORT_INPUT_CSV => "Download Input Data CSV",
        GUI_EXPORT_RESULTS_CSV => "Download Results CSV",
        GUI_EXPORT_PNG => "Download Graph (PNG)",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_lookup_and_korean_fallback() {
        let en = Translator::new("en-us");
        assert_eq!(en.language(), Language::En);
        assert_eq!(en.t(keys::GUI_CALCULATE), "Calculate Heat Balance");

        let ko = Translator::new("fr");
        assert_eq!(ko.language(), Language::Ko);
        assert_eq!(ko.t(keys::GUI_CALCULATE), "열정산 계산");
        assert_eq!(ko.t("no.such.key"), "[missing translation]");
    }

    #[test]
    fn explicit_language_wins_over_config() {
        assert_eq!(resolve_language("ko-KR", Some("en-us")), "ko-kr");
        assert_eq!(resolve_language("auto", Some("en")), "en");
    }

    #[test]
    fn nested_pack_tables_flatten_to_dotted_keys() {
        let map = parse_toml_to_map(
            r#"
            [gui]
            calculate = "Run"
            "#,
        )
        .unwrap();
        assert_eq!(map.get(keys::GUI_CALCULATE).map(String::as_str), Some("Run"));
    }
}
