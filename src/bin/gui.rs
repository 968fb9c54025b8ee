#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use diesel_heat_balance::{
    chart::{self, HeatBalanceChart, Marker},
    config,
    engine::{self, BalanceRun, HeatBalanceError, ReadingInput},
    export,
    i18n::{self, keys},
    logging, report,
    sheet::MAX_READINGS,
    ui_cli,
};
use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path};
use tracing::{info, warn};

fn main() -> Result<(), eframe::Error> {
    logging::init();

    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en-us/ko)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_else(|e| {
        warn!("config load failed, using defaults: {e}");
        config::Config::default()
    });
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Diesel Engine Heat Balance",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                warn!("font setup: {e}");
            }
            Box::new(GuiApp::new(app_cfg))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .push(font_name);
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾아 적용한다.
/// 1) assets/fonts/ 2) Windows 시스템 폰트 3) 리눅스 CJK 폰트 순이며 모두 없으면 Err.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<std::path::PathBuf> = vec![
        "assets/fonts/malgun.ttf".into(),
        "assets/fonts/NanumGothic.ttf".into(),
    ];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.extend(["malgun.ttf", "gulim.ttc"].iter().map(|f| fonts.join(f)));
    }
    candidates.extend(
        [
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/System/Library/Fonts/AppleSDGothicNeo.ttc",
        ]
        .iter()
        .map(Into::into),
    );

    let path = candidates
        .iter()
        .find(|p| p.exists())
        .ok_or_else(|| "Korean font not found; Hangul labels may not render.".to_string())?;
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read font ({}): {e}", path.display()))?;
    apply_font_bytes(ctx, bytes, "korean_font");
    Ok(())
}

fn color32(c: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(c[0], c[1], c[2])
}

fn paint_marker(painter: &egui::Painter, center: egui::Pos2, r: f32, marker: Marker, color: egui::Color32) {
    match marker {
        Marker::Circle => {
            painter.circle_filled(center, r, color);
        }
        Marker::Square => {
            painter.rect_filled(
                egui::Rect::from_center_size(center, egui::vec2(1.7 * r, 1.7 * r)),
                0.0,
                color,
            );
        }
        Marker::Triangle => {
            painter.add(egui::Shape::convex_polygon(
                vec![
                    center + egui::vec2(0.0, -r),
                    center + egui::vec2(r, r),
                    center + egui::vec2(-r, r),
                ],
                color,
                egui::Stroke::NONE,
            ));
        }
        Marker::Diamond => {
            painter.add(egui::Shape::convex_polygon(
                vec![
                    center + egui::vec2(0.0, -r),
                    center + egui::vec2(r, 0.0),
                    center + egui::vec2(0.0, r),
                    center + egui::vec2(-r, 0.0),
                ],
                color,
                egui::Stroke::NONE,
            ));
        }
    }
}

/// 저장 대화상자를 띄워 파일을 기록하고 상태 메시지를 돌려준다. 취소하면 None.
fn export_with_dialog<F>(
    tr: &i18n::Translator,
    out_dir: &str,
    file_name: &str,
    filter: &str,
    ext: &str,
    save: F,
) -> Option<String>
where
    F: FnOnce(&Path) -> Result<(), export::ExportError>,
{
    let path = FileDialog::new()
        .set_directory(out_dir)
        .set_file_name(file_name)
        .add_filter(filter, &[ext])
        .save_file()?;
    Some(export_status(tr, &path, save(&path)))
}

fn export_status(tr: &i18n::Translator, path: &Path, result: Result<(), export::ExportError>) -> String {
    match result {
        Ok(()) => format!("{} {}", tr.t(keys::EXPORT_DONE), path.display()),
        Err(e) => format!("{} {e}", tr.t(keys::EXPORT_FAILED)),
    }
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    reading_count: usize,
    /// 항상 MAX_READINGS개를 유지하고 앞의 reading_count개만 사용한다.
    inputs: Vec<ReadingInput>,
    run: Option<BalanceRun>,
    error: Option<String>,
    status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        info!(lang = %lang_code, "GUI language resolved");
        Self {
            config,
            tr,
            reading_count: 1,
            inputs: vec![ReadingInput::default(); MAX_READINGS],
            run: None,
            error: None,
            status: None,
        }
    }

    fn set_reading_count(&mut self, n: usize) {
        self.reading_count = n.clamp(1, MAX_READINGS);
    }

    fn active_inputs(&self) -> &[ReadingInput] {
        &self.inputs[..self.reading_count]
    }

    /// 현재 입력으로 열정산을 계산한다. 실패하면 이전 결과를 지우고 메시지 하나만 남긴다.
    fn calculate(&mut self) {
        self.status = None;
        match engine::run_batch(self.active_inputs(), &self.config.constants) {
            Ok(run) => {
                self.run = Some(run);
                self.error = None;
            }
            Err(err) => {
                self.run = None;
                self.error = Some(match err {
                    HeatBalanceError::InvalidReading { .. } => self.tr.t(keys::ERROR_FUEL_TIME).to_string(),
                    other => other.to_string(),
                });
            }
        }
    }

    fn ui_constants(&self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new(self.tr.t(keys::CONSTANTS_HEADING))
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new("constants_grid")
                    .num_columns(2)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        for (label, value) in ui_cli::constant_lines(&self.tr, &self.config.constants) {
                            ui.strong(label);
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            });
    }

    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.tr.t(keys::READINGS_HEADING));
        let mut count = self.reading_count;
        ui.add(egui::Slider::new(&mut count, 1..=MAX_READINGS).text(self.tr.t(keys::READING_COUNT)));
        self.set_reading_count(count);
        ui.add_space(6.0);

        let tr = &self.tr;
        let inputs = &mut self.inputs[..self.reading_count];
        let field_keys = [
            keys::FIELD_LOAD,
            keys::FIELD_FUEL_TIME,
            keys::FIELD_WATER_IN,
            keys::FIELD_WATER_OUT,
            keys::FIELD_WATER_MASS,
            keys::FIELD_GAS_IN,
            keys::FIELD_GAS_OUT,
            keys::FIELD_MANO_HIGH,
            keys::FIELD_MANO_LOW,
        ];
        egui::ScrollArea::horizontal()
            .id_source("readings_scroll")
            .show(ui, |ui| {
                egui::Grid::new("readings_grid")
                    .striped(true)
                    .num_columns(field_keys.len() + 1)
                    .spacing([10.0, 6.0])
                    .show(ui, |ui| {
                        ui.strong("S.No");
                        for key in field_keys {
                            ui.strong(tr.t(key));
                        }
                        ui.end_row();
                        for (i, input) in inputs.iter_mut().enumerate() {
                            ui.label(format!("{} {}", tr.t(keys::READING_LABEL), i + 1));
                            ui.add(egui::DragValue::new(&mut input.load_current_a).speed(0.1));
                            ui.add(egui::DragValue::new(&mut input.fuel_time_s).speed(0.1));
                            ui.add(egui::DragValue::new(&mut input.water_inlet_c).speed(0.5));
                            ui.add(egui::DragValue::new(&mut input.water_outlet_c).speed(0.5));
                            ui.add(egui::DragValue::new(&mut input.water_mass_kg).speed(0.01));
                            ui.add(egui::DragValue::new(&mut input.gas_inlet_c).speed(1.0));
                            ui.add(egui::DragValue::new(&mut input.gas_outlet_c).speed(1.0));
                            ui.add(egui::DragValue::new(&mut input.manometer_high_cm).speed(0.1));
                            ui.add(egui::DragValue::new(&mut input.manometer_low_cm).speed(0.1));
                            ui.end_row();
                        }
                    });
            });
    }

    fn ui_table(ui: &mut egui::Ui, id: &str, headers: &[&str], rows: &[Vec<String>]) {
        egui::ScrollArea::horizontal().id_source(id).show(ui, |ui| {
            egui::Grid::new(id)
                .striped(true)
                .num_columns(headers.len())
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for h in headers {
                        ui.strong(*h);
                    }
                    ui.end_row();
                    for row in rows {
                        for cell in row {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn ui_results(&mut self, ui: &mut egui::Ui) {
        let Some(run) = self.run.as_ref() else {
            return;
        };
        let tr = &self.tr;
        let out_dir = self.config.output_dir.as_str();
        let mut status = None;

        ui.separator();
        ui.heading(tr.t(keys::INPUT_SUMMARY_HEADING));
        Self::ui_table(ui, "input_table", &report::INPUT_COLUMNS, &report::input_rows(&run.readings));
        ui.add_space(8.0);
        ui.heading(tr.t(keys::RESULTS_HEADING));
        Self::ui_table(ui, "result_table", &report::RESULT_COLUMNS, &report::result_rows(&run.results));
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button(tr.t(keys::GUI_EXPORT_INPUT_CSV)).clicked() {
                status = export_with_dialog(tr, out_dir, export::INPUT_CSV_FILE, "CSV", "csv", |path| {
                    export::save_inputs_csv(path, &run.readings)
                });
            }
            if ui.button(tr.t(keys::GUI_EXPORT_RESULTS_CSV)).clicked() {
                status = export_with_dialog(tr, out_dir, export::RESULTS_CSV_FILE, "CSV", "csv", |path| {
                    export::save_results_csv(path, &run.results)
                });
            }
        });

        ui.separator();
        ui.heading(tr.t(keys::CHART_HEADING));
        let graph = HeatBalanceChart::from_results(&run.results);
        self.ui_chart(ui, &graph);
        let (w, h) = self.config.chart_size();
        if ui.button(tr.t(keys::GUI_EXPORT_PNG)).clicked() {
            status = export_with_dialog(tr, out_dir, export::CHART_PNG_FILE, "PNG", "png", |path| {
                chart::save_png(&graph, path, w, h).map_err(export::ExportError::from)
            });
        }

        if status.is_some() {
            self.status = status;
        }
    }

    fn ui_chart(&self, ui: &mut egui::Ui, graph: &HeatBalanceChart) {
        let Some(bounds) = graph.bounds() else {
            return;
        };
        let size = egui::vec2(ui.available_width().clamp(400.0, 1000.0), 440.0);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let outer = response.rect;
        let text_color = ui.visuals().text_color();
        let grid_color = ui.visuals().weak_text_color().linear_multiply(0.3);
        let plot = egui::Rect::from_min_max(
            outer.min + egui::vec2(60.0, 30.0),
            outer.max - egui::vec2(20.0, 40.0),
        );
        let to_screen = |x: f64, y: f64| {
            let (nx, ny) = bounds.normalize(x, y);
            egui::pos2(
                plot.left() + nx as f32 * plot.width(),
                plot.bottom() - ny as f32 * plot.height(),
            )
        };
        let small = egui::FontId::proportional(11.0);

        painter.text(
            egui::pos2(outer.center().x, outer.top()),
            egui::Align2::CENTER_TOP,
            chart::CHART_TITLE,
            egui::FontId::proportional(15.0),
            text_color,
        );
        for tx in chart::nice_ticks(bounds.x_min, bounds.x_max, 8) {
            let p = to_screen(tx, bounds.y_min);
            painter.line_segment([egui::pos2(p.x, plot.top()), p], egui::Stroke::new(1.0, grid_color));
            painter.text(p + egui::vec2(0.0, 4.0), egui::Align2::CENTER_TOP, format!("{tx:.2}"), small.clone(), text_color);
        }
        for ty in chart::nice_ticks(bounds.y_min, bounds.y_max, 8) {
            let p = to_screen(bounds.x_min, ty);
            painter.line_segment([p, egui::pos2(plot.right(), p.y)], egui::Stroke::new(1.0, grid_color));
            painter.text(p - egui::vec2(4.0, 0.0), egui::Align2::RIGHT_CENTER, format!("{ty:.0}"), small.clone(), text_color);
        }
        painter.rect_stroke(plot, 0.0, egui::Stroke::new(1.0, text_color));
        painter.text(
            egui::pos2(plot.center().x, outer.bottom()),
            egui::Align2::CENTER_BOTTOM,
            chart::X_AXIS_LABEL,
            small.clone(),
            text_color,
        );
        painter.text(
            egui::pos2(outer.left(), plot.top() - 4.0),
            egui::Align2::LEFT_BOTTOM,
            chart::Y_AXIS_LABEL,
            small.clone(),
            text_color,
        );

        for (n, series) in graph.series.iter().enumerate() {
            let color = color32(series.color);
            let pts: Vec<Option<egui::Pos2>> = graph
                .points(series)
                .map(|p| p.map(|(x, y)| to_screen(x, y)))
                .collect();
            for pair in pts.windows(2) {
                if let [Some(a), Some(b)] = pair {
                    painter.line_segment([*a, *b], egui::Stroke::new(2.0, color));
                }
            }
            for p in pts.iter().flatten() {
                paint_marker(&painter, *p, 4.5, series.marker, color);
            }

            // 범례 (좌측 상단)
            let row = plot.left_top() + egui::vec2(12.0, 12.0 + n as f32 * 16.0);
            paint_marker(&painter, row, 4.5, series.marker, color);
            painter.text(row + egui::vec2(10.0, 0.0), egui::Align2::LEFT_CENTER, series.label, small.clone(), text_color);
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.tr.t(keys::APP_TITLE));
                ui.separator();
                ui.label(self.tr.t(keys::APP_SUBTITLE));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.label(self.tr.t(keys::APP_INTRO));
                    ui.add_space(6.0);
                    self.ui_constants(ui);
                    ui.add_space(6.0);
                    self.ui_inputs(ui);
                    ui.add_space(8.0);
                    if ui.button(self.tr.t(keys::GUI_CALCULATE)).clicked() {
                        self.calculate();
                    }
                    if let Some(err) = &self.error {
                        ui.colored_label(egui::Color32::from_rgb(200, 40, 40), err);
                    }
                    self.ui_results(ui);
                    if let Some(status) = &self.status {
                        ui.label(status);
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ReadingInput {
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

    #[test]
    fn reading_count_is_clamped() {
        let mut app = GuiApp::new(config::Config::default());
        app.set_reading_count(0);
        assert_eq!(app.reading_count, 1);
        app.set_reading_count(42);
        assert_eq!(app.reading_count, MAX_READINGS);
        assert_eq!(app.active_inputs().len(), MAX_READINGS);
    }

    #[test]
    fn default_inputs_are_rejected_with_single_message() {
        let mut app = GuiApp::new(config::Config::default());
        app.calculate();
        assert!(app.run.is_none());
        assert_eq!(app.error.as_deref(), Some(app.tr.t(keys::ERROR_FUEL_TIME)));
    }

    #[test]
    fn valid_inputs_produce_one_row_per_reading() {
        let mut app = GuiApp::new(config::Config::default());
        app.set_reading_count(3);
        for input in app.inputs.iter_mut().take(3) {
            *input = valid_input();
        }
        app.calculate();
        assert!(app.error.is_none());
        let run = app.run.as_ref().expect("run");
        assert_eq!(run.results.len(), 3);
        assert_eq!(run.results[2].index, 3);
    }

    #[test]
    fn failed_calculation_clears_previous_results() {
        let mut app = GuiApp::new(config::Config::default());
        app.inputs[0] = valid_input();
        app.calculate();
        assert!(app.run.is_some());
        app.inputs[0].fuel_time_s = 0.0;
        app.calculate();
        assert!(app.run.is_none());
        assert!(app.error.is_some());
    }

    #[test]
    fn export_status_names_the_saved_file() {
        let app = GuiApp::new(config::Config::default());
        let path = Path::new("out/heat_balance_graph.png");
        let ok = export_status(&app.tr, path, Ok(()));
        assert!(ok.starts_with(app.tr.t(keys::EXPORT_DONE)));
        assert!(ok.ends_with("heat_balance_graph.png"));

        let err = export::ExportError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        let failed = export_status(&app.tr, path, Err(err));
        assert!(failed.starts_with(app.tr.t(keys::EXPORT_FAILED)));
    }
}
