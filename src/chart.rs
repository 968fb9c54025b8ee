//! 열정산 그래프: 제동 출력(kW)에 대한 누적 백분율 4계열.
//!
//! 같은 모델을 GUI 화면 그리기와 PNG 내보내기에 함께 사용한다. PNG에는
//! 글자를 넣지 않으며 계열은 색과 마커 모양으로 구분한다.

use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;
use thiserror::Error;

use crate::engine::DerivedResult;

pub const CHART_TITLE: &str = "Heat Balance Graph";
pub const X_AXIS_LABEL: &str = "BP (kW)";
pub const Y_AXIS_LABEL: &str = "Percentage";

/// PNG 최소 크기 [px]
const MIN_SIZE_PX: u32 = 200;

/// 그래프 작성 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("그래프에 표시할 유효한 점이 없습니다.")]
    NoData,
    #[error("그래프 크기 {width}x{height}가 너무 작습니다 (최소 200x200px).")]
    InvalidSize { width: u32, height: u32 },
    #[error("PNG 저장 오류: {0}")]
    Image(#[from] image::ImageError),
}

/// 점 마커 모양
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Diamond,
}

/// 한 계열의 y값 목록
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: &'static str,
    pub marker: Marker,
    pub color: [u8; 3],
    pub values: Vec<f64>,
}

/// 축 범위
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartBounds {
    /// 데이터 좌표를 0..1 비율로 바꾼다. y는 위쪽이 1이다.
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.x_min) / (self.x_max - self.x_min),
            (y - self.y_min) / (self.y_max - self.y_min),
        )
    }
}

/// 그래프 데이터. x는 측정값 순서를 그대로 따른다.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatBalanceChart {
    pub x_kw: Vec<f64>,
    pub series: Vec<ChartSeries>,
}

impl HeatBalanceChart {
    /// 결과 행에서 BP/Qcw/Qex/미계측 손실 누적 백분율 계열을 만든다.
    pub fn from_results(results: &[DerivedResult]) -> Self {
        let pick = |f: fn(&DerivedResult) -> f64| results.iter().map(f).collect::<Vec<_>>();
        Self {
            x_kw: pick(|r| r.brake_power_kw),
            series: vec![
                ChartSeries {
                    label: "BP (Cumulative %)",
                    marker: Marker::Circle,
                    color: [31, 119, 180],
                    values: pick(|r| r.brake_power_cum_pct),
                },
                ChartSeries {
                    label: "Qcw (Cumulative %)",
                    marker: Marker::Square,
                    color: [255, 127, 14],
                    values: pick(|r| r.cooling_water_cum_pct),
                },
                ChartSeries {
                    label: "Qex (Cumulative %)",
                    marker: Marker::Triangle,
                    color: [44, 160, 44],
                    values: pick(|r| r.exhaust_cum_pct),
                },
                ChartSeries {
                    label: "Unacc. Loss (Cumulative %)",
                    marker: Marker::Diamond,
                    color: [214, 39, 40],
                    values: pick(|r| r.unaccounted_cum_pct),
                },
            ],
        }
    }

    /// 계열별 (x, y) 점. 유한하지 않은 점은 `None`으로 남겨 선을 끊는다.
    pub fn points<'a>(
        &'a self,
        series: &'a ChartSeries,
    ) -> impl Iterator<Item = Option<(f64, f64)>> + 'a {
        self.x_kw.iter().zip(series.values.iter()).map(|(&x, &y)| {
            if x.is_finite() && y.is_finite() {
                Some((x, y))
            } else {
                None
            }
        })
    }

    /// 모든 유한한 점을 포함하고 5% 여백을 둔 축 범위. 점이 없으면 `None`.
    pub fn bounds(&self) -> Option<ChartBounds> {
        let mut b: Option<ChartBounds> = None;
        for s in &self.series {
            for (x, y) in self.points(s).flatten() {
                b = Some(match b {
                    None => ChartBounds {
                        x_min: x,
                        x_max: x,
                        y_min: y,
                        y_max: y,
                    },
                    Some(c) => ChartBounds {
                        x_min: c.x_min.min(x),
                        x_max: c.x_max.max(x),
                        y_min: c.y_min.min(y),
                        y_max: c.y_max.max(y),
                    },
                });
            }
        }
        b.map(|c| {
            let (x_min, x_max) = pad_range(c.x_min, c.x_max);
            let (y_min, y_max) = pad_range(c.y_min, c.y_max);
            ChartBounds {
                x_min,
                x_max,
                y_min,
                y_max,
            }
        })
    }
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        (min - 1.0, max + 1.0)
    } else {
        (min - span * 0.05, max + span * 0.05)
    }
}

/// 범위 안에 들어가는 보기 좋은(1, 2, 5 × 10ⁿ 간격) 눈금 값.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) || max <= min || target == 0 {
        return Vec::new();
    }
    let raw = (max - min) / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);
    // 간격이 값의 부동소수 해상도보다 작으면 눈금을 만들 수 없다.
    if !step.is_finite() || min + step == min || max + step == max {
        return Vec::new();
    }
    let max_ticks = target * 4 + 2;
    let mut ticks = Vec::with_capacity(target + 2);
    let mut t = (min / step).ceil() * step;
    while t <= max + step * 1e-9 && ticks.len() < max_ticks {
        ticks.push(t);
        t += step;
    }
    ticks
}

struct Canvas {
    img: RgbImage,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Canvas {
    fn to_px(&self, bounds: &ChartBounds, x: f64, y: f64) -> (f64, f64) {
        let (nx, ny) = bounds.normalize(x, y);
        (self.left + nx * self.width, self.top + (1.0 - ny) * self.height)
    }

    fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), thickness: i64, color: [u8; 3]) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0) as i64;
        let half = thickness / 2;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (from.0 + (to.0 - from.0) * t).round() as i64;
            let y = (from.1 + (to.1 - from.1) * t).round() as i64;
            for dy in -half..=half {
                for dx in -half..=half {
                    self.put(x + dx, y + dy, color);
                }
            }
        }
    }

    fn marker(&mut self, center: (f64, f64), radius: i64, marker: Marker, color: [u8; 3]) {
        let (cx, cy) = (center.0.round() as i64, center.1.round() as i64);
        let r = radius as f64;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (fx, fy) = (dx as f64, dy as f64);
                let inside = match marker {
                    Marker::Circle => fx * fx + fy * fy <= r * r,
                    Marker::Square => fx.abs() <= r * 0.85 && fy.abs() <= r * 0.85,
                    Marker::Triangle => fx.abs() <= (fy + r) * 0.6,
                    Marker::Diamond => fx.abs() + fy.abs() <= r,
                };
                if inside {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }
}

const GRID_COLOR: [u8; 3] = [220, 220, 220];
const AXIS_COLOR: [u8; 3] = [0, 0, 0];

/// 그래프를 RGB 이미지로 그린다.
pub fn render_image(chart: &HeatBalanceChart, width: u32, height: u32) -> Result<RgbImage, ChartError> {
    if width < MIN_SIZE_PX || height < MIN_SIZE_PX {
        return Err(ChartError::InvalidSize { width, height });
    }
    let bounds = chart.bounds().ok_or(ChartError::NoData)?;

    let (w, h) = (width as f64, height as f64);
    let mut canvas = Canvas {
        img: RgbImage::from_pixel(width, height, Rgb([255, 255, 255])),
        left: w * 0.08,
        top: h * 0.08,
        width: w * 0.86,
        height: h * 0.82,
    };
    let scale = (width.min(height) / 400).max(1) as i64;

    // 격자
    for tx in nice_ticks(bounds.x_min, bounds.x_max, 8) {
        let top = canvas.to_px(&bounds, tx, bounds.y_max);
        let bottom = canvas.to_px(&bounds, tx, bounds.y_min);
        canvas.line(top, bottom, 1, GRID_COLOR);
    }
    for ty in nice_ticks(bounds.y_min, bounds.y_max, 8) {
        let left = canvas.to_px(&bounds, bounds.x_min, ty);
        let right = canvas.to_px(&bounds, bounds.x_max, ty);
        canvas.line(left, right, 1, GRID_COLOR);
    }

    // 축 테두리
    let corners = [
        canvas.to_px(&bounds, bounds.x_min, bounds.y_max),
        canvas.to_px(&bounds, bounds.x_max, bounds.y_max),
        canvas.to_px(&bounds, bounds.x_max, bounds.y_min),
        canvas.to_px(&bounds, bounds.x_min, bounds.y_min),
    ];
    for i in 0..4 {
        canvas.line(corners[i], corners[(i + 1) % 4], scale, AXIS_COLOR);
    }

    for series in &chart.series {
        let pts: Vec<Option<(f64, f64)>> = chart
            .points(series)
            .map(|p| p.map(|(x, y)| canvas.to_px(&bounds, x, y)))
            .collect();
        for pair in pts.windows(2) {
            if let [Some(a), Some(b)] = pair {
                canvas.line(*a, *b, 2 * scale + 1, series.color);
            }
        }
        for p in pts.into_iter().flatten() {
            canvas.marker(p, 5 * scale, series.marker, series.color);
        }
    }

    Ok(canvas.img)
}

/// 그래프를 PNG 파일로 저장한다.
pub fn save_png(chart: &HeatBalanceChart, path: &Path, width: u32, height: u32) -> Result<(), ChartError> {
    let img = render_image(chart, width, height)?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
