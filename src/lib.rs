//! 핵심 계산 로직을 라이브러리로 분리하여 CLI 뿐 아니라 GUI에서도 같은 계산을 쓴다.

pub mod app;
pub mod chart;
pub mod config;
pub mod engine;
pub mod export;
pub mod i18n;
pub mod logging;
pub mod report;
pub mod sheet;
pub mod ui_cli;
