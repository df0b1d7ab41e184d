//! Image Classify Common Library
//!
//! CLIとWeb(WASM)で共有される型・状態遷移・ユーティリティ

pub mod types;
pub mod error;
pub mod preview;
pub mod api;
pub mod controller;
pub mod view;

pub use types::{ModelChoice, PredictionItem, PredictionResult};
pub use error::{Error, RequestFailure, Result, NO_FILE_SELECTED, PREDICTION_FAILED};
pub use preview::{mime_type_for, to_data_url, ReadGeneration, SelectedImage};
pub use api::{HealthStatus, ServiceInfo, DEFAULT_API_URL, FILE_FIELD};
pub use controller::{
    transition, Controller, Effect, Event, RequestId, Selection, SelectionId, StateKind, ViewState,
};
pub use view::{prediction_rows, PredictionRow};
