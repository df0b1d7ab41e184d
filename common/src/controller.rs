//! 画面状態の状態遷移
//!
//! 画面状態は5つの状態のいずれか1つだけを取る:
//! Idle / FileSelected / Loading / ResultReady / Errored
//!
//! `transition` は副作用を実行せず、実行すべき `Effect` を返す。
//! プレビュー生成と推論リクエストの完了は `Event` として戻ってくる。

use crate::error::{RequestFailure, NO_FILE_SELECTED};
use crate::preview::SelectedImage;
use crate::types::{ModelChoice, PredictionResult};
use tracing::debug;

/// ファイル選択ごとに振られる識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionId(pub u64);

/// 予測リクエストごとに振られる識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// 選択中の画像とそのプレビュー
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub id: SelectionId,
    pub image: SelectedImage,
    /// 非同期生成が完了するまでNone
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle {
        model: ModelChoice,
    },
    FileSelected {
        model: ModelChoice,
        selection: Selection,
    },
    /// 完了まで抜けない。`submitted` は送信した画像の選択ID
    Loading {
        model: ModelChoice,
        selection: Selection,
        request: RequestId,
        submitted: SelectionId,
    },
    ResultReady {
        model: ModelChoice,
        selection: Selection,
        result: PredictionResult,
    },
    Errored {
        model: ModelChoice,
        selection: Option<Selection>,
        message: String,
    },
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Idle { model: ModelChoice::default() }
    }
}

/// 状態の種類（ログ・テスト用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Idle,
    FileSelected,
    Loading,
    ResultReady,
    Errored,
}

impl ViewState {
    pub fn kind(&self) -> StateKind {
        match self {
            ViewState::Idle { .. } => StateKind::Idle,
            ViewState::FileSelected { .. } => StateKind::FileSelected,
            ViewState::Loading { .. } => StateKind::Loading,
            ViewState::ResultReady { .. } => StateKind::ResultReady,
            ViewState::Errored { .. } => StateKind::Errored,
        }
    }

    pub fn model(&self) -> ModelChoice {
        match self {
            ViewState::Idle { model }
            | ViewState::FileSelected { model, .. }
            | ViewState::Loading { model, .. }
            | ViewState::ResultReady { model, .. }
            | ViewState::Errored { model, .. } => *model,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            ViewState::Idle { .. } => None,
            ViewState::FileSelected { selection, .. }
            | ViewState::Loading { selection, .. }
            | ViewState::ResultReady { selection, .. } => Some(selection),
            ViewState::Errored { selection, .. } => selection.as_ref(),
        }
    }

    pub fn preview(&self) -> Option<&str> {
        self.selection().and_then(|s| s.preview.as_deref())
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            ViewState::ResultReady { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Errored { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    fn selection_mut(&mut self) -> Option<&mut Selection> {
        match self {
            ViewState::Idle { .. } => None,
            ViewState::FileSelected { selection, .. }
            | ViewState::Loading { selection, .. }
            | ViewState::ResultReady { selection, .. } => Some(selection),
            ViewState::Errored { selection, .. } => selection.as_mut(),
        }
    }

    fn with_model(mut self, new_model: ModelChoice) -> Self {
        match &mut self {
            ViewState::Idle { model }
            | ViewState::FileSelected { model, .. }
            | ViewState::Loading { model, .. }
            | ViewState::ResultReady { model, .. }
            | ViewState::Errored { model, .. } => *model = new_model,
        }
        self
    }

    fn with_preview(mut self, id: SelectionId, data_url: String) -> Self {
        match self.selection_mut() {
            Some(selection) if selection.id == id => selection.preview = Some(data_url),
            _ => debug!(selection = id.0, "stale preview discarded"),
        }
        self
    }

    fn into_parts(self) -> (ModelChoice, Option<Selection>) {
        match self {
            ViewState::Idle { model } => (model, None),
            ViewState::FileSelected { model, selection }
            | ViewState::Loading { model, selection, .. }
            | ViewState::ResultReady { model, selection, .. } => (model, Some(selection)),
            ViewState::Errored { model, selection, .. } => (model, selection),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectFile {
        id: SelectionId,
        image: SelectedImage,
    },
    PreviewReady {
        id: SelectionId,
        data_url: String,
    },
    ChooseModel(ModelChoice),
    Submit {
        request: RequestId,
    },
    ClassifySettled {
        request: RequestId,
        outcome: Result<PredictionResult, RequestFailure>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SelectFile { .. } => "select_file",
            Event::PreviewReady { .. } => "preview_ready",
            Event::ChooseModel(_) => "choose_model",
            Event::Submit { .. } => "submit",
            Event::ClassifySettled { .. } => "classify_settled",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// 画像からData URLプレビューを生成し `Event::PreviewReady` を返す
    ReadPreview {
        selection: SelectionId,
        image: SelectedImage,
    },
    /// 推論サービスへ送信し `Event::ClassifySettled` を返す
    Classify {
        request: RequestId,
        image: SelectedImage,
        model: ModelChoice,
    },
}

pub fn transition(state: ViewState, event: Event) -> (ViewState, Vec<Effect>) {
    match (state, event) {
        // 実行中は完了までLoadingのまま、選択だけ差し替える
        (
            ViewState::Loading { model, request, submitted, .. },
            Event::SelectFile { id, image },
        ) => {
            let effect = Effect::ReadPreview { selection: id, image: image.clone() };
            let selection = Selection { id, image, preview: None };
            (
                ViewState::Loading { model, selection, request, submitted },
                vec![effect],
            )
        }

        // 新しい選択は結果・エラーを置き換える
        (state, Event::SelectFile { id, image }) => {
            let effect = Effect::ReadPreview { selection: id, image: image.clone() };
            let selection = Selection { id, image, preview: None };
            (
                ViewState::FileSelected { model: state.model(), selection },
                vec![effect],
            )
        }

        (state, Event::PreviewReady { id, data_url }) => (state.with_preview(id, data_url), vec![]),

        (state, Event::ChooseModel(model)) => (state.with_model(model), vec![]),

        // 実行中の再送信は無視
        (state @ ViewState::Loading { .. }, Event::Submit { .. }) => (state, vec![]),

        (state, Event::Submit { request }) => match state.into_parts() {
            (model, None) => (
                ViewState::Errored {
                    model,
                    selection: None,
                    message: NO_FILE_SELECTED.to_string(),
                },
                vec![],
            ),
            (model, Some(selection)) => {
                let effect = Effect::Classify {
                    request,
                    image: selection.image.clone(),
                    model,
                };
                let submitted = selection.id;
                (
                    ViewState::Loading { model, selection, request, submitted },
                    vec![effect],
                )
            }
        },

        // 送信後に選び直された画像には古い結果を付けない
        (
            ViewState::Loading { model, selection, request: current, submitted },
            Event::ClassifySettled { request, .. },
        ) if current == request && selection.id != submitted => {
            debug!(request = request.0, "prediction for replaced selection discarded");
            (ViewState::FileSelected { model, selection }, vec![])
        }

        (
            ViewState::Loading { model, selection, request: current, .. },
            Event::ClassifySettled { request, outcome },
        ) if current == request => match outcome {
            Ok(result) => (ViewState::ResultReady { model, selection, result }, vec![]),
            Err(failure) => (
                ViewState::Errored {
                    model,
                    selection: Some(selection),
                    message: failure.display_message().to_string(),
                },
                vec![],
            ),
        },

        (state, Event::ClassifySettled { request, .. }) => {
            debug!(request = request.0, "stale prediction discarded");
            (state, vec![])
        }
    }
}

/// 画面状態と識別子の採番を持つコントローラ
#[derive(Debug, Clone, Default)]
pub struct Controller {
    state: ViewState,
    next_selection: u64,
    next_request: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        let from = self.state.kind();
        let name = event.name();
        let (state, effects) = transition(std::mem::take(&mut self.state), event);
        self.state = state;
        debug!(
            event = name,
            from = ?from,
            to = ?self.state.kind(),
            effects = effects.len(),
            "state transition"
        );
        effects
    }

    pub fn select_file(&mut self, image: SelectedImage) -> Vec<Effect> {
        self.next_selection += 1;
        let id = SelectionId(self.next_selection);
        self.apply(Event::SelectFile { id, image })
    }

    pub fn preview_ready(&mut self, id: SelectionId, data_url: String) -> Vec<Effect> {
        self.apply(Event::PreviewReady { id, data_url })
    }

    pub fn choose_model(&mut self, model: ModelChoice) -> Vec<Effect> {
        self.apply(Event::ChooseModel(model))
    }

    pub fn submit(&mut self) -> Vec<Effect> {
        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.apply(Event::Submit { request })
    }

    pub fn classify_settled(
        &mut self,
        request: RequestId,
        outcome: Result<PredictionResult, RequestFailure>,
    ) -> Vec<Effect> {
        self.apply(Event::ClassifySettled { request, outcome })
    }
}
