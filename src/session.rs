//! コントローラの副作用を実行するセッション
//!
//! `Controller` が返した `Effect` を順に実行し、完了を `Event` として戻す。
//! 状態の種類が変わるたびに履歴へ記録する。

use crate::client::Classifier;
use image_classify_common::{
    to_data_url, Controller, Effect, ModelChoice, SelectedImage, StateKind, ViewState,
};
use std::collections::VecDeque;
use tracing::warn;

pub struct Session<C> {
    controller: Controller,
    classifier: C,
    trace: Vec<StateKind>,
}

impl<C: Classifier> Session<C> {
    pub fn new(classifier: C) -> Self {
        let controller = Controller::new();
        let trace = vec![controller.state().kind()];
        Self {
            controller,
            classifier,
            trace,
        }
    }

    pub fn state(&self) -> &ViewState {
        self.controller.state()
    }

    /// これまでに通過した状態の種類
    pub fn trace(&self) -> &[StateKind] {
        &self.trace
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn choose_model(&mut self, model: ModelChoice) {
        let effects = self.controller.choose_model(model);
        self.record();
        debug_assert!(effects.is_empty());
    }

    /// 画像を選択し、プレビュー生成まで待つ
    pub async fn select_file(&mut self, image: SelectedImage) -> &ViewState {
        let effects = self.controller.select_file(image);
        self.record();
        self.run(effects).await;
        self.controller.state()
    }

    /// 予測を実行し、完了（成功・失敗）まで待つ
    pub async fn submit(&mut self) -> &ViewState {
        let effects = self.controller.submit();
        self.record();
        self.run(effects).await;
        self.controller.state()
    }

    async fn run(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            let next = match effect {
                Effect::ReadPreview { selection, image } => {
                    match tokio::task::spawn_blocking(move || to_data_url(&image)).await {
                        Ok(data_url) => self.controller.preview_ready(selection, data_url),
                        Err(e) => {
                            warn!(error = %e, "preview generation failed");
                            Vec::new()
                        }
                    }
                }
                Effect::Classify { request, image, model } => {
                    let outcome = self.classifier.classify(&image, model).await;
                    self.controller.classify_settled(request, outcome)
                }
            };
            self.record();
            queue.extend(next);
        }
    }

    fn record(&mut self) {
        let kind = self.controller.state().kind();
        if self.trace.last() != Some(&kind) {
            self.trace.push(kind);
        }
    }
}
