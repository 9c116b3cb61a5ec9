//! Runs a [`ViewController`] against a live catalog source.

use tracing::warn;

use crate::core::view::{apply_action, ViewAction, ViewCommand, ViewController};
use crate::ui::executors::{spawn_catalog_loader, spawn_detail_loader, ExecutorTasks};

pub struct ViewDriver {
    controller: ViewController,
    tasks: ExecutorTasks,
}

impl ViewDriver {
    pub fn new(controller: ViewController) -> Self {
        Self {
            controller,
            tasks: ExecutorTasks::new(),
        }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    /// Apply an action now and start whatever fetch it asks for.
    pub fn dispatch(&mut self, action: ViewAction) {
        if let Some(command) = apply_action(&mut self.controller, action) {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: ViewCommand) {
        let aggregator = self.controller.aggregator();
        match command {
            ViewCommand::Refresh(request) => {
                spawn_catalog_loader(&mut self.tasks, aggregator.refresh(), request)
            }
            ViewCommand::LoadDetail(request) => {
                let fetch = aggregator.fetch_detail(&request.name);
                spawn_detail_loader(&mut self.tasks, fetch, request)
            }
        }
    }

    pub fn has_pending_work(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Wait for the next background fetch and apply its result. Returns
    /// `false` once nothing is in flight.
    pub async fn step(&mut self) -> bool {
        match self.tasks.join_next().await {
            None => false,
            Some(Ok(Some(action))) => {
                self.dispatch(action);
                true
            }
            Some(Ok(None)) => true,
            Some(Err(err)) => {
                warn!(error = %err, "Catalog task ended abnormally");
                true
            }
        }
    }

    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    pub async fn mount(&mut self) {
        self.dispatch(ViewAction::Mount);
        self.settle().await;
    }

    pub async fn retry(&mut self) {
        self.dispatch(ViewAction::Retry);
        self.settle().await;
    }

    pub async fn select(&mut self, name: impl Into<String>) {
        self.dispatch(ViewAction::Select { name: name.into() });
        self.settle().await;
    }

    pub fn back(&mut self) {
        self.dispatch(ViewAction::Back);
    }
}
