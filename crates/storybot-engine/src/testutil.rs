//! Scripted fake UI for engine tests
//!
//! A [`Render`] maps locators to match counts; a [`FakeUi`] serves one
//! render at a time, records every action, and can swap in the next
//! queued render after an action (the page "reacting" to a click).

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use storybot_core::{Locator, StepUi, UiAction, UiHandle};

/// One observable page state: locator -> number of matching nodes
#[derive(Debug, Clone, Default)]
pub struct Render {
    counts: HashMap<Locator, usize>,
}

impl Render {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: Locator, count: usize) -> Self {
        self.counts.insert(locator, count);
        self
    }

    fn count(&self, locator: &Locator) -> usize {
        self.counts.get(locator).copied().unwrap_or(0)
    }
}

/// Scripted `StepUi` implementation
pub struct FakeUi {
    render: Mutex<Render>,
    queued: Mutex<VecDeque<Render>>,
    actions: Mutex<Vec<(UiHandle, UiAction)>>,
    act_result: bool,
}

impl FakeUi {
    pub fn new(render: Render) -> Self {
        Self {
            render: Mutex::new(render),
            queued: Mutex::new(VecDeque::new()),
            actions: Mutex::new(Vec::new()),
            act_result: true,
        }
    }

    /// Make every action report failure (element never actionable)
    pub fn with_act_result(mut self, act_result: bool) -> Self {
        self.act_result = act_result;
        self
    }

    /// Queue a render to replace the current one after the next action
    pub fn queue_after_act(&self, render: Render) {
        self.queued.lock().unwrap().push_back(render);
    }

    /// All actions performed so far, in order
    pub fn actions(&self) -> Vec<(UiHandle, UiAction)> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl StepUi for FakeUi {
    async fn find_first(&self, locators: &[Locator]) -> Option<UiHandle> {
        let render = self.render.lock().unwrap();
        locators
            .iter()
            .find(|locator| render.count(locator) > 0)
            .map(|locator| UiHandle::new(locator.clone(), 0))
    }

    async fn find_all(&self, locator: &Locator) -> Vec<UiHandle> {
        let count = self.render.lock().unwrap().count(locator);
        (0..count)
            .map(|index| UiHandle::new(locator.clone(), index))
            .collect()
    }

    async fn act(&self, handle: &UiHandle, action: UiAction) -> bool {
        self.actions.lock().unwrap().push((handle.clone(), action));
        if let Some(next) = self.queued.lock().unwrap().pop_front() {
            *self.render.lock().unwrap() = next;
        }
        self.act_result
    }
}
