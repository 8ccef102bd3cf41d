use std::time::{Duration, Instant};

use su_api::Session;
use su_core::SchemaUiError;
use su_runtime::Primitive;

/// How long the prompt button shows "Creating..." before the app appears.
pub(crate) const CREATE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingPrompt {
    pub(crate) prompt: String,
    pub(crate) ready_at: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct TuiUiState {
    pub(crate) prompt_buffer: String,
    pub(crate) editing_prompt: bool,
    /// Index into the session's interactive nodes.
    pub(crate) focus: usize,
    pub(crate) status: String,
    pub(crate) help_visible: bool,
    pub(crate) pending: Option<PendingPrompt>,
}

impl TuiUiState {
    pub(crate) fn new() -> Self {
        Self {
            editing_prompt: true,
            status: "ready".to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn is_creating(&self) -> bool {
        self.pending.is_some()
    }

    /// Queues the prompt buffer. Blank prompts and a prompt already in
    /// flight are ignored.
    pub(crate) fn queue_prompt(&mut self, now: Instant) -> bool {
        if self.pending.is_some() || self.prompt_buffer.trim().is_empty() {
            return false;
        }
        self.pending = Some(PendingPrompt {
            prompt: self.prompt_buffer.trim().to_string(),
            ready_at: now + CREATE_DELAY,
        });
        self.status = "creating...".to_string();
        true
    }

    /// Submits a queued prompt once its delay has elapsed. Returns whether
    /// the session changed.
    pub(crate) fn tick(&mut self, now: Instant, session: &mut Session) -> Result<bool, SchemaUiError> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.ready_at);
        if !due {
            return Ok(false);
        }
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };
        match session.submit_prompt(&pending.prompt)? {
            Some(app) => {
                self.status = format!("opened {}", app);
                self.editing_prompt = false;
            }
            None => self.status = "no app matches that prompt".to_string(),
        }
        self.focus = 0;
        Ok(true)
    }

    pub(crate) fn focus_next(&mut self, count: usize) {
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub(crate) fn focus_prev(&mut self, count: usize) {
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    /// Keeps focus in range after a re-render removed controls.
    pub(crate) fn clamp_focus(&mut self, count: usize) {
        if self.focus >= count {
            self.focus = count.saturating_sub(1);
        }
    }

    pub(crate) fn focused_kind(&self, session: &Session) -> Option<Primitive> {
        session
            .interactive()
            .get(self.focus)
            .map(|node| node.primitive)
    }
}
