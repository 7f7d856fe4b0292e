//! Session façade over the render engine.
//!
//! [`RenderSession`] is the boundary the studio UI talks to: it owns the
//! variable state store, the active subprocess manager, and the command
//! history, and commits updated state only when a render succeeds.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use eventum_subprocess::{
    CommandHistory, ShellSubprocessManager, SubprocessManager, SubprocessManagerMock,
};

use crate::engine::RenderEngine;
use crate::error::RenderFailure;
use crate::state::{VariableState, VariableStateStore};

/// Name the edited template body is registered under for rendering.
pub const EDITED_TEMPLATE_NAME: &str = "template.jinja";

/// One interactive rendering session.
///
/// State continuity: local and shared variables written by a template survive
/// into the next render of the same session. Subprocess invocations go
/// through a mock manager by default; switching to live execution is an
/// explicit, history-resetting step.
///
/// Single-threaded by design: a session is driven by one logical caller at a
/// time, and a render runs to completion before returning.
pub struct RenderSession {
    engine: RenderEngine,
    store: VariableStateStore,
    manager: Arc<dyn SubprocessManager>,
    history: CommandHistory,
}

impl RenderSession {
    /// Creates a session with empty state and mock subprocess interception.
    pub fn new() -> Self {
        Self {
            engine: RenderEngine::new(),
            store: VariableStateStore::new(),
            manager: Arc::new(SubprocessManagerMock),
            history: CommandHistory::new(),
        }
    }

    /// Renders `template_body` against `config_text`, carrying state forward
    /// from previous renders.
    ///
    /// On success the updated local/shared state and the commands invoked
    /// during the render are committed to the session. On failure nothing is
    /// committed: stored state and history remain exactly as they were.
    pub fn render(
        &mut self,
        template_body: &str,
        config_text: &str,
    ) -> Result<String, RenderFailure> {
        debug!("rendering template `{}`", EDITED_TEMPLATE_NAME);
        let outcome = self.engine.render(
            EDITED_TEMPLATE_NAME,
            template_body,
            config_text,
            self.store.get_local(EDITED_TEMPLATE_NAME),
            self.store.get_shared(),
            Arc::clone(&self.manager),
        )?;

        self.store.set_local(EDITED_TEMPLATE_NAME, outcome.local);
        self.store.set_shared(outcome.shared);
        self.history.extend(outcome.commands);
        debug!("render committed ({} bytes)", outcome.output.len());
        Ok(outcome.output)
    }

    /// Resets all variable state and the subprocess history.
    ///
    /// The manager is replaced with a fresh instance of its current variant.
    pub fn clear(&mut self) {
        debug!("clearing session state and subprocess history");
        self.store.clear();
        self.manager = fresh_manager(self.manager.is_mock());
        self.history.clear();
    }

    /// Switches between mock and live subprocess interception.
    ///
    /// The manager instance is replaced and the interception history is
    /// emptied; subsequent sequence numbers restart at 1. Variable state is
    /// not affected.
    pub fn set_interception_mode(&mut self, mock: bool) {
        debug!(
            "switching subprocess interception to {}",
            if mock { "mock" } else { "live" }
        );
        self.manager = fresh_manager(mock);
        self.history.clear();
    }

    /// Whether subprocess invocations are currently mocked.
    pub fn is_mock(&self) -> bool {
        self.manager.is_mock()
    }

    /// Local state of the edited template as a flat mapping (empty if none).
    pub fn local_state(&self) -> BTreeMap<String, serde_json::Value> {
        self.store
            .get_local(EDITED_TEMPLATE_NAME)
            .cloned()
            .map(VariableState::into_map)
            .unwrap_or_default()
    }

    /// Shared state as a flat mapping (empty if none).
    pub fn shared_state(&self) -> BTreeMap<String, serde_json::Value> {
        self.store
            .get_shared()
            .cloned()
            .map(VariableState::into_map)
            .unwrap_or_default()
    }

    /// History of subprocess commands as `(sequence_number, command)` pairs.
    pub fn interception_history(&self) -> Vec<(usize, String)> {
        self.history.entries()
    }
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new()
    }
}

fn fresh_manager(mock: bool) -> Arc<dyn SubprocessManager> {
    if mock {
        Arc::new(SubprocessManagerMock)
    } else {
        Arc::new(ShellSubprocessManager::new())
    }
}
