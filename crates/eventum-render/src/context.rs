//! Execution-context bindings for template rendering.
//!
//! Templates do not get direct access to the session's stored state or to the
//! host environment. Instead the engine binds proxy objects into the template
//! context:
//!
//! - [`StateHandle`]: mutable key-value state (`locals` / `shared`), seeded
//!   from a clone of the stored state. Templates read and write through
//!   `get(key[, default])`, `set(key, value)`, `has(key)`, or plain attribute
//!   access. Because the handle works on a clone, a failed render never
//!   commits partial writes.
//! - [`SubprocessBinding`]: the side-effect gateway (`subprocess`). Each
//!   `run(command)` call delegates to the active [`SubprocessManager`] and
//!   stages one command record; the session folds staged records into its
//!   history only after a successful render.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use minijinja::value::{from_args, Enumerator, Object, Value};
use minijinja::{Error, ErrorKind};

use eventum_subprocess::SubprocessManager;

use crate::error::RenderFailure;
use crate::state::VariableState;

/// Mutable variable state exposed to templates.
#[derive(Debug)]
pub struct StateHandle {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl StateHandle {
    /// Creates a handle seeded from a clone of `state` (empty when absent).
    pub fn seeded(state: Option<&VariableState>) -> Arc<Self> {
        let entries = state
            .map(|state| {
                state
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from_serialize(value)))
                    .collect()
            })
            .unwrap_or_default();
        Arc::new(Self {
            entries: Mutex::new(entries),
        })
    }

    /// Captures the handle's current contents as a [`VariableState`].
    ///
    /// Called by the engine only after the template completed successfully.
    pub fn capture(&self) -> Result<VariableState, RenderFailure> {
        let entries = self.locked();
        let mut state = VariableState::new();
        for (key, value) in entries.iter() {
            let json = serde_json::to_value(value).map_err(|e| {
                RenderFailure::Execution(format!(
                    "state variable `{}` is not representable: {}",
                    key, e
                ))
            })?;
            state.set(key.clone(), json);
        }
        Ok(state)
    }

    fn locked(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Object for StateHandle {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        self.locked().get(key.as_str()?).cloned()
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(self.locked().keys().map(Value::from).collect())
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &minijinja::State,
        name: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match name {
            "get" => {
                let (key, default): (&str, Option<Value>) = from_args(args)?;
                let value = self.locked().get(key).cloned();
                Ok(value.or(default).unwrap_or(Value::UNDEFINED))
            }
            "set" => {
                let (key, value): (&str, Value) = from_args(args)?;
                self.locked().insert(key.to_string(), value);
                // Renders as nothing when used in an output expression.
                Ok(Value::from(""))
            }
            "has" => {
                let (key,): (&str,) = from_args(args)?;
                Ok(Value::from(self.locked().contains_key(key)))
            }
            _ => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("variable state has no method named `{}`", name),
            )),
        }
    }
}

/// Side-effect gateway exposed to templates as `subprocess`.
pub struct SubprocessBinding {
    manager: Arc<dyn SubprocessManager>,
    staged: Mutex<Vec<String>>,
}

impl SubprocessBinding {
    pub fn new(manager: Arc<dyn SubprocessManager>) -> Arc<Self> {
        Arc::new(Self {
            manager,
            staged: Mutex::new(Vec::new()),
        })
    }

    /// Commands invoked during this render, in program order.
    pub fn staged_commands(&self) -> Vec<String> {
        self.staged
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl fmt::Debug for SubprocessBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubprocessBinding")
            .field("mock", &self.manager.is_mock())
            .field("staged", &self.staged_commands())
            .finish()
    }
}

impl Object for SubprocessBinding {
    fn call_method(
        self: &Arc<Self>,
        _state: &minijinja::State,
        name: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match name {
            "run" => {
                let (command,): (&str,) = from_args(args)?;
                self.staged
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(command.to_string());
                let output = self.manager.run(command).map_err(|e| {
                    Error::new(
                        ErrorKind::InvalidOperation,
                        format!("subprocess command failed: {}", e),
                    )
                })?;
                Ok(Value::from(output))
            }
            _ => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("subprocess has no method named `{}`", name),
            )),
        }
    }
}
