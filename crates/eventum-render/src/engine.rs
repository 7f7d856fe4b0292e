//! One render cycle: configuration, execution context, template execution.
//!
//! [`RenderEngine`] is a pure transform of `(inputs, state)` into
//! `(output, new state)`: it never touches the session's store directly, and
//! its only side effects are the ones the bound subprocess manager performs.
//! The caller decides whether to commit the returned state.

use std::sync::Arc;

use chrono::Local;
use minijinja::value::Value;
use minijinja::{context, Environment, UndefinedBehavior};

use eventum_subprocess::SubprocessManager;

use crate::config::parse_config;
use crate::context::{StateHandle, SubprocessBinding};
use crate::error::RenderFailure;
use crate::state::VariableState;

/// Result of a successful render cycle.
///
/// The updated state is captured only after the template completed; a failing
/// render produces no outcome and therefore no state to commit.
#[derive(Debug)]
pub struct RenderOutcome {
    /// Rendered template output.
    pub output: String,
    /// Updated local state for the rendered template's identity.
    pub local: VariableState,
    /// Updated shared state.
    pub shared: VariableState,
    /// Subprocess commands invoked during this render, in program order.
    pub commands: Vec<String>,
}

/// Stateless orchestrator for one render cycle.
#[derive(Debug, Default)]
pub struct RenderEngine;

impl RenderEngine {
    pub fn new() -> Self {
        Self
    }

    /// Renders `template_body` (registered under `template_name`) against
    /// `config_text` and the given state.
    ///
    /// The execution context exposes:
    ///
    /// - `timestamp`: current naive local time, ISO-8601 with microseconds
    /// - `tz`: the UTC offset of that timestamp (`+0200` style)
    /// - `params` / `samples`: from the validated configuration
    /// - `locals` / `shared`: mutable state handles
    /// - `subprocess`: the side-effect gateway
    ///
    /// Undefined references are strict: reading a variable or parameter that
    /// does not exist is an execution failure, not silent empty output.
    pub fn render(
        &self,
        template_name: &str,
        template_body: &str,
        config_text: &str,
        local: Option<&VariableState>,
        shared: Option<&VariableState>,
        manager: Arc<dyn SubprocessManager>,
    ) -> Result<RenderOutcome, RenderFailure> {
        let config = parse_config(config_text, template_name)?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template_owned(template_name.to_string(), template_body.to_string())?;

        let now = Local::now();
        let timestamp = now.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        let tz = now.format("%z").to_string();

        let locals = StateHandle::seeded(local);
        let shared_handle = StateHandle::seeded(shared);
        let subprocess = SubprocessBinding::new(manager);

        let ctx = context! {
            timestamp => timestamp,
            tz => tz,
            params => Value::from_serialize(&config.params),
            samples => Value::from_serialize(&config.samples),
            locals => Value::from_dyn_object(locals.clone()),
            shared => Value::from_dyn_object(shared_handle.clone()),
            subprocess => Value::from_dyn_object(subprocess.clone()),
        };

        let template = env.get_template(template_name)?;
        let output = template.render(ctx)?;

        Ok(RenderOutcome {
            output,
            local: locals.capture()?,
            shared: shared_handle.capture()?,
            commands: subprocess.staged_commands(),
        })
    }
}
