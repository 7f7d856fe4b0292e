//! # Eventum Render - Stateful Template Rendering Core
//!
//! `eventum-render` is the rendering core of the eventum studio: it executes
//! an event-generation template against a YAML rendering configuration while
//! carrying mutable variable state across renders, simulating how a
//! production event pipeline would execute the same template repeatedly.
//!
//! ## Core Concepts
//!
//! - [`RenderSession`]: the façade a caller drives; owns state and the
//!   subprocess gateway, commits state only on successful renders
//! - [`RenderEngine`]: one render cycle as a pure transform
//! - [`RenderingConfig`] / [`parse_config`]: validated YAML configuration
//!   with a default-merged `templates` entry for the template under edit
//! - [`VariableState`] / [`VariableStateStore`]: local (per template
//!   identity) and shared (cross-template) state continuity
//! - [`RenderFailure`]: closed failure taxonomy (parse / shape /
//!   config-validation / execution)
//!
//! ## Quick Start
//!
//! ```rust
//! use eventum_render::RenderSession;
//!
//! let mut session = RenderSession::new();
//!
//! let template = "\
//! {{ locals.set('counter', locals.get('counter', 0) + 1) }}\
//! count={{ locals.get('counter') }}";
//!
//! let first = session.render(template, "params: {}").unwrap();
//! assert_eq!(first, "count=1");
//!
//! // Local state survives into the next render of the same template.
//! let second = session.render(template, "params: {}").unwrap();
//! assert_eq!(second, "count=2");
//! ```
//!
//! ## Subprocess Interception
//!
//! Templates may invoke external commands through the `subprocess` binding.
//! By default commands are mocked: recorded in order, never executed.
//!
//! ```rust
//! use eventum_render::RenderSession;
//!
//! let mut session = RenderSession::new();
//! session
//!     .render("{{ subprocess.run('date') }}", "{}")
//!     .unwrap();
//! assert_eq!(
//!     session.interception_history(),
//!     vec![(1, "date".to_string())]
//! );
//! ```
//!
//! Switching to live execution (`set_interception_mode(false)`) replaces the
//! gateway and resets the history.

mod config;
mod context;
mod engine;
mod error;
mod session;
mod state;

pub use config::{
    parse_config, RenderingConfig, SampleConfig, SampleKind, TemplateConfig, TemplatePickingMode,
};
pub use engine::{RenderEngine, RenderOutcome};
pub use error::RenderFailure;
pub use session::{RenderSession, EDITED_TEMPLATE_NAME};
pub use state::{VariableState, VariableStateStore};
