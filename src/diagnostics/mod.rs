//! Diagnostic subsystem: coded messages, accumulation policy, rendering.
//!
//! Diagnostics never flow through return values. Every stage constructs
//! [`Diagnostic`] values and hands them to the session's
//! [`DiagnosticContext`], which tracks counts per severity and code family
//! and implements the cutoff policy (`max_errors`, fatal short-circuit).

mod codes;
mod context;
mod diagnostic;
mod render;

pub use codes::DiagCode;
pub use context::{DEFAULT_MAX_ERRORS, DiagnosticContext};
pub use diagnostic::{Diagnostic, Fixit, Severity};
pub use render::{ColorMode, RenderOptions};
