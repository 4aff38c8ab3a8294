//! Page presentation.
//!
//! Builds the dashboard view from a table snapshot and handles the
//! "add record" form. Rendering to text formats lives in `report`.

mod form;
mod view;

pub use form::{render_pass, Notice, RenderPass, Submission};
pub use view::DashboardView;
