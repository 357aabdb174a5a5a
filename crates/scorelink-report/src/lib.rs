//! scorelink-report — report rendering.
//!
//! Renders a computed score report as a self-contained HTML document; this
//! is the artifact handed to whatever exports or prints it.

pub mod html;

pub use html::{render_html, write_html_report};
