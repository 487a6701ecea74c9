//! # confetti-renderer
//!
//! Tera-based rendering of the hidden `Map.php` accessor class.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use confetti_renderer::{AccessorCtx, MapContext, MapRenderer};
//!
//! fn render() {
//!     if let Ok(renderer) = MapRenderer::new() {
//!         let ctx = MapContext {
//!             accessors: vec![AccessorCtx::new("article", "Article")],
//!         };
//!         if let Ok(php) = renderer.render(&ctx) {
//!             println!("{php}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{AccessorCtx, MapContext};
pub use engine::{MapRenderer, MAP_TEMPLATE, TEMPLATE_OVERRIDE_DIR};
pub use error::RenderError;
