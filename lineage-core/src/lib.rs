//! Genealogy tree model, branch filter, node rendering, layout and view
//! fitting. Everything here is pure; the browser shell and the exporters
//! drive it.

pub mod constants;
pub mod filter;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod node;
pub mod palette;
pub mod readiness;
pub mod scene;
pub mod svg;
pub mod viewport;

pub use filter::{Query, filter_tree, filtered_view};
pub use geometry::{Bounds, GeometryProvider};
pub use layout::{LayoutConfig, TreeLayout, layout};
pub use model::{Entity, LoadError, NOT_FOUND_LABEL};
pub use node::{NodeBlock, render_node};
pub use readiness::{Readiness, ReadinessPolicy, wait_until_ready};
pub use scene::Scene;
pub use viewport::{ViewState, fit_view};
