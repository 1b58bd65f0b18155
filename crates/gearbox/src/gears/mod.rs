//! The overlay's components.
//!
//! Each gear owns bounded storage and submits at most one batch per buffer
//! for the passes it cares about:
//!
//! | gear | passes |
//! |------|--------|
//! | [`LineDrawer`] | `ScreenSpace` or `GameSpace` |
//! | [`Marker`] | `GameSpace`, `Sprite` |
//! | [`Labeler`] | `Sprite` |
//! | [`Alerter`] | `Sprite` |
//! | [`TreeView`] | `UiBox`, `Sprite` |
//! | [`TempBoxDrawer`] | `GameSpace` |
//! | [`Plotter`] | `ScreenSpace`, `UiBox`, `Sprite` |

pub mod alerter;
pub mod labeler;
pub mod line_drawer;
pub mod marker;
pub mod plotter;
pub mod sampler;
pub mod temp_box;
pub mod tree_view;

pub use alerter::Alerter;
pub use labeler::Labeler;
pub use line_drawer::{LineDrawer, LineSpace};
pub use marker::Marker;
pub use plotter::Plotter;
pub use sampler::{DataSampler, DataSamplerManager, SampleSource};
pub use temp_box::TempBoxDrawer;
pub use tree_view::{TreeRow, TreeView};
