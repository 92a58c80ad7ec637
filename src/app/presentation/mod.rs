//! Renders a scored [`Leaderboard`](crate::domain::model::Leaderboard) into
//! the files of the output bundle.

pub mod charts;
pub mod tables;

pub use charts::{BundleCanvas, ChartCanvas, ChartConfig, ChartKind, ChartSlot};
