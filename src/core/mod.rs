pub mod etl;
pub mod pipeline;

pub use crate::domain::model::Leaderboard;
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::domain::raw::RawLeaderboard;
pub use crate::utils::error::Result;
