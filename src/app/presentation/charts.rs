//! Chart documents for the leaderboard page.
//!
//! A page shows one chart at a time. [`ChartSlot`] owns whichever chart is
//! live and disposes it before drawing the next one.

use crate::domain::model::{DaySeries, Leaderboard, ParticipantTrajectory, DAY_COUNT};
use crate::utils::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

pub const PALETTE: [&str; 20] = [
    "#5B91F4", "#3CCECE", "#FFC043", "#E28454", "#174291", "#FF5B8C", "#ABF0FF", "#6C78D3",
    "#6A126A", "#F7DF90", "#F47AFF", "#169E9E", "#FCB09B", "#057C44", "#B0592D", "#A3D1DF",
    "#C1B5E3", "#B8EBCD", "#3AA76D", "#EA6B6B",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Points,
    Rank,
    Difference,
    AveragePoints,
    RollingAverage,
    PointsByDelta,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Points,
        ChartKind::Rank,
        ChartKind::Difference,
        ChartKind::AveragePoints,
        ChartKind::RollingAverage,
        ChartKind::PointsByDelta,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::Points => "points",
            ChartKind::Rank => "rank",
            ChartKind::Difference => "difference",
            ChartKind::AveragePoints => "average_points",
            ChartKind::RollingAverage => "rolling_average",
            ChartKind::PointsByDelta => "points_by_delta",
        }
    }

    fn title(self, rolling_window: usize) -> String {
        match self {
            ChartKind::Points => "Points".to_string(),
            ChartKind::Rank => "Rank".to_string(),
            ChartKind::Difference => "Point Difference".to_string(),
            ChartKind::AveragePoints => "Average Points".to_string(),
            ChartKind::RollingAverage => format!("{} Day Moving Average", rolling_window),
            ChartKind::PointsByDelta => "Points by Delta".to_string(),
        }
    }

    fn series(self, trajectory: &ParticipantTrajectory) -> Vec<Option<f64>> {
        fn widen(series: &DaySeries<u32>) -> Vec<Option<f64>> {
            series.values().iter().map(|v| v.map(f64::from)).collect()
        }

        match self {
            ChartKind::Points => widen(&trajectory.cumulative),
            ChartKind::Rank => widen(&trajectory.rank),
            ChartKind::Difference => widen(&trajectory.delta_from_minimum),
            ChartKind::AveragePoints => trajectory.points_per_day.values().to_vec(),
            ChartKind::RollingAverage => trajectory.rolling_average.values().to_vec(),
            ChartKind::PointsByDelta => widen(&trajectory.split_points),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub span_gaps: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartConfig {
    pub fn build(kind: ChartKind, leaderboard: &Leaderboard) -> Self {
        let datasets = leaderboard
            .trajectories
            .iter()
            .enumerate()
            .map(|(index, trajectory)| Dataset {
                label: trajectory.name.clone(),
                data: kind.series(trajectory),
                border_color: PALETTE[index % PALETTE.len()].to_string(),
                span_gaps: kind != ChartKind::Difference,
            })
            .collect();

        Self {
            kind,
            title: kind.title(leaderboard.event.rolling_window),
            labels: (1..=DAY_COUNT).map(|day| day.to_string()).collect(),
            datasets,
        }
    }
}

/// A surface charts are drawn on.
pub trait ChartCanvas {
    type Handle;

    fn draw(&mut self, config: &ChartConfig) -> Result<Self::Handle>;
    fn dispose(&mut self, handle: Self::Handle);
}

/// Owns the chart currently shown on a canvas.
pub struct ChartSlot<C: ChartCanvas> {
    canvas: C,
    active: Option<C::Handle>,
}

impl<C: ChartCanvas> ChartSlot<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            active: None,
        }
    }

    /// Disposes the live chart, if any, then draws `config`.
    pub fn show(&mut self, config: &ChartConfig) -> Result<&C::Handle> {
        if let Some(previous) = self.active.take() {
            self.canvas.dispose(previous);
        }
        let handle = self.canvas.draw(config)?;
        Ok(self.active.insert(handle))
    }

    pub fn active(&self) -> Option<&C::Handle> {
        self.active.as_ref()
    }

    /// Disposes the live chart and hands the canvas back.
    pub fn into_canvas(mut self) -> C {
        if let Some(previous) = self.active.take() {
            self.canvas.dispose(previous);
        }
        self.canvas
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartHandle {
    pub id: u64,
    pub kind: ChartKind,
}

/// Renders chart documents to JSON in memory, one file per drawn chart.
///
/// Drawing while another chart is still live is an error.
#[derive(Debug, Default)]
pub struct BundleCanvas {
    next_id: u64,
    live: Option<u64>,
    documents: Vec<(String, Vec<u8>)>,
}

impl BundleCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[(String, Vec<u8>)] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<(String, Vec<u8>)> {
        self.documents
    }
}

impl ChartCanvas for BundleCanvas {
    type Handle = ChartHandle;

    fn draw(&mut self, config: &ChartConfig) -> Result<ChartHandle> {
        if let Some(live) = self.live {
            return Err(BoardError::ChartError {
                message: format!("chart {} is still live; dispose it before drawing", live),
            });
        }

        let body = serde_json::to_vec_pretty(config)?;
        self.documents
            .push((format!("charts/{}.json", config.kind.slug()), body));

        let handle = ChartHandle {
            id: self.next_id,
            kind: config.kind,
        };
        self.next_id += 1;
        self.live = Some(handle.id);
        tracing::debug!(chart = config.kind.slug(), id = handle.id, "Rendered chart");
        Ok(handle)
    }

    fn dispose(&mut self, handle: ChartHandle) {
        if self.live == Some(handle.id) {
            self.live = None;
        }
    }
}

/// Draws every chart kind through one slot.
pub fn render_all(leaderboard: &Leaderboard) -> Result<Vec<(String, Vec<u8>)>> {
    let mut slot = ChartSlot::new(BundleCanvas::new());
    for kind in ChartKind::ALL {
        slot.show(&ChartConfig::build(kind, leaderboard))?;
    }
    Ok(slot.into_canvas().into_documents())
}
