//! Domain entities for weekly positioning data and its derived metrics

mod group;
mod metrics;
mod net;
mod position;

pub use group::{GroupSet, Leg, TraderGroup};
pub use metrics::{
    CrossMetrics, GroupMetrics, LegMetrics, MetricsRow, MetricsTable, NetMetrics,
    RebalanceMetrics, ShareMetrics,
};
pub use net::{NetAlignment, NetSide};
pub use position::WeeklyPosition;
