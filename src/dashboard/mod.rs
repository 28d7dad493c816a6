//! The dashboard: an overview of the user's spending with charts, insights
//! and a live summary that updates as expenses change.

mod cards;
mod charts;
mod handlers;
mod live;
mod report;

pub use handlers::{DashboardState, get_dashboard_page};
pub use live::get_dashboard_stream;
pub use report::{DashboardReport, build_dashboard_report};
