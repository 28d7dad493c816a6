//! Server-sent events that keep the dashboard up to date.
//!
//! Each connection subscribes to the user's expenses and categories. Every
//! snapshot is run through the same report pipeline as the page. The rendered
//! summary is pushed as a `report` event, followed by the new chart values as a
//! `charts` event. Dropping the connection drops the subscriptions.

use std::{convert::Infallible, sync::Arc};

use axum::{
    Extension,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt, stream};

use crate::{
    Error,
    category::CategorySet,
    clock::Clock,
    dashboard::{
        cards::summary_section, charts::chart_updates, handlers::DashboardState,
        report::build_dashboard_report,
    },
    expense::Expense,
    range::{RangeQuery, RangeSpec},
    report::ReportConfig,
    store::Subscription,
    user::UserID,
};

/// The name of the event carrying a rendered summary.
pub(super) const REPORT_EVENT: &str = "report";
/// The name of the event carrying the chart values as JSON.
pub(super) const CHARTS_EVENT: &str = "charts";

/// One run of the report pipeline, ready to send.
struct LiveUpdate {
    summary: String,
    charts: String,
}

impl LiveUpdate {
    fn into_events(self) -> [Event; 2] {
        [
            Event::default().event(REPORT_EVENT).data(self.summary),
            Event::default().event(CHARTS_EVENT).data(self.charts),
        ]
    }
}

struct LiveReport {
    expenses: Subscription<Vec<Expense>>,
    categories: Subscription<CategorySet>,
    snapshot: Vec<Expense>,
    category_set: CategorySet,
    range: RangeSpec,
    clock: Arc<dyn Clock>,
    report_config: ReportConfig,
    sent_initial: bool,
}

impl LiveReport {
    async fn connect(
        state: &DashboardState,
        user_id: UserID,
        range: RangeSpec,
    ) -> Result<Self, Error> {
        let mut expenses = state.expense_store.subscribe(user_id)?;
        let mut categories = state.category_store.subscribe(user_id)?;

        let snapshot = expenses.next().await.unwrap_or_default();
        let category_set = categories
            .next()
            .await
            .unwrap_or_else(CategorySet::defaults);

        Ok(Self {
            expenses,
            categories,
            snapshot,
            category_set,
            range,
            clock: state.clock.clone(),
            report_config: state.report_config.clone(),
            sent_initial: false,
        })
    }

    /// Wait for either collection to change and render the new report.
    ///
    /// The first call renders the snapshots taken on connection without waiting.
    async fn next_update(&mut self) -> Option<LiveUpdate> {
        if self.sent_initial {
            tokio::select! {
                snapshot = self.expenses.next() => {
                    self.snapshot = snapshot?;
                }
                categories = self.categories.next() => {
                    self.category_set = categories?;
                }
            }
        }

        self.sent_initial = true;
        Some(self.render())
    }

    fn render(&self) -> LiveUpdate {
        let report = build_dashboard_report(
            &self.snapshot,
            &self.range,
            &self.category_set,
            self.clock.as_ref(),
            &self.report_config.insight_thresholds,
        );

        LiveUpdate {
            summary: summary_section(
                &report,
                &self.category_set,
                &self.report_config.currency_symbol,
            )
            .into_string(),
            charts: chart_updates(&report.category_series, &report.monthly_series).to_string(),
        }
    }
}

fn updates(live: LiveReport) -> impl Stream<Item = LiveUpdate> {
    stream::unfold(live, |mut live| async move {
        let update = live.next_update().await?;
        Some((update, live))
    })
}

/// Stream the rendered dashboard summary and chart values for the requested range.
pub async fn get_dashboard_stream(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<RangeQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let live = LiveReport::connect(&state, user_id, query.to_spec())
        .await
        .inspect_err(|error| {
            tracing::error!("could not subscribe user {user_id} to dashboard updates: {error}")
        })?;
    tracing::debug!("User {user_id} connected to the dashboard stream");

    let events = updates(live)
        .flat_map(|update| stream::iter(update.into_events()))
        .map(Ok);

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
