//! CSV download of the expenses in a date range.

use axum::{
    Extension,
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::Writer;

use crate::{
    Error,
    export::ExportState,
    expense::sort_by_date_descending,
    range::{RangeQuery, RangeSpec, filter_by_range},
    report::{ExportRow, export_rows},
    user::UserID,
};

const HEADER: [&str; 4] = ["Date", "Category", "Title", "Amount"];

/// Write `rows` as CSV with a `Date,Category,Title,Amount` header.
///
/// Fields containing a comma, a quote or a newline are quoted.
pub fn write_csv(rows: &[ExportRow]) -> Result<String, Error> {
    let mut writer = Writer::from_writer(vec![]);
    writer.write_record(HEADER)?;

    for row in rows {
        writer.write_record([&row.date, &row.category, &row.title, &row.amount])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::ExportError(error.to_string()))
}

fn file_name(range: &RangeSpec) -> String {
    match range {
        RangeSpec::Custom { start, end } => format!("expenses-{start}-to-{end}.csv"),
        range => format!("expenses-{}.csv", range.preset().as_query_value()),
    }
}

/// Download the user's expenses in the requested range as a CSV file, newest first.
pub async fn export_csv_endpoint(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, Error> {
    let expenses = state
        .expense_store
        .list(user_id)
        .inspect_err(|error| tracing::error!("could not get expenses for user {user_id}: {error}"))?;

    let range = query.to_spec();
    let mut expenses = filter_by_range(&expenses, &range, state.clock.as_ref());
    sort_by_date_descending(&mut expenses);

    let csv = write_csv(&export_rows(&expenses))
        .inspect_err(|error| tracing::error!("could not write CSV for user {user_id}: {error}"))?;
    tracing::debug!("Exported {} expenses for user {user_id}", expenses.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name(&range)),
            ),
        ],
        csv,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{FromRef, Query, State},
    };
    use time::macros::date;

    use crate::{
        export::ExportState,
        range::{RangePreset, RangeQuery},
        report::ExportRow,
        test_utils::{
            add_expense, assert_content_type, assert_status_ok, get_header, get_test_app_state,
            response_text,
        },
    };

    use super::{export_csv_endpoint, write_csv};

    fn row(date: &str, category: &str, title: &str, amount: &str) -> ExportRow {
        ExportRow {
            date: date.to_owned(),
            category: category.to_owned(),
            title: title.to_owned(),
            amount: amount.to_owned(),
        }
    }

    #[test]
    fn writes_header_for_no_rows() {
        assert_eq!(write_csv(&[]).unwrap(), "Date,Category,Title,Amount\n");
    }

    #[test]
    fn quotes_fields_with_delimiters_and_quotes() {
        let csv = write_csv(&[
            row("Jan 05, 2024", "Food", "Dinner, with friends", "45.50"),
            row("", "Other", "The \"big\" one", "3.00"),
        ])
        .unwrap();

        assert_eq!(
            csv,
            "Date,Category,Title,Amount\n\
            \"Jan 05, 2024\",Food,\"Dinner, with friends\",45.50\n\
            ,Other,\"The \"\"big\"\" one\",3.00\n"
        );
    }

    #[tokio::test]
    async fn downloads_range_newest_first() {
        let (state, user_id) = get_test_app_state();
        add_expense(&state, user_id, "Groceries", 80.0, "Food", date!(2024 - 03 - 02));
        add_expense(&state, user_id, "Bus pass", 40.0, "Transport", date!(2024 - 03 - 10));
        add_expense(&state, user_id, "Cinema", 25.5, "Entertainment", date!(2024 - 02 - 20));

        let response = export_csv_endpoint(
            State(ExportState::from_ref(&state)),
            Extension(user_id),
            Query(RangeQuery {
                range: Some(RangePreset::ThisMonth),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"expenses-this-month.csv\""
        );
        assert_eq!(
            response_text(response).await,
            "Date,Category,Title,Amount\n\
            \"Mar 10, 2024\",Transport,Bus pass,40.00\n\
            \"Mar 02, 2024\",Food,Groceries,80.00\n"
        );
    }

    #[tokio::test]
    async fn custom_range_file_name_has_both_dates() {
        let (state, user_id) = get_test_app_state();

        let response = export_csv_endpoint(
            State(ExportState::from_ref(&state)),
            Extension(user_id),
            Query(RangeQuery {
                range: Some(RangePreset::Custom),
                start: Some("2024-01-01".to_owned()),
                end: Some("2024-01-31".to_owned()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"expenses-2024-01-01-to-2024-01-31.csv\""
        );
    }
}
