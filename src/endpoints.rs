//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for listing a user's expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for recording a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The page for managing categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The print-ready expense report.
pub const PRINTABLE_REPORT_VIEW: &str = "/reports/print";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route to create expenses.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to create categories.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to download expenses as CSV.
pub const EXPORT_CSV: &str = "/api/export/csv";
/// The server-sent event stream of dashboard updates.
pub const DASHBOARD_STREAM: &str = "/api/dashboard/stream";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{expense_id}' in '/api/expenses/{expense_id}'. Only the first parameter
/// is replaced. Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Append a query string to `endpoint_path`, leaving the path unchanged if `query` is empty.
pub fn with_query(endpoint_path: &str, query: &str) -> String {
    if query.is_empty() {
        endpoint_path.to_owned()
    } else {
        format!("{endpoint_path}?{query}")
    }
}
