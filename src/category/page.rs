//! The page for viewing categories and managing custom ones.

use std::sync::Arc;

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState,
    category::{Category, CategoryFormData, CategoryId, CategoryName, CategorySet},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
    store::CategoryStore,
    user::UserID,
};

/// The state needed for the categories page and endpoints.
#[derive(Clone)]
pub struct CategoriesState {
    category_store: Arc<dyn CategoryStore>,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            category_store: state.category_store.clone(),
        }
    }
}

/// Render the built-in and custom categories.
pub async fn get_categories_page(
    State(state): State<CategoriesState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match state.category_store.list(user_id) {
        Ok(categories) => categories_view(&categories).into_response(),
        Err(error) => {
            tracing::error!("Could not load the categories for user {user_id}: {error}");
            error.into_response()
        }
    }
}

/// Handle the new category form.
///
/// Names that are blank or already used by another category are rejected
/// with a message under the input.
pub async fn create_category_endpoint(
    State(state): State<CategoriesState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return new_category_form(&form.name, Some(&error.to_string())).into_response(),
    };

    let categories = match state.category_store.list(user_id) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Could not load the categories for user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    if let Some(existing) = categories.find(name.as_ref()) {
        let message = format!("There is already a category called \"{}\"", existing.name());
        return new_category_form(&form.name, Some(&message)).into_response();
    }

    match state.category_store.add(user_id, name) {
        Ok(category) => {
            tracing::debug!("User {user_id} created category {}", category.id);
            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");
            error.into_alert_response()
        }
    }
}

/// Delete one of the user's custom categories.
///
/// Expenses in the category keep its name.
pub async fn delete_category_endpoint(
    State(state): State<CategoriesState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Response {
    match state.category_store.delete(user_id, category_id) {
        // The status code has to be 200 OK or HTMX will not delete the list item.
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("Could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn new_category_form(name: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::CATEGORIES_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full max-w-md space-y-4"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "New category" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Groceries"
                    required
                    value=(name)
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(error_message) = error_message {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Category" }
        }
    }
}

fn category_row(category: &Category) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE)
                {
                    @if let Some(icon) = category.icon() {
                        (icon) " "
                    }
                    (category.name())
                }
            }

            @match category {
                Category::Default(_) => {
                    td class=(TABLE_CELL_STYLE) { "Built-in" }
                    td class=(TABLE_CELL_STYLE) {}
                }
                Category::Custom(custom) => {
                    td class=(TABLE_CELL_STYLE) { "Custom" }
                    td class=(TABLE_CELL_STYLE)
                    {
                        button
                            hx-delete=(format_endpoint(endpoints::CATEGORY, custom.id))
                            hx-confirm={
                                "Are you sure you want to delete '" (custom.name) "'? "
                                "Expenses in this category will keep the name."
                            }
                            hx-target="closest tr"
                            hx-target-error="#alert-container"
                            hx-swap="delete"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

fn categories_view(categories: &CategorySet) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-screen-md space-y-6"
            {
                h1 class="text-xl font-bold" { "Categories" }

                (new_category_form("", None))

                @if !categories.shadowed().is_empty() {
                    div id="shadowed-categories"
                        class="p-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 dark:bg-gray-800 dark:text-yellow-300"
                    {
                        p { "These categories are hidden because another category has the same name:" }
                        ul class="list-disc list-inside"
                        {
                            @for category in categories.shadowed() {
                                li { (category.name) }
                            }
                        }
                    }
                }

                div class="relative overflow-x-auto shadow-md rounded-lg"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for category in categories.iter() {
                                (category_row(category))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Categories", &[], &content)
}
