//! Dismissable success and error alerts, swapped into the page's alert container by HTMX.

use maud::{Markup, html};

/// A message to show the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The action worked.
    Success { message: String, details: String },
    /// The action failed.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert.
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, icon) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "flex p-4 mb-4 text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400",
                "✓",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "flex p-4 mb-4 text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                "!",
            ),
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    span class="font-bold me-3" aria-hidden="true" { (icon) }

                    div class="text-sm"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8"
                        aria-label="Close"
                        onclick="document.getElementById('alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let markup = Alert::Error {
            message: "Could not delete expense".to_owned(),
            details: "The expense could not be found.".to_owned(),
        }
        .into_html();

        let html = Html::parse_fragment(&markup.into_string());
        let text: Vec<_> = html
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect();

        assert_eq!(
            text,
            vec!["Could not delete expense", "The expense could not be found."]
        );
    }

    #[test]
    fn empty_details_are_omitted() {
        let markup = Alert::Success {
            message: "Saved".to_owned(),
            details: String::new(),
        }
        .into_html();

        let html = Html::parse_fragment(&markup.into_string());

        assert_eq!(html.select(&Selector::parse("p").unwrap()).count(), 1);
    }
}
