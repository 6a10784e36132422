use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::Account;
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    // Who is signed in. Set by the login/signup views, cleared on sign-out.
    use_context_provider(|| Signal::new(None::<Account>));

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Spelling Practice" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
