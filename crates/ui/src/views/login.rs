use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use spell_core::model::Email;

use crate::context::{Account, AppContext};
use crate::routes::Route;
use crate::views::ViewError;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut account = use_context::<Signal<Option<Account>>>();
    let navigator = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<ViewError>);
    let mut busy = use_signal(|| false);

    let on_login = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let auth = ctx.auth();
        busy.set(true);
        spawn(async move {
            let raw_email = email();
            let result = auth.sign_in(&raw_email, &password()).await;
            busy.set(false);
            match result.map_err(ViewError::from).and_then(|role| {
                Email::parse(&raw_email)
                    .map(|email| Account { email, role })
                    .map_err(ViewError::from)
            }) {
                Ok(signed_in) => {
                    tracing::info!(email = %signed_in.email, role = %signed_in.role, "signed in");
                    let home = Route::home_for(signed_in.role);
                    account.set(Some(signed_in));
                    error.set(None);
                    navigator.replace(home);
                }
                Err(err) => error.set(Some(err)),
            }
        });
    };

    rsx! {
        div { class: "page page-narrow",
            h2 { "Login" }
            form { class: "stack", onsubmit: on_login,
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Login" }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            p { class: "muted",
                "No account yet? "
                Link { to: Route::Signup {}, "Sign up" }
            }
        }
    }
}
