use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use spell_core::model::{Email, Role};

use crate::context::{Account, AppContext};
use crate::routes::Route;
use crate::views::ViewError;

#[component]
pub fn SignupView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut account = use_context::<Signal<Option<Account>>>();
    let navigator = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut role = use_signal(|| Role::Parent);
    let mut error = use_signal(|| None::<ViewError>);
    let mut busy = use_signal(|| false);

    let on_signup = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let auth = ctx.auth();
        busy.set(true);
        spawn(async move {
            let raw_email = email();
            let result = auth.sign_up(&raw_email, &password(), role()).await;
            busy.set(false);
            match result.map_err(ViewError::from).and_then(|role| {
                Email::parse(&raw_email)
                    .map(|email| Account { email, role })
                    .map_err(ViewError::from)
            }) {
                Ok(signed_up) => {
                    tracing::info!(email = %signed_up.email, role = %signed_up.role, "account created");
                    let home = Route::home_for(signed_up.role);
                    account.set(Some(signed_up));
                    error.set(None);
                    navigator.replace(home);
                }
                Err(err) => error.set(Some(err)),
            }
        });
    };

    rsx! {
        div { class: "page page-narrow",
            h2 { "Sign Up" }
            form { class: "stack", onsubmit: on_signup,
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password (at least 6 characters)",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                select {
                    value: role().as_str(),
                    onchange: move |evt| {
                        if let Ok(parsed) = evt.value().parse::<Role>() {
                            role.set(parsed);
                        }
                    },
                    option { value: "parent", "Parent" }
                    option { value: "child", "Child" }
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Sign Up" }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            p { class: "muted",
                "Already have an account? "
                Link { to: Route::Login {}, "Log in" }
            }
        }
    }
}
