use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator};

use spell_core::model::Role;

use crate::context::Account;
use crate::views::{ChildView, LoginView, ParentView, SignupView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LoginView)] Login {},
        #[route("/signup", SignupView)] Signup {},
        #[route("/parent", ParentView)] Parent {},
        #[route("/child", ChildView)] Child {},
}

impl Route {
    /// Landing page for a freshly signed-in account.
    #[must_use]
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Parent => Self::Parent {},
            Role::Child => Self::Child {},
        }
    }
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    let mut account = use_context::<Signal<Option<Account>>>();
    let navigator = use_navigator();
    let signed_in = account.read().as_ref().map(|a| a.email.to_string());

    rsx! {
        header { class: "topbar",
            h1 { "Spelling Practice" }
            if let Some(email) = signed_in {
                span { class: "topbar-user", "{email}" }
                button {
                    class: "btn btn-secondary",
                    onclick: move |_| {
                        account.set(None);
                        navigator.replace(Route::Login {});
                    },
                    "Sign out"
                }
            }
        }
    }
}
