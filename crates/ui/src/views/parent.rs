use dioxus::prelude::*;

use spell_core::model::ChildId;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ChildCardVm, map_child_card};

#[component]
pub fn ParentView() -> Element {
    let ctx = use_context::<AppContext>();
    let parent = ctx.parent();

    let mut child_name = use_signal(String::new);
    let mut selected_child = use_signal(String::new);
    let mut list_name = use_signal(String::new);
    let mut words = use_signal(String::new);
    let mut notice = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<ViewError>);

    let overview = {
        let parent = parent.clone();
        use_resource(move || {
            let parent = parent.clone();
            async move {
                let children = parent.overview().await?;
                Ok::<_, ViewError>(children.iter().map(map_child_card).collect::<Vec<_>>())
            }
        })
    };
    let state = view_state_from_resource(&overview);

    let on_add_child = {
        let parent = parent.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let parent = parent.clone();
            let mut overview = overview;
            spawn(async move {
                match parent.add_child(&child_name()).await {
                    Ok(_) => {
                        child_name.set(String::new());
                        error.set(None);
                        overview.restart();
                    }
                    Err(err) => error.set(Some(err.into())),
                }
            });
        }
    };

    let on_assign = move |evt: FormEvent| {
        evt.prevent_default();
        let Ok(child_id) = selected_child().parse::<ChildId>() else {
            error.set(Some(ViewError::new("Select a child first.")));
            return;
        };
        let parent = parent.clone();
        let mut overview = overview;
        spawn(async move {
            match parent
                .assign_word_list(child_id, &list_name(), &words())
                .await
            {
                Ok(_) => {
                    list_name.set(String::new());
                    words.set(String::new());
                    selected_child.set(String::new());
                    error.set(None);
                    notice.set(Some("Word list assigned!".to_string()));
                    overview.restart();
                }
                Err(err) => {
                    notice.set(None);
                    error.set(Some(err.into()));
                }
            }
        });
    };

    let cards = match &state {
        ViewState::Ready(cards) => cards.clone(),
        _ => Vec::new(),
    };

    rsx! {
        div { class: "page",
            h2 { "Parent Dashboard" }

            section { class: "panel",
                h3 { "Add Child" }
                form { class: "stack", onsubmit: on_add_child,
                    input {
                        placeholder: "Child's name",
                        value: "{child_name}",
                        oninput: move |evt| child_name.set(evt.value()),
                    }
                    button { class: "btn btn-primary", r#type: "submit", "Add Child" }
                }
            }

            section { class: "panel",
                h3 { "Assign Word List" }
                form { class: "stack", onsubmit: on_assign,
                    select {
                        value: "{selected_child}",
                        onchange: move |evt| selected_child.set(evt.value()),
                        option { value: "", "Select a child" }
                        for card in cards.iter() {
                            option { key: "{card.id}", value: "{card.id}", "{card.name}" }
                        }
                    }
                    input {
                        placeholder: "List name (e.g., Week 1)",
                        value: "{list_name}",
                        oninput: move |evt| list_name.set(evt.value()),
                    }
                    textarea {
                        rows: 3,
                        placeholder: "Enter words separated by commas",
                        value: "{words}",
                        oninput: move |evt| words.set(evt.value()),
                    }
                    button { class: "btn btn-success", r#type: "submit", "Assign List" }
                }
                if let Some(message) = notice() {
                    p { class: "notice", "{message}" }
                }
            }

            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }

            section {
                h3 { "Child Progress" }
                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { class: "muted", "Loading..." }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "error", "{err.message()}" }
                    },
                    ViewState::Ready(cards) => rsx! {
                        if cards.is_empty() {
                            p { class: "muted", "No children added yet." }
                        }
                        for card in cards {
                            ChildCard { key: "{card.id}", card }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn ChildCard(card: ChildCardVm) -> Element {
    rsx! {
        div { class: "child-card",
            h4 { "{card.name}" }
            match (&card.list_label, &card.words_label) {
                (Some(list), Some(words)) => rsx! {
                    p { class: "strong", "{list}" }
                    p { class: "muted", "{words}" }
                },
                _ => rsx! {
                    p { class: "muted", "No list assigned yet" }
                },
            }
            if card.progress.is_empty() {
                p { class: "muted", "No progress recorded yet" }
            } else {
                if let Some(tally) = &card.tally_label {
                    p { class: "strong", "Progress: {tally}" }
                }
                ul { class: "progress-list",
                    for (idx, row) in card.progress.iter().enumerate() {
                        li { key: "{idx}",
                            "{row.word} "
                            span { class: row.result_class, "{row.result_label}" }
                            span { class: "muted", " {row.time_label}" }
                        }
                    }
                }
            }
        }
    }
}
