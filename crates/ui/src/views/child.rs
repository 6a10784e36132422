use std::sync::Arc;

use dioxus::document::eval;
use dioxus::prelude::*;
use tokio::sync::mpsc;

use spell_core::model::ChildProfile;
use spell_core::session::PracticeSession;
use spell_core::voice::Voice;

use crate::context::{Account, AppContext};
use crate::views::ViewError;
use crate::vm::{
    RevealTicket, advance_after_reveal, map_practice, map_voice_options, reconcile_session,
};
use crate::webview::VOICES_SCRIPT;

#[component]
pub fn ChildView() -> Element {
    let ctx = use_context::<AppContext>();
    let account = use_context::<Signal<Option<Account>>>();
    let practice = ctx.practice();

    let mut child = use_signal(|| None::<ChildProfile>);
    let mut session = use_signal(|| None::<PracticeSession>);
    let mut selector = use_signal(|| practice.voice_selector());
    let mut notice = use_signal(|| None::<ViewError>);
    let mut reveal_ticket = use_signal(RevealTicket::default);

    // Child document feed. The subscription lives inside this future and is
    // dropped with it when the view unmounts.
    {
        let practice = practice.clone();
        use_future(move || {
            let practice = practice.clone();
            async move {
                let Some(email) = account.peek().as_ref().map(|a| a.email.clone()) else {
                    notice.set(Some(ViewError::new("Please log in first.")));
                    return;
                };
                let profile = match practice.find_child_for(&email).await {
                    Ok(profile) => profile,
                    Err(err) => {
                        notice.set(Some(err.into()));
                        return;
                    }
                };

                let (tx, mut rx) = mpsc::unbounded_channel::<ChildProfile>();
                let _subscription = match practice
                    .watch_child(
                        profile.id,
                        Arc::new(move |snapshot: &ChildProfile| {
                            let _ = tx.send(snapshot.clone());
                        }),
                    )
                    .await
                {
                    Ok(subscription) => subscription,
                    Err(err) => {
                        notice.set(Some(err.into()));
                        return;
                    }
                };

                while let Some(snapshot) = rx.recv().await {
                    let current = session.peek().clone();
                    let next = reconcile_session(current.clone(), &snapshot);
                    if next != current {
                        reveal_ticket.write().bump();
                        session.set(next);
                    }
                    child.set(Some(snapshot));
                }
            }
        });
    }

    // Voices arrive asynchronously from the webview.
    {
        let speech = ctx.speech();
        use_future(move || {
            let speech = Arc::clone(&speech);
            async move {
                let mut voices = eval(VOICES_SCRIPT);
                while let Ok(list) = voices.recv::<Vec<Voice>>().await {
                    speech.replace_voices(list.clone());
                    selector.write().on_voices_changed(list);
                }
            }
        });
    }

    let child_id = child.read().as_ref().map(|c| c.id);

    let on_speak = {
        let practice = practice.clone();
        move |_: MouseEvent| {
            let Some(child_id) = child_id else { return };
            let Some(Ok(effects)) = session.read().as_ref().map(PracticeSession::speak) else {
                return;
            };
            let voice = selector.peek().selected().cloned();
            let practice = practice.clone();
            spawn(async move {
                practice.execute(child_id, &effects, voice.as_ref()).await;
            });
        }
    };

    let on_submit = {
        let practice = practice.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let Some(child_id) = child_id else { return };
            let submitted = session
                .write()
                .as_mut()
                .map(|s| s.submit(practice.now()));
            let effects = match submitted {
                Some(Ok(effects)) => effects,
                Some(Err(err)) => {
                    tracing::debug!(error = %err, "submit ignored");
                    return;
                }
                None => return,
            };
            reveal_ticket.write().bump();
            let issued = reveal_ticket();
            let practice = practice.clone();
            spawn(async move {
                practice.execute(child_id, &effects, None).await;
                tokio::time::sleep(practice.reveal_delay()).await;
                let effects =
                    advance_after_reveal(session.write().as_mut(), reveal_ticket(), issued);
                if !effects.is_empty() {
                    practice.execute(child_id, &effects, None).await;
                }
            });
        }
    };

    let on_restart = {
        let practice = practice.clone();
        move |_: MouseEvent| {
            if let Some(s) = session.write().as_mut() {
                practice.restart(s);
            }
            reveal_ticket.write().bump();
        }
    };

    if let Some(err) = notice() {
        return rsx! {
            div { class: "page page-narrow center",
                p { class: "notice notice-blocking", "{err.message()}" }
            }
        };
    }

    let Some(vm) = session.read().as_ref().map(map_practice) else {
        let message = if child.read().is_some() {
            "No word list assigned yet. Please check back later!"
        } else {
            "Loading..."
        };
        return rsx! {
            div { class: "page page-narrow center",
                p { class: "muted big", "{message}" }
            }
        };
    };

    if vm.complete {
        return rsx! {
            div { class: "page page-narrow center",
                p { class: "complete", "🎉 Great job! You finished the list!" }
                button { class: "btn btn-primary", onclick: on_restart, "🔁 Practice Again" }
            }
        };
    }

    let voice_options = map_voice_options(&selector.read());

    rsx! {
        div { class: "page page-narrow center",
            h2 { class: "practice-title", "{vm.title}" }
            p { class: "muted", "{vm.progress_label}" }

            div { class: "stack",
                label { r#for: "voice-select", "Select Voice:" }
                select {
                    id: "voice-select",
                    onchange: move |evt| {
                        if let Err(err) = selector.write().choose(&evt.value()) {
                            tracing::debug!(error = %err, "voice choice ignored");
                        }
                    },
                    for voice in voice_options {
                        option {
                            key: "{voice.name}",
                            value: "{voice.name}",
                            selected: voice.selected,
                            "{voice.label}"
                        }
                    }
                }
            }

            button {
                class: "btn btn-speak",
                disabled: !vm.accepts_input,
                onclick: on_speak,
                "🔊 Hear Word"
            }

            form { class: "stack", onsubmit: on_submit,
                input {
                    class: "answer",
                    placeholder: "Type the word...",
                    autocomplete: "off",
                    value: "{vm.input}",
                    disabled: !vm.accepts_input,
                    oninput: move |evt| {
                        if let Some(s) = session.write().as_mut() {
                            let _ = s.set_input(evt.value());
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: !vm.accepts_input,
                    "Submit"
                }
            }

            if let Some(feedback) = vm.feedback {
                p { class: feedback.class, "{feedback.label}" }
            }
        }
    }
}
