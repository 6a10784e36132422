//! Speech and celebration backed by the desktop webview.
//!
//! Both go through `document::eval`, so they only do something while a
//! Dioxus document is live.

use std::sync::{Mutex, PoisonError};

use dioxus::document::eval;
use services::{Burst, CelebrationEffect, SpeechService};
use spell_core::session::Celebration;
use spell_core::voice::Voice;

/// Reports the webview's voices now and again every time they change.
/// Stays alive so the `voiceschanged` handler keeps sending.
pub const VOICES_SCRIPT: &str = r"
    const synth = window.speechSynthesis;
    if (!synth) { return; }
    const send = () => {
        const voices = synth.getVoices().map((v) => ({ name: v.name, lang: v.lang }));
        if (voices.length > 0) { dioxus.send(voices); }
    };
    send();
    synth.onvoiceschanged = send;
    await new Promise(() => {});
";

/// `speechSynthesis`-backed speech.
///
/// The webview reports voices asynchronously, so the list is cached here and
/// refreshed by the child view from [`VOICES_SCRIPT`].
#[derive(Debug, Default)]
pub struct WebviewSpeech {
    voices: Mutex<Vec<Voice>>,
}

impl WebviewSpeech {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock().unwrap_or_else(PoisonError::into_inner) = voices;
    }
}

impl SpeechService for WebviewSpeech {
    fn list_voices(&self) -> Vec<Voice> {
        self.voices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn speak(&self, text: &str, voice: &Voice) {
        let _ = eval(&speak_script(text, voice));
    }
}

/// Star pop and confetti drawn with plain DOM nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebviewCelebration;

impl CelebrationEffect for WebviewCelebration {
    fn celebrate(&self, kind: Celebration, burst: &Burst) {
        let _ = eval(&celebration_script(kind, burst));
    }
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

pub(crate) fn speak_script(text: &str, voice: &Voice) -> String {
    let text = js_string(text);
    let name = js_string(&voice.name);
    let lang = js_string(&voice.lang);
    format!(
        r"(function() {{
            const synth = window.speechSynthesis;
            if (!synth) return;
            const utterance = new SpeechSynthesisUtterance({text});
            const voice = synth.getVoices().find((v) => v.name === {name});
            if (voice) utterance.voice = voice;
            utterance.lang = {lang};
            synth.speak(utterance);
        }})();"
    )
}

pub(crate) fn celebration_script(kind: Celebration, burst: &Burst) -> String {
    match kind {
        Celebration::Star => r#"(function() {
            const star = document.createElement("div");
            star.className = "star-pop";
            star.textContent = "⭐";
            document.body.appendChild(star);
            setTimeout(() => star.remove(), 1000);
        })();"#
            .to_string(),
        Celebration::Completion => {
            let count = burst.particle_count;
            let spread = burst.spread;
            let origin_y = burst.origin_y;
            format!(
                r#"(function() {{
                    const colors = ["#f94144", "#f8961e", "#f9c74f", "#90be6d", "#577590"];
                    const originY = window.innerHeight * {origin_y};
                    const originX = window.innerWidth / 2;
                    for (let i = 0; i < {count}; i++) {{
                        const bit = document.createElement("div");
                        bit.className = "confetti";
                        bit.style.background = colors[i % colors.length];
                        bit.style.left = originX + "px";
                        bit.style.top = originY + "px";
                        document.body.appendChild(bit);
                        const angle = (-90 + (Math.random() - 0.5) * {spread}) * Math.PI / 180;
                        const speed = 200 + Math.random() * 300;
                        const dx = Math.cos(angle) * speed;
                        const dy = Math.sin(angle) * speed + 400;
                        bit.animate(
                            [
                                {{ transform: "translate(0, 0) rotate(0deg)", opacity: 1 }},
                                {{ transform: `translate(${{dx}}px, ${{dy}}px) rotate(720deg)`, opacity: 0 }}
                            ],
                            {{ duration: 1600 + Math.random() * 800, easing: "cubic-bezier(.2,.6,.4,1)" }}
                        ).onfinish = () => bit.remove();
                    }}
                }})();"#
            )
        }
    }
}
