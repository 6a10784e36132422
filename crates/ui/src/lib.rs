pub mod app;
pub mod context;
pub mod routes;
pub mod vm;
pub mod views;
pub mod webview;

pub use app::App;
pub use context::{Account, AppContext, UiApp, build_app_context};
pub use webview::{WebviewCelebration, WebviewSpeech};
