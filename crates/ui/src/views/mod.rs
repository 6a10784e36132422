mod child;
mod login;
mod parent;
mod signup;
mod state;

pub use child::ChildView;
pub use login::LoginView;
pub use parent::ParentView;
pub use signup::SignupView;
pub use state::{ViewError, ViewState, view_state_from_resource};
