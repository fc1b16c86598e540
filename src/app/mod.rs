//! Session view state and terminal views.

pub mod state;
pub mod view;

pub use state::{AppState, Section, Tab};
pub use view::{ClauseDetailView, DashboardView, HomeView, NoticeView, ProgressView, UploadView};
