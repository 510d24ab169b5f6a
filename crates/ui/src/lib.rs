pub mod app;
pub mod components;
pub mod event_handler;
pub mod layout;
pub mod state;
pub mod theme;

pub use app::App;
pub use event_handler::{EventHandler, KeyAction};
pub use state::{AppState, ParseEvent, SearchState, ViewPhase};
pub use theme::Theme;
