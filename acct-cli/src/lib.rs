pub mod app;
pub mod display;
pub mod flows;
pub mod logging;
pub mod prompt;
pub mod settings;
pub mod state;
pub mod utils;

pub use app::{App, MenuAction};
pub use prompt::{Bounds, Console, PromptError, PromptResult};
pub use settings::Settings;
