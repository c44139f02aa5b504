// Thu Oct 15 2026 - Alex

pub mod args;
pub mod console;
pub mod progress;

pub use args::Args;
pub use console::Console;
pub use progress::StageSpinner;
