pub mod app;
pub mod output;
pub mod pages;

pub use app::{run, Command, RunOptions, RunSummary};
pub use pages::{Dashboard, LoadOptions, PageView};
