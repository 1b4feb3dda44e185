pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod page;
pub mod poller;
pub mod upload;

pub use app::PageApp;
pub use config::{build_config, ConsoleConfig};
pub use error::{PollError, UploadError};
pub use page::{Page, SharedPage};
pub use poller::{DashboardPoller, PollerHandle};
pub use upload::UploadController;
