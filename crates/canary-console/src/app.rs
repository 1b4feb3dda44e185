use reqwest::Client;

use crate::config::ConsoleConfig;
use crate::page::SharedPage;
use crate::poller::{should_activate, DashboardPoller, PollerHandle};
use crate::upload::UploadController;

/// Components wired up when a page becomes ready.
///
/// The upload controller and the dashboard poller are independent; they
/// share nothing but the page.
#[derive(Debug)]
pub struct PageApp {
    pub upload: UploadController,
    /// Running only when the page loaded at the dashboard path.
    pub poller: Option<PollerHandle>,
}

impl PageApp {
    /// Page-ready hook. The activation check runs once, here; later
    /// navigation does not start or stop the poller.
    pub async fn ready(page: SharedPage, client: Client, config: &ConsoleConfig) -> Self {
        let path = page.lock().await.path().to_string();
        let upload = UploadController::new(client.clone(), config, page.clone());

        let poller = if should_activate(&path) {
            Some(DashboardPoller::new(client, config, page).spawn())
        } else {
            tracing::debug!(%path, "dashboard poller not active for this page");
            None
        };

        Self { upload, poller }
    }

    pub async fn shutdown(self) {
        if let Some(poller) = self.poller {
            poller.shutdown().await;
        }
    }
}
