use reqwest::Client;
use url::Url;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) http: Client,
    pub(crate) backend_url: Url,
}
