use std::time::Duration;

use reqwest::{
    Client,
    Response,
};
use serde::de::DeserializeOwned;

use crate::core::FloraError;

const USER_AGENT: &str = concat!("florafind/", env!("CARGO_PKG_VERSION"), " (+reqwest)");
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub fn http_client() -> Result<Client, FloraError> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FloraError::Custom(format!("HTTP client build failed: {e}")))
}

pub fn ensure_success(resp: &Response) -> Result<(), FloraError> {
    if !resp.status().is_success() {
        return Err(FloraError::Http { status: resp.status().as_u16(), url: resp.url().to_string() });
    }
    Ok(())
}

pub async fn get_json<T, Q>(client: &Client, url: &str, query: &Q) -> Result<T, FloraError>
where
    T: DeserializeOwned,
    Q: serde::Serialize + ?Sized,
{
    let resp = client.get(url).query(query).send().await?;
    ensure_success(&resp)?;
    Ok(resp.json::<T>().await?)
}

/// Joins a base url and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
