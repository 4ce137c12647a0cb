use std::borrow::Cow;

use async_trait::async_trait;

use crate::apis::icanhazdadjoke::{self, FetchFailed, JokeRecord};

/// Something the screen can ask for a new joke.
#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn fetch(&self) -> Result<JokeRecord, FetchFailed>;
}

pub struct JokeFetcher {
    http_client: reqwest::Client,
    endpoint: Cow<'static, str>,
}

impl JokeFetcher {
    pub const fn new(http_client: reqwest::Client) -> Self {
        Self { http_client, endpoint: Cow::Borrowed(icanhazdadjoke::ENDPOINT) }
    }

    #[cfg(test)]
    pub fn with_endpoint(http_client: reqwest::Client, endpoint: String) -> Self {
        Self { http_client, endpoint: Cow::Owned(endpoint) }
    }
}

#[async_trait]
impl JokeSource for JokeFetcher {
    async fn fetch(&self) -> Result<JokeRecord, FetchFailed> {
        icanhazdadjoke::random_joke(&self.http_client, &self.endpoint).await
    }
}
