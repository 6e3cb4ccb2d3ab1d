use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{CurrentListResponse, HistoryResponse, ListNamesResponse};
use super::{
    dedup_categories, dedup_titles, ApiError, BestsellerHistory, BookSource, BookSummary,
    Category, ListAppearance, RetryPolicy,
};
use crate::config::Config;

/// HTTP client for the NYT Books API v3
#[derive(Debug, Clone)]
pub struct NytClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl NytClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bestseller-shelf/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            retry,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.nyt_api_base_url.clone(),
            config.nyt_api_key.clone(),
            Duration::from_secs(config.api_timeout_secs),
            RetryPolicy::default(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET `path` and decode the JSON body, retrying transient failures
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            match self.fetch(path, query).await {
                Ok(body) => return Ok(serde_json::from_str(&body)?),
                Err(e) if e.is_transient() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "Bestseller API call to {} failed ({}), retrying in {:?}",
                        path,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("Bestseller API call to {} failed: {}", path, e);
                    return Err(e);
                }
            }
        }
    }

    async fn fetch(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .query(&[("api-key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl BookSource for NytClient {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let response: ListNamesResponse = self.get_json("lists/names.json", &[]).await?;

        let categories = dedup_categories(
            response
                .results
                .into_iter()
                .map(|list| list.list_name_encoded),
        );
        tracing::debug!("Fetched {} bestseller categories", categories.len());

        Ok(categories)
    }

    async fn books_by_category(&self, key: &str) -> Result<Vec<BookSummary>, ApiError> {
        let path = format!("lists/current/{}.json", key);
        let response: CurrentListResponse = self.get_json(&path, &[]).await?;

        let mut listed = response.results.books;
        // Unranked entries go last, in payload order
        listed.sort_by_key(|book| book.rank.unwrap_or(u32::MAX));

        let books = listed
            .into_iter()
            .map(|book| BookSummary {
                title: book.title,
                author: book.author,
                image: book.book_image.filter(|url| !url.is_empty()),
                description: book.description,
            })
            .collect();

        Ok(dedup_titles(books))
    }

    async fn history(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Vec<BestsellerHistory>, ApiError> {
        let response: HistoryResponse = self
            .get_json(
                "lists/best-sellers/history.json",
                &[("title", title), ("author", author)],
            )
            .await?;

        Ok(response
            .results
            .into_iter()
            .map(|record| BestsellerHistory {
                title: record.title,
                author: record.author,
                description: record.description.filter(|d| !d.is_empty()),
                publisher: record.publisher,
                ranks: record
                    .ranks_history
                    .into_iter()
                    .map(|rank| ListAppearance {
                        list_name: rank.display_name.unwrap_or(rank.list_name),
                        rank: rank.rank,
                        bestsellers_date: rank.bestsellers_date,
                        weeks_on_list: rank.weeks_on_list,
                    })
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned `(status, body)` per connection, in order
    ///
    /// Returns the base URL and a counter of requests answered.
    async fn canned_server(replies: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for (status, body) in replies {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };

                let mut request: Vec<u8> = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);

                let reply = format!(
                    "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    fn quick_retry() -> RetryPolicy {
        RetryPolicy {
            max_retries: 1,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(10),
        }
    }

    fn client_for(base_url: &str) -> NytClient {
        NytClient::new(base_url, "key", Duration::from_secs(5), quick_retry()).unwrap()
    }

    const NAMES: &str = r#"{"results": [
        {"list_name_encoded": "hardcover-fiction"},
        {"list_name_encoded": "hardcover-fiction"}
    ]}"#;

    #[tokio::test]
    async fn test_transient_failure_is_retried_once() {
        let (base_url, hits) = canned_server(vec![(503, "{}"), (200, NAMES)]).await;

        let result = client_for(&base_url).categories().await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        let categories = result.unwrap();
        assert_eq!(categories, vec![Category::from_key("hardcover-fiction")]);
    }

    #[tokio::test]
    async fn test_second_transient_failure_is_returned() {
        let (base_url, hits) = canned_server(vec![(503, "{}"), (503, "{}")]).await;

        let result = client_for(&base_url).categories().await;

        assert!(matches!(result, Err(ApiError::Status(503))));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let (base_url, hits) = canned_server(vec![(401, "{}"), (200, NAMES)]).await;

        let result = client_for(&base_url).categories().await;

        assert!(matches!(result, Err(ApiError::Status(401))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_current_list_is_ordered_by_rank() {
        let payload = r#"{"results": {"books": [
            {"rank": 2, "title": "Beloved", "author": "Toni Morrison"},
            {"title": "Unranked", "author": "Nobody"},
            {"rank": 1, "title": "Dune", "author": "Frank Herbert"},
            {"rank": 3, "title": "Dune", "author": "Frank Herbert"}
        ]}}"#;
        let (base_url, _) = canned_server(vec![(200, payload)]).await;

        let books = client_for(&base_url)
            .books_by_category("hardcover-fiction")
            .await
            .unwrap();

        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Beloved", "Unranked"]);
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = NytClient::new(
            "https://api.example.com/svc/books/v3/",
            "key",
            Duration::from_secs(1),
            RetryPolicy::none(),
        )
        .unwrap();

        assert_eq!(
            client.url("lists/names.json"),
            "https://api.example.com/svc/books/v3/lists/names.json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_typed_error() {
        // Port 9 (discard) on localhost refuses connections
        let client = NytClient::new(
            "http://127.0.0.1:9",
            "key",
            Duration::from_secs(2),
            RetryPolicy::none(),
        )
        .unwrap();

        let result = client.categories().await;

        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
