use super::LibraryScanner;
use crate::config::PlexConfig;
use anyhow::Result;
use async_trait::async_trait;
use postdrop_common::MediaCategory;
use reqwest::Client;
use std::time::Duration;

const TOKEN_HEADER: &str = "X-Plex-Token";

/// One planned rescan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescanRequest {
    pub category: MediaCategory,
    pub section: u32,
    /// Upper bound on refresh calls.
    pub attempts: u32,
}

/// Plex library refresh client with a fixed-delay retry.
pub struct PlexNotifier {
    client: Client,
    base_url: String,
    token: String,
    show_section: u32,
    movie_section: u32,
    attempts: u32,
    retry_delay: Duration,
}

impl PlexNotifier {
    pub fn new(config: &PlexConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            show_section: config.show_section,
            movie_section: config.movie_section,
            attempts: config.retry_attempts.max(1),
            retry_delay: config.retry_delay(),
        }
    }

    /// Override the delay between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Library section for a category; `None` for Unknown.
    pub fn section_for(&self, category: MediaCategory) -> Option<u32> {
        match category {
            MediaCategory::Tv => Some(self.show_section),
            MediaCategory::Movie => Some(self.movie_section),
            MediaCategory::Unknown => None,
        }
    }

    /// The rescan a category maps to; `None` for Unknown.
    pub fn rescan_request(&self, category: MediaCategory) -> Option<RescanRequest> {
        self.section_for(category).map(|section| RescanRequest {
            category,
            section,
            attempts: self.attempts,
        })
    }

    /// Rescan the section for a category name such as `"show"` or `"movie"`.
    ///
    /// Unrecognized names fail immediately without touching the network.
    pub async fn trigger_scan(&self, category: &str) -> bool {
        match category.parse::<MediaCategory>() {
            Ok(category) => self.scan_category(category).await,
            Err(_) => {
                tracing::error!("Unknown library category '{}'; no rescan", category);
                false
            }
        }
    }

    /// Refresh one section, retrying with a fixed delay until the first
    /// success or the attempt limit.
    pub async fn trigger_section(&self, section: u32) -> bool {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.refresh_section(section).await {
                Ok(()) => {
                    tracing::info!(section, attempt, "Library rescan triggered");
                    return true;
                }
                Err(e) => {
                    tracing::warn!(
                        section,
                        attempt,
                        max_attempts = self.attempts,
                        "Library rescan failed: {}",
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        if let Some(e) = last_error {
            tracing::error!(
                section,
                "Giving up on library rescan after {} attempts: {}",
                self.attempts,
                e
            );
        }
        false
    }

    /// Single refresh request; any non-2xx status is an error.
    pub async fn refresh_section(&self, section: u32) -> Result<()> {
        let url = format!("{}/library/sections/{}/refresh", self.base_url, section);

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Plex refresh failed ({}): {}", status, body);
        }

        Ok(())
    }

    /// Test connectivity and the token against the identity endpoint.
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/identity", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl LibraryScanner for PlexNotifier {
    fn name(&self) -> &str {
        "plex"
    }

    async fn scan_category(&self, category: MediaCategory) -> bool {
        match self.rescan_request(category) {
            Some(request) => {
                tracing::info!(
                    category = %request.category,
                    section = request.section,
                    max_attempts = request.attempts,
                    "Requesting library rescan"
                );
                self.trigger_section(request.section).await
            }
            None => {
                tracing::error!("No library section for category '{}'; no rescan", category);
                false
            }
        }
    }
}
