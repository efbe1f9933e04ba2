use reqwest::{RequestBuilder, Response, StatusCode};

use crate::backend::{BackendError, ObservanceBackend};
use crate::models::{PrayerRecord, PrayerStatus};

/// REST client for the observance backend.
pub struct ObservanceClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl ObservanceClient {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_records(&self, request: RequestBuilder) -> Result<Vec<PrayerRecord>, BackendError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_for(response).await);
        }
        Ok(response.json().await?)
    }
}

async fn error_for(response: Response) -> BackendError {
    match response.status() {
        StatusCode::BAD_REQUEST => {
            let message = response.text().await.unwrap_or_default();
            BackendError::BadRequest(message)
        }
        StatusCode::NOT_FOUND => BackendError::NotFound,
        status => BackendError::Server(status.as_u16()),
    }
}

impl ObservanceBackend for ObservanceClient {
    async fn fetch_day(
        &self,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Vec<PrayerRecord>, BackendError> {
        let request = self.authorize(self.http.get(self.url("prayers")).query(&[
            ("year", year.to_string()),
            ("month", month.to_string()),
            ("day", day.to_string()),
        ]));
        self.fetch_records(request).await
    }

    async fn fetch_month(&self, year: i32, month: u32) -> Result<Vec<PrayerRecord>, BackendError> {
        let request = self.authorize(self.http.get(self.url("prayers")).query(&[
            ("year", year.to_string()),
            ("month", month.to_string()),
        ]));
        self.fetch_records(request).await
    }

    async fn update_status(&self, id: &str, status: PrayerStatus) -> Result<(), BackendError> {
        let request = self
            .authorize(self.http.patch(self.url(&format!("prayers/{}", id))))
            .json(&serde_json::json!({ "status": status }));

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_for(response).await);
        }
        Ok(())
    }
}
