//! Google Sheets client
//!
//! Targets are opened by name through a Drive files search; values are read
//! and written with the Sheets v4 values API.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use guild_core::value_objects::Cell;

use super::auth::{ServiceAccountKey, TokenSource};
use super::{SheetClient, SheetTable};
use crate::error::{SinkError, SinkResult};

pub const DRIVE_API: &str = "https://www.googleapis.com/drive/v3/";
pub const SHEETS_API: &str = "https://sheets.googleapis.com/v4/";

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: SheetTable,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: &'a [Vec<Cell>],
}

/// A1 reference to `range` inside `view`, e.g. `'Last TB Data'!A2:G51`
pub fn a1_range(view: &str, range: Option<&str>) -> String {
    let quoted = format!("'{}'", view.replace('\'', "''"));
    match range {
        Some(range) => format!("{quoted}!{range}"),
        None => quoted,
    }
}

/// Drive search expression matching a spreadsheet by exact name
pub fn name_query(target: &str) -> String {
    let escaped = target.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name = '{escaped}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false")
}

/// Sheets client authenticated as a service account
#[derive(Debug)]
pub struct GoogleSheetsClient {
    http: Client,
    auth: TokenSource,
    drive_api: Url,
    sheets_api: Url,
    /// Spreadsheet ids by target name, resolved at most once per process
    spreadsheet_ids: Mutex<HashMap<String, String>>,
}

impl GoogleSheetsClient {
    /// Create a client from a service account key file
    pub fn from_credentials_file(path: &Path) -> SinkResult<Self> {
        let key = ServiceAccountKey::from_file(path)?;
        Self::new(key, DRIVE_API, SHEETS_API)
    }

    pub fn new(key: ServiceAccountKey, drive_api: &str, sheets_api: &str) -> SinkResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SinkError::Api(e.to_string()))?;
        let parse = |url: &str| Url::parse(url).map_err(|e| SinkError::Api(format!("{url}: {e}")));
        let auth = TokenSource::new(http.clone(), key)?;

        debug!(account = %auth.client_email(), "Created sheets client");
        Ok(Self {
            drive_api: parse(drive_api)?,
            sheets_api: parse(sheets_api)?,
            http,
            auth,
            spreadsheet_ids: Mutex::new(HashMap::new()),
        })
    }

    fn endpoint(base: &Url, segments: &[&str]) -> SinkResult<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| SinkError::Api(format!("{base} cannot be a base URL")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authorized(&self, method: Method, url: Url) -> SinkResult<RequestBuilder> {
        let token = self.auth.token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send(request: RequestBuilder) -> SinkResult<Response> {
        request.send().await.map_err(|e| {
            error!(error = ?e, "Sink request failed");
            SinkError::Api(e.to_string())
        })
    }

    /// Map a non-success values API response to a sink error
    async fn status_error(&self, response: Response, target: &str, view: &str) -> SinkError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                self.spreadsheet_ids.lock().remove(target);
                warn!(target_name = target, status = %status, "Sink target is non-existent or inaccessible");
                SinkError::TargetNotFound(target.to_owned())
            }
            StatusCode::BAD_REQUEST if body.contains("Unable to parse range") => {
                warn!(target_name = target, view, "View is non-existent or inaccessible");
                SinkError::ViewNotFound {
                    target: target.to_owned(),
                    view: view.to_owned(),
                }
            }
            _ => {
                error!(target_name = target, view, status = %status, error = %body, "Sink API error");
                SinkError::Api(format!("status {status}: {body}"))
            }
        }
    }

    /// Resolve a target name to its spreadsheet id
    #[instrument(skip(self))]
    async fn spreadsheet_id(&self, target: &str) -> SinkResult<String> {
        let known = self.spreadsheet_ids.lock().get(target).cloned();
        if let Some(id) = known {
            return Ok(id);
        }

        let url = Self::endpoint(&self.drive_api, &["files"])?;
        let query = name_query(target);
        let request = self.authorized(Method::GET, url).await?.query(&[
            ("q", query.as_str()),
            ("fields", "files(id)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);
        let response = Self::send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %body, "Drive search failed");
            return Err(SinkError::Api(format!("drive search returned {status}")));
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|e| SinkError::Api(format!("Failed to parse drive search: {e}")))?;
        let Some(file) = list.files.into_iter().next() else {
            warn!("Sink target is non-existent or not shared with the service account");
            return Err(SinkError::TargetNotFound(target.to_owned()));
        };

        debug!(spreadsheet_id = %file.id, "Resolved sink target");
        self.spreadsheet_ids
            .lock()
            .insert(target.to_owned(), file.id.clone());
        Ok(file.id)
    }

    async fn values_url(&self, target: &str, a1: &str, suffix: &str) -> SinkResult<Url> {
        let id = self.spreadsheet_id(target).await?;
        Self::endpoint(
            &self.sheets_api,
            &["spreadsheets", &id, "values", &format!("{a1}{suffix}")],
        )
    }
}

#[async_trait]
impl SheetClient for GoogleSheetsClient {
    #[instrument(skip(self))]
    async fn read_all(&self, target: &str, view: &str) -> SinkResult<SheetTable> {
        let url = self.values_url(target, &a1_range(view, None), "").await?;
        let request = self
            .authorized(Method::GET, url)
            .await?
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")]);
        let response = Self::send(request).await?;
        if !response.status().is_success() {
            return Err(self.status_error(response, target, view).await);
        }

        let values: ValueRange = response
            .json()
            .await
            .map_err(|e| SinkError::Api(format!("Failed to parse values: {e}")))?;
        debug!(rows = values.values.len(), "Read view");
        Ok(values.values)
    }

    #[instrument(skip(self))]
    async fn clear_range(&self, target: &str, view: &str, range: &str) -> SinkResult<()> {
        let url = self
            .values_url(target, &a1_range(view, Some(range)), ":clear")
            .await?;
        let request = self
            .authorized(Method::POST, url)
            .await?
            .json(&serde_json::json!({}));
        let response = Self::send(request).await?;
        if !response.status().is_success() {
            return Err(self.status_error(response, target, view).await);
        }
        Ok(())
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn write_range(
        &self,
        target: &str,
        view: &str,
        range: &str,
        rows: &[Vec<Cell>],
    ) -> SinkResult<()> {
        let a1 = a1_range(view, Some(range));
        let url = self.values_url(target, &a1, "").await?;
        let body = ValueRangeBody {
            range: &a1,
            major_dimension: "ROWS",
            values: rows,
        };
        let request = self
            .authorized(Method::PUT, url)
            .await?
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        let response = Self::send(request).await?;
        if !response.status().is_success() {
            return Err(self.status_error(response, target, view).await);
        }
        Ok(())
    }
}
