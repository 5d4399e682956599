//! Lazy, paged result streaming over server-side cursors.
//!
//! A [`Cursor`] yields the records of the response that started a query,
//! then pulls further pages with `PUT /cursor/{id}` while the server reports
//! `hasMore`. Once the last page has been consumed the server-side cursor is
//! deleted, and any failure of that deletion is reported only after every
//! record has been handed out.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{self, Stream};
use serde_json::Value;
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::error::{ArangoError, Result};
use crate::transport::HttpResponse;

/// One page of a cursor response
struct Page {
    records: VecDeque<Value>,
    has_more: bool,
    id: Option<String>,
}

impl Page {
    fn parse(response: &HttpResponse) -> Result<Self> {
        let records = match response.get("result") {
            Some(Value::Array(records)) => records.iter().cloned().collect(),
            _ => {
                return Err(ArangoError::InvalidResponse(
                    "cursor response has no `result` array".to_string(),
                ))
            }
        };
        let has_more = response
            .get("hasMore")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let id = match response.get("id") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        Ok(Self {
            records,
            has_more,
            id,
        })
    }
}

/// Forward-only, single-pass sequence of query results
pub struct Cursor {
    conn: Arc<Connection>,
    database: String,
    batch: VecDeque<Value>,
    has_more: bool,
    /// Id reported by the most recent page
    reported_id: Option<String>,
    /// Id captured when the server first signalled more data
    id: Option<String>,
    /// A captured server cursor that has not been deleted yet
    server_open: bool,
    exhausted: bool,
    count: Option<u64>,
    extra: Option<Value>,
}

impl Cursor {
    /// Wraps the OK response of a cursor-producing request.
    pub fn from_response(
        conn: Arc<Connection>,
        database: impl Into<String>,
        response: &HttpResponse,
    ) -> Result<Self> {
        let page = Page::parse(response)?;
        Ok(Self {
            conn,
            database: database.into(),
            batch: page.records,
            has_more: page.has_more,
            reported_id: page.id,
            id: None,
            server_open: false,
            exhausted: false,
            count: response.get("count").and_then(Value::as_u64),
            extra: response.get("extra").cloned(),
        })
    }

    /// Server cursor id, known once the server signalled more pages.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Total result count, present when the query asked for `count`.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Number of matches before the final LIMIT, when `fullCount` was requested.
    pub fn full_count(&self) -> Option<u64> {
        self.extra
            .as_ref()
            .and_then(|extra| extra.get("stats"))
            .and_then(|stats| stats.get("fullCount"))
            .and_then(Value::as_u64)
    }

    /// Query statistics and warnings reported with the first page.
    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Records buffered locally that `next` returns without a network call.
    pub fn buffered(&self) -> usize {
        self.batch.len()
    }

    /// Returns the next record, fetching a new page when the buffer runs dry.
    ///
    /// After `Ok(None)` or an error the cursor stays finished.
    pub async fn next(&mut self) -> Result<Option<Value>> {
        loop {
            if let Some(record) = self.batch.pop_front() {
                return Ok(Some(record));
            }
            if self.exhausted {
                return Ok(None);
            }
            if self.has_more {
                let fetched = self.fetch_next_page().await;
                if fetched.is_err() {
                    self.exhausted = true;
                }
                fetched?;
            } else {
                self.exhausted = true;
                self.release().await?;
                return Ok(None);
            }
        }
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let id = match &self.id {
            Some(id) => id.clone(),
            None => {
                let id = self.reported_id.clone().ok_or_else(|| {
                    ArangoError::InvalidResponse("cursor has more results but no id".to_string())
                })?;
                self.id = Some(id.clone());
                self.server_open = true;
                id
            }
        };

        let response = self
            .conn
            .put(&self.database, format!("/cursor/{}", id))
            .send()
            .await?;
        if response.status_code != 200 {
            return Err(ArangoError::server("fetch cursor page", &response));
        }

        let page = Page::parse(&response)?;
        debug!(cursor_id = %id, records = page.records.len(), has_more = page.has_more, "Fetched cursor page");
        self.batch = page.records;
        self.has_more = page.has_more;
        if page.id.is_some() {
            self.reported_id = page.id;
        }
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        if !self.server_open {
            return Ok(());
        }
        self.server_open = false;
        let Some(id) = self.id.clone() else {
            return Ok(());
        };

        let response = self
            .conn
            .delete(&self.database, format!("/cursor/{}", id))
            .send()
            .await?;
        match response.status_code {
            404 | 202 => {
                debug!(cursor_id = %id, status = response.status_code, "Released cursor");
                Ok(())
            }
            _ => Err(ArangoError::server("delete cursor", &response)),
        }
    }

    /// Stops iteration early and deletes the server-side cursor if one is open.
    pub async fn close(mut self) -> Result<()> {
        self.batch.clear();
        self.exhausted = true;
        if self.id.is_none() && self.has_more {
            self.id = self.reported_id.clone();
            self.server_open = self.id.is_some();
        }
        self.release().await
    }

    /// Drains every remaining record into a vector.
    pub async fn collect_all(mut self) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Turns the cursor into a `Stream` of records.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        stream::unfold(self, |mut cursor| async move {
            match cursor.next().await {
                Ok(Some(record)) => Some((Ok(record), cursor)),
                Ok(None) => None,
                Err(e) => Some((Err(e), cursor)),
            }
        })
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("database", &self.database)
            .field("id", &self.id)
            .field("buffered", &self.batch.len())
            .field("has_more", &self.has_more)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        let leaked = if self.server_open {
            self.id.as_deref()
        } else if self.has_more && !self.exhausted {
            self.reported_id.as_deref()
        } else {
            None
        };
        if let Some(id) = leaked {
            warn!(
                cursor_id = %id,
                database = %self.database,
                "Cursor dropped before exhaustion, server-side cursor left to expire"
            );
        }
    }
}
