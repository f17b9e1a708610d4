//! Paginated query fetcher
//!
//! Drives page-by-page submissions of a detail query until the cumulative
//! page cursor reaches the server-reported `totalHits`, and single-shot
//! submissions for aggregate queries. Pages are requested strictly in
//! sequence: whether page N+1 is needed is only known once page N is back.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::client::{QueryClient, RemoteError};
use crate::models::{
    AggregateRecord, ConversationRecord, Paging, QueryError, QueryKind, QueryRequest,
    QueryResultPage,
};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),
    #[error("query for page {page} failed: {source}")]
    Remote {
        page: u32,
        #[source]
        source: RemoteError,
    },
}

/// Records gathered by one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<R> {
    /// Records in the order the server returned them
    pub records: Vec<R>,
    /// Number of submissions made
    pub pages: u32,
    /// False when the fetch stopped early on a page without usable data
    pub complete: bool,
}

impl<R> FetchOutcome<R> {
    fn new(records: Vec<R>, pages: u32, complete: bool) -> Self {
        Self {
            records,
            pages,
            complete,
        }
    }
}

pub struct Fetcher<'a, C: QueryClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: QueryClient + ?Sized> Fetcher<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch every page of a conversation detail query.
    ///
    /// `base.paging` supplies the page size; its page number is ignored and
    /// the loop numbers pages from 1. A failed submission aborts the fetch.
    pub async fn fetch_conversation_details(
        &self,
        base: &QueryRequest,
    ) -> Result<FetchOutcome<ConversationRecord>, FetchError> {
        let kind = QueryKind::ConversationDetails;
        base.validate(kind)?;
        let page_size = base.paging.map(|p| p.page_size).ok_or(QueryError::MissingPaging)?;

        let mut request = base.clone();
        let mut paging = Paging::new(page_size);
        let mut records = Vec::new();

        loop {
            paging.page_number += 1;
            request.paging = Some(paging);

            let page = self.submit(kind, &request, paging.page_number).await?;

            let Some(conversations) = page.conversations else {
                warn!(
                    "No conversation details returned for page {}",
                    paging.page_number
                );
                return Ok(FetchOutcome::new(records, paging.page_number, false));
            };

            let received = conversations.len();
            records.extend(conversations);

            // A page without totalHits ends the loop, same as a zero total.
            let total_hits = page.total_hits.unwrap_or(0);
            debug!(
                "Page {} returned {} conversations ({} of {} total)",
                paging.page_number,
                received,
                records.len(),
                total_hits
            );

            if u64::from(paging.page_number) * u64::from(page_size) >= total_hits {
                break;
            }

            if received == 0 {
                warn!(
                    "Page {} was empty but {} conversations remain, stopping",
                    paging.page_number,
                    total_hits.saturating_sub(records.len() as u64)
                );
                return Ok(FetchOutcome::new(records, paging.page_number, false));
            }
        }

        info!(
            "Fetched {} conversations in {} pages",
            records.len(),
            paging.page_number
        );
        Ok(FetchOutcome::new(records, paging.page_number, true))
    }

    /// Submit a bot aggregate query; the endpoint answers in a single page.
    pub async fn fetch_bot_aggregates(
        &self,
        request: &QueryRequest,
    ) -> Result<FetchOutcome<AggregateRecord>, FetchError> {
        let kind = QueryKind::BotAggregates;
        request.validate(kind)?;

        let page = self.submit(kind, request, 1).await?;

        match page.results {
            Some(results) => {
                info!("Fetched {} bot aggregate results", results.len());
                Ok(FetchOutcome::new(results, 1, true))
            }
            None => {
                warn!("No bot aggregates returned");
                Ok(FetchOutcome::new(Vec::new(), 1, false))
            }
        }
    }

    async fn submit(
        &self,
        kind: QueryKind,
        request: &QueryRequest,
        page: u32,
    ) -> Result<QueryResultPage, FetchError> {
        self.client.submit(kind, request).await.map_err(|source| {
            error!("An error occurred while querying page {page}: {source}");
            if let Some(payload) = source.payload() {
                debug!("Platform returned error payload: {payload:#}");
            }
            FetchError::Remote { page, source }
        })
    }
}
