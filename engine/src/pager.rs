//! Catalog paging.
//!
//! Marketplaces list their offers page by page. The pager is a small state
//! machine: the caller asks it for the next cursor, performs the request
//! however it likes (sync or async), and feeds the page back. The engine
//! never does IO itself.
//!
//! # Termination
//!
//! - [`Termination::CursorExhausted`] - stop when the page carries no next cursor
//! - [`Termination::TotalReached`] - stop when the items received reach the
//!   total reported by the marketplace

use crate::error::{Error, Result};
use crate::universe::OfferUniverse;
use crate::OfferId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cursor sent with the first page request.
pub const INITIAL_CURSOR: &str = "";

/// How a marketplace signals the end of its listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// The last page has no (or an empty) next cursor
    CursorExhausted,
    /// Items received so far reach the reported total
    TotalReached,
}

/// One page of a catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Offer ids on this page
    pub items: Vec<OfferId>,
    /// Cursor for the following page
    pub next_cursor: Option<String>,
    /// Total listing size, when the marketplace reports one
    pub total: Option<u64>,
}

impl Page {
    /// Create a page.
    pub fn new<S: Into<OfferId>>(
        items: impl IntoIterator<Item = S>,
        next_cursor: Option<&str>,
        total: Option<u64>,
    ) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            next_cursor: next_cursor.map(str::to_string),
            total,
        }
    }
}

/// Whether more pages are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Complete,
}

/// Accumulates pages into an [`OfferUniverse`].
#[derive(Debug, Clone)]
pub struct CatalogPager {
    termination: Termination,
    universe: OfferUniverse,
    cursor: String,
    visited: HashSet<String>,
    received: u64,
    pages: usize,
    complete: bool,
}

impl CatalogPager {
    /// Create a pager starting at [`INITIAL_CURSOR`].
    pub fn new(termination: Termination) -> Self {
        Self {
            termination,
            universe: OfferUniverse::new(),
            cursor: INITIAL_CURSOR.to_string(),
            visited: HashSet::from([INITIAL_CURSOR.to_string()]),
            received: 0,
            pages: 0,
            complete: false,
        }
    }

    /// The cursor to request next, or `None` once paging is complete.
    pub fn cursor(&self) -> Option<&str> {
        if self.complete {
            None
        } else {
            Some(&self.cursor)
        }
    }

    /// Number of pages absorbed so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Check if paging has finished.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Fold a page into the universe.
    ///
    /// Fails with [`Error::PagingStalled`] when the page cannot make progress
    /// (an empty page that does not finish the listing, or a next cursor that
    /// was already requested).
    pub fn absorb(&mut self, page: Page) -> Result<Progress> {
        if self.complete {
            return Err(Error::PagingComplete);
        }

        self.pages += 1;
        self.received += page.items.len() as u64;
        let page_was_empty = page.items.is_empty();
        self.universe.extend(page.items);

        let next = page.next_cursor.filter(|c| !c.is_empty());

        let done = match self.termination {
            Termination::CursorExhausted => next.is_none(),
            // Overshooting the total is treated as done, never as "keep going".
            Termination::TotalReached => page.total.is_some_and(|total| self.received >= total),
        };

        if done {
            self.complete = true;
            return Ok(Progress::Complete);
        }

        if page_was_empty {
            return Err(self.stalled("empty page before end of listing"));
        }

        match next {
            Some(cursor) if self.visited.contains(&cursor) => {
                Err(self.stalled(format!("cursor {:?} repeated", cursor)))
            }
            Some(cursor) => {
                self.visited.insert(cursor.clone());
                self.cursor = cursor;
                Ok(Progress::Continue)
            }
            None => Err(self.stalled("no cursor before total reached")),
        }
    }

    /// Consume the pager, returning the collected universe.
    pub fn into_universe(self) -> OfferUniverse {
        self.universe
    }

    /// Drive paging with a synchronous fetch function.
    ///
    /// Fetch errors abort paging immediately and are returned unchanged.
    pub fn drain<F, E>(termination: Termination, mut fetch: F) -> std::result::Result<OfferUniverse, E>
    where
        F: FnMut(&str) -> std::result::Result<Page, E>,
        E: From<Error>,
    {
        let mut pager = Self::new(termination);
        while let Some(cursor) = pager.cursor() {
            let page = fetch(cursor)?;
            pager.absorb(page)?;
        }
        Ok(pager.into_universe())
    }

    fn stalled(&self, reason: impl Into<String>) -> Error {
        Error::PagingStalled {
            pages: self.pages,
            reason: reason.into(),
        }
    }
}
