use crate::Quote;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A seconds-scale, in-process quote cache.
///
/// Exists to absorb repeated lookups within a single command invocation.
/// Nothing here is ever persisted; a fresh process always starts cold.
#[derive(Debug)]
pub struct QuoteCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Quote, Instant)>>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached quote for a symbol if it is still fresh.
    pub fn get(&self, symbol: &str) -> Option<Quote> {
        let entries = self.entries.lock().expect("quote cache mutex poisoned");
        entries.get(symbol).and_then(|(quote, fetched_at)| {
            if fetched_at.elapsed() < self.ttl {
                Some(quote.clone())
            } else {
                None
            }
        })
    }

    /// Stores a freshly fetched quote.
    pub fn insert(&self, quote: Quote) {
        let mut entries = self.entries.lock().expect("quote cache mutex poisoned");
        entries.insert(quote.symbol.clone(), (quote, Instant::now()));
    }
}
