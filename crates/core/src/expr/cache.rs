//! The cache of compiled expressions.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use crate::err::Error;
use crate::expr::ExprWithType;

/// The outcome of compiling an expression, shared between every caller
/// which compiles the same expression for the same collection.
pub type Outcome = Arc<Result<ExprWithType, Error>>;

/// Identifies a compiled expression.
///
/// The expression text is used as it was received, no normalisation of
/// whitespace or equivalent spellings takes place.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParseKey {
	pub collection_name: String,
	pub expr: String,
}

impl ParseKey {
	pub fn new(collection_name: impl Into<String>, expr: impl Into<String>) -> Self {
		Self {
			collection_name: collection_name.into(),
			expr: expr.into(),
		}
	}
}

struct Entry {
	inserted: Instant,
	outcome: Outcome,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
	pub hits: u64,
	pub misses: u64,
}

/// A bounded, least recently used cache whose entries expire a fixed time
/// after they were stored.
pub struct ExprCache {
	entries: Mutex<LruCache<ParseKey, Entry>>,
	ttl: Duration,
	hits: AtomicU64,
	misses: AtomicU64,
}

impl ExprCache {
	/// Create a cache holding at most `capacity` outcomes, at least one.
	pub fn new(capacity: usize, ttl: Duration) -> Self {
		let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
		Self {
			entries: Mutex::new(LruCache::new(capacity)),
			ttl,
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
		}
	}

	/// Fetch a stored outcome, dropping it if it outlived the time to live.
	pub fn get(&self, key: &ParseKey) -> Option<Outcome> {
		let mut entries = self.entries.lock();
		let (found, expired) = match entries.get(key) {
			Some(entry) if entry.inserted.elapsed() < self.ttl => (Some(entry.outcome.clone()), false),
			Some(_) => (None, true),
			None => (None, false),
		};
		if expired {
			entries.pop(key);
		}
		drop(entries);
		match found {
			Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
			None => self.misses.fetch_add(1, Ordering::Relaxed),
		};
		found
	}

	/// Store an outcome, evicting the least recently used one when full.
	pub fn insert(&self, key: ParseKey, outcome: Outcome) {
		self.entries.lock().put(
			key,
			Entry {
				inserted: Instant::now(),
				outcome,
			},
		);
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn capacity(&self) -> usize {
		self.entries.lock().cap().get()
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Drop every stored outcome. Statistics are kept.
	pub fn clear(&self) {
		self.entries.lock().clear();
	}

	pub fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
		}
	}
}
