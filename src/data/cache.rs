//! Process-lifetime cache for the fetched series.
//!
//! The fetch takes no parameters, so the cache is a single slot: the first
//! successful `get` stores the series and every later call hands out a shared
//! reference to it. Staleness is accepted for the life of the process; a new
//! process is the only invalidation.

use std::sync::{Arc, Mutex};

use crate::data::tracking::SeriesSource;
use crate::domain::DailySeries;
use crate::error::AppError;

pub struct SeriesCache<S> {
    source: S,
    // The lock is held across the fetch, so concurrent callers wait for the
    // first in-flight request instead of issuing their own (single-flight).
    slot: Mutex<Option<Arc<DailySeries>>>,
}

impl<S: SeriesSource> SeriesCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached series, fetching it on first use.
    ///
    /// A failed fetch is not cached: the slot stays empty and the next call
    /// retries the source.
    pub fn get(&self) -> Result<Arc<DailySeries>, AppError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| AppError::Io("Series cache lock poisoned.".to_string()))?;

        if let Some(series) = slot.as_ref() {
            return Ok(Arc::clone(series));
        }

        let series = Arc::new(self.source.fetch()?);
        *slot = Some(Arc::clone(&series));
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;

    use crate::domain::DailyRecord;

    fn tiny_series() -> DailySeries {
        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        DailySeries::from_records(vec![DailyRecord {
            positive: Some(10.0),
            ..DailyRecord::new(date)
        }])
    }

    /// Counts fetches; optionally fails the first `fail_first` of them.
    struct CountingSource {
        fetches: AtomicUsize,
        fail_first: usize,
    }

    impl CountingSource {
        fn new(fail_first: usize) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail_first,
            }
        }

        fn count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl SeriesSource for CountingSource {
        fn fetch(&self) -> Result<DailySeries, AppError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                Err(AppError::DataUnavailable("endpoint down".to_string()))
            } else {
                Ok(tiny_series())
            }
        }
    }

    #[test]
    fn repeated_gets_fetch_once_and_agree() {
        let cache = SeriesCache::new(CountingSource::new(0));

        let first = cache.get().unwrap();
        for _ in 0..10 {
            let again = cache.get().unwrap();
            assert!(Arc::ptr_eq(&first, &again));
        }
        assert_eq!(cache.source.count(), 1);
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let cache = SeriesCache::new(CountingSource::new(1));

        let err = cache.get().unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));

        // Retry reaches the source again and succeeds this time.
        let series = cache.get().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(cache.source.count(), 2);

        // Success is now cached.
        cache.get().unwrap();
        assert_eq!(cache.source.count(), 2);
    }

    #[test]
    fn concurrent_gets_fetch_once() {
        let cache = Arc::new(SeriesCache::new(CountingSource::new(0)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get().unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.source.count(), 1);
        for pair in results.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }
}
