//! Bounded, deadline-aware acquisition of every tile in a rectangle.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use metrics::counter;
use projection::TileRect;
use tile_source::{TileImage, TileSource};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Tiles that arrived in time, plus how many did not.
#[derive(Debug, Default)]
pub struct FetchedTiles {
    pub tiles: Vec<TileImage>,
    pub missing: usize,
    pub timed_out: bool,
}

/// Fetch the tiles of `rect` with at most `concurrency` requests in flight.
///
/// At most `budget` tiles are requested, in `rect.iter()` order; the rest are
/// counted as missing. Tiles arrive in completion order. When `deadline`
/// elapses the remaining requests are dropped and counted as missing.
pub async fn fetch_tiles(
    source: &dyn TileSource,
    rect: &TileRect,
    concurrency: usize,
    budget: usize,
    deadline: Option<Duration>,
) -> FetchedTiles {
    let total = rect.len();
    let requested = total.min(budget);
    let expires = deadline.map(|d| Instant::now() + d);

    if requested < total {
        let skipped = total - requested;
        counter!("route_map_tiles_missing_total", "reason" => "budget").increment(skipped as u64);
        warn!(
            source = source.name(),
            total,
            budget,
            "Tile rectangle exceeds the fetch budget, leaving {} slots blank",
            skipped
        );
    }

    let mut pending = stream::iter(rect.iter().take(requested))
        .map(|coord| source.fetch_tile(coord))
        .buffer_unordered(concurrency.max(1));

    let mut tiles = Vec::with_capacity(requested);
    let mut unavailable = 0;
    let mut timed_out = false;

    loop {
        let next = match expires {
            Some(at) => match timeout_at(at, pending.next()).await {
                Ok(next) => next,
                Err(_) => {
                    timed_out = true;
                    break;
                }
            },
            None => pending.next().await,
        };

        match next {
            Some(Some(tile)) => tiles.push(tile),
            Some(None) => unavailable += 1,
            None => break,
        }
    }

    let missing = total - tiles.len();
    if timed_out {
        // unavailable and over-budget tiles were already counted
        let abandoned = requested - tiles.len() - unavailable;
        counter!("route_map_tiles_missing_total", "reason" => "deadline")
            .increment(abandoned as u64);
        warn!(
            source = source.name(),
            received = tiles.len(),
            total,
            "Tile deadline elapsed, rendering with what arrived"
        );
    } else if missing > 0 {
        debug!(source = source.name(), missing, total, "Some tiles unavailable");
    }

    FetchedTiles {
        tiles,
        missing,
        timed_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{Rgba, RgbaImage};
    use route_common::TileCoord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves every tile except odd columns, tracking peak concurrency.
    struct CountingSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay: Duration,
    }

    impl CountingSource {
        fn new(delay: Duration) -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                delay,
            }
        }
    }

    #[async_trait]
    impl TileSource for CountingSource {
        async fn fetch_tile(&self, coord: TileCoord) -> Option<TileImage> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if coord.x % 2 == 1 {
                return None;
            }
            TileImage::new(coord, RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]))).ok()
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn rect() -> TileRect {
        TileRect {
            zoom: 5,
            min_x: 0,
            min_y: 0,
            max_x: 3,
            max_y: 2,
        }
    }

    #[tokio::test]
    async fn test_fetch_counts_missing_and_respects_concurrency() {
        let source = Arc::new(CountingSource::new(Duration::from_millis(5)));
        let fetched = fetch_tiles(source.as_ref(), &rect(), 3, usize::MAX, None).await;

        assert_eq!(fetched.tiles.len(), 6);
        assert_eq!(fetched.missing, 6);
        assert!(!fetched.timed_out);
        assert!(source.peak.load(Ordering::SeqCst) <= 3);
        assert!(fetched.tiles.iter().all(|t| t.coord().x % 2 == 0));
    }

    #[tokio::test]
    async fn test_deadline_abandons_slow_tiles() {
        let source = CountingSource::new(Duration::from_secs(30));
        let started = std::time::Instant::now();
        let deadline = Some(Duration::from_millis(50));
        let fetched = fetch_tiles(&source, &rect(), 4, usize::MAX, deadline).await;

        assert!(fetched.timed_out);
        assert!(fetched.tiles.is_empty());
        assert_eq!(fetched.missing, 12);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_progresses() {
        let source = CountingSource::new(Duration::ZERO);
        let fetched = fetch_tiles(&source, &rect(), 0, usize::MAX, None).await;
        assert_eq!(fetched.tiles.len() + fetched.missing, 12);
    }

    #[tokio::test]
    async fn test_budget_limits_requests_in_iteration_order() {
        let source = CountingSource::new(Duration::ZERO);
        let fetched = fetch_tiles(&source, &rect(), 2, 5, None).await;

        // first five tiles are columns 0 (rows 0..=2) and 1 (rows 0..=1);
        // column 1 is unavailable
        let mut served: Vec<_> = fetched
            .tiles
            .iter()
            .map(|t| (t.coord().x, t.coord().y))
            .collect();
        served.sort();
        assert_eq!(served, vec![(0, 0), (0, 1), (0, 2)]);
        assert_eq!(fetched.missing, 9);
        assert!(!fetched.timed_out);
    }
}
