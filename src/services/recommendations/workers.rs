use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, UserId},
};

/// One unit of neighbor work: what `neighbor` watched that the target did not
#[derive(Debug, Clone)]
pub struct NeighborTask {
    pub neighbor: UserId,
    /// Neighbor's distinct movies, in column order
    pub neighbor_items: Vec<MovieId>,
    pub target_items: Arc<HashSet<MovieId>>,
}

impl NeighborTask {
    /// Set difference, keeping the neighbor's order
    pub fn run(&self) -> Vec<MovieId> {
        self.neighbor_items
            .iter()
            .filter(|movie_id| !self.target_items.contains(movie_id))
            .copied()
            .collect()
    }
}

/// Bounded pool for neighbor tasks
///
/// Each task runs on the blocking thread pool while holding one of `size`
/// permits, so at most `size` set differences are computed at once no matter
/// how many requests are in flight.
#[derive(Debug, Clone)]
pub struct NeighborPool {
    permits: Arc<Semaphore>,
}

impl NeighborPool {
    pub fn new(size: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size.max(1))),
        }
    }

    #[cfg(test)]
    fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Runs every task and waits for all of them
    ///
    /// Results come back in submission order. A task that panics is a bug in
    /// the engine and fails the whole request.
    pub async fn run(&self, tasks: Vec<NeighborTask>) -> AppResult<Vec<Vec<MovieId>>> {
        self.spawn_all(tasks, |task| {
            let items = task.run();
            tracing::trace!(
                neighbor = task.neighbor,
                candidates = items.len(),
                "Neighbor task done"
            );
            items
        })
        .await
    }

    async fn spawn_all<T, R, F>(&self, jobs: Vec<T>, work: F) -> AppResult<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let work = Arc::new(work);
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs {
            let permit = self
                .permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(format!("Neighbor pool closed: {}", e)))?;

            let work = Arc::clone(&work);
            let handle = tokio::task::spawn_blocking(move || {
                let result = work(job);
                drop(permit);
                result
            });
            handles.push(handle);
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(error = %e, "Neighbor task join error");
                    return Err(AppError::Internal(format!("Neighbor task failed: {}", e)));
                }
            }
        }

        Ok(results)
    }
}
