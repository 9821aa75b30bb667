//! Pooled message carriers
//!
//! The pool bounds how many messages may be in flight at once. Acquiring a
//! pack waits for a free slot; recycling a pack hands its slot back. A pack
//! dropped without being recycled also frees its slot, but is not counted as
//! recycled.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::error::PipelineError;
use super::message::Message;

/// Per-message substitution values keyed by placeholder name
pub type Captures = HashMap<String, String>;

/// Fixed-size pool of pipeline packs
#[derive(Clone, Debug)]
pub struct PackPool {
    slots: Arc<Semaphore>,
    recycled: Arc<AtomicU64>,
    size: usize,
}

impl PackPool {
    pub fn new(size: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(size)),
            recycled: Arc::new(AtomicU64::new(0)),
            size,
        }
    }

    /// Wait for a free slot and wrap the message in a pack
    pub async fn acquire(&self, message: Message) -> Result<PipelinePack, PipelineError> {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| PipelineError::PoolClosed)?;

        Ok(PipelinePack {
            message,
            _permit: permit,
            recycled: self.recycled.clone(),
        })
    }

    /// Stop handing out packs; pending and future acquires fail
    pub fn close(&self) {
        self.slots.close();
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of free slots
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Total packs returned through `PipelinePack::recycle`
    pub fn recycled(&self) -> u64 {
        self.recycled.load(Ordering::Relaxed)
    }
}

/// A message checked out of the pool
#[derive(Debug)]
pub struct PipelinePack {
    pub message: Message,
    _permit: OwnedSemaphorePermit,
    recycled: Arc<AtomicU64>,
}

impl PipelinePack {
    /// Release the pack back to the pool
    pub fn recycle(self) {
        self.recycled.fetch_add(1, Ordering::Relaxed);
    }
}

/// One unit of input for a filter stage
#[derive(Debug)]
pub struct WorkItem {
    pub pack: PipelinePack,
    /// Match captures supplied by the upstream router, if any
    pub captures: Option<Captures>,
}

impl WorkItem {
    pub fn new(pack: PipelinePack) -> Self {
        Self {
            pack,
            captures: None,
        }
    }

    pub fn with_captures(pack: PipelinePack, captures: Captures) -> Self {
        Self {
            pack,
            captures: Some(captures),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_acquire_takes_slot() {
        let pool = PackPool::new(2);
        assert_eq!(pool.available(), 2);

        let pack = pool.acquire(Message::default()).await.unwrap();
        assert_eq!(pool.available(), 1);

        pack.recycle();
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.recycled(), 1);
    }

    #[tokio::test]
    async fn test_drop_frees_slot_without_counting() {
        let pool = PackPool::new(1);
        let pack = pool.acquire(Message::default()).await.unwrap();
        drop(pack);

        assert_eq!(pool.available(), 1);
        assert_eq!(pool.recycled(), 0);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_recycle() {
        let pool = PackPool::new(1);
        let first = pool.acquire(Message::default()).await.unwrap();

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire(Message::default()).await })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        first.recycle();
        let second = tokio::time::timeout(Duration::from_millis(100), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_acquire() {
        let pool = PackPool::new(1);
        pool.close();

        let result = pool.acquire(Message::default()).await;
        assert!(matches!(result, Err(PipelineError::PoolClosed)));
    }

    #[tokio::test]
    async fn test_work_item_captures() {
        let pool = PackPool::new(2);
        let item = WorkItem::new(pool.acquire(Message::default()).await.unwrap());
        assert!(item.captures.is_none());

        let mut captures = Captures::new();
        captures.insert("status".to_string(), "404".to_string());
        let item = WorkItem::with_captures(pool.acquire(Message::default()).await.unwrap(), captures);
        assert_eq!(item.captures.unwrap().get("status").unwrap(), "404");
    }
}
