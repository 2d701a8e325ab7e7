use crate::domain::CtdReading;
use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    mutex::{Mutex, MutexGuard, TryLockError},
};

/// The process-wide CTD record, guarded by its own short-lived lock.
///
/// The acquisition driver is the only writer. Everybody else gets a
/// [`ReadingHandle`] and works on copies, so a half-written record is never
/// observed.
pub struct SharedReading<M: RawMutex> {
    reading: Mutex<M, CtdReading>,
}

impl<M: RawMutex> SharedReading<M> {
    pub const fn new() -> Self {
        Self {
            reading: Mutex::new(CtdReading::new()),
        }
    }

    pub fn handle(&self) -> ReadingHandle<'_, M> {
        ReadingHandle {
            handle: &self.reading,
        }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, M, CtdReading> {
        self.reading.lock().await
    }
}

impl<M: RawMutex> Default for SharedReading<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only access to a [`SharedReading`].
pub struct ReadingHandle<'a, M: RawMutex> {
    handle: &'a Mutex<M, CtdReading>,
}

impl<'a, M: RawMutex> Clone for ReadingHandle<'a, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, M: RawMutex> Copy for ReadingHandle<'a, M> {}

impl<'a, M: RawMutex> ReadingHandle<'a, M> {
    /// Copy of the record, waiting for an in-progress update to finish.
    pub async fn snapshot(&self) -> CtdReading {
        *self.handle.lock().await
    }

    /// Copy of the record, or an error if it is being updated right now.
    pub fn try_snapshot(&self) -> Result<CtdReading, TryLockError> {
        let guard = self.handle.try_lock()?;
        Ok(*guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use futures::executor::block_on;

    #[test]
    fn test_snapshot_sees_committed_update() {
        let shared: SharedReading<NoopRawMutex> = SharedReading::new();
        let handle = shared.handle();
        assert_eq!(Status::Invalid, handle.try_snapshot().unwrap().status());

        block_on(async {
            shared.lock().await.set_status(Status::Silence);
            assert_eq!(Status::Silence, handle.snapshot().await.status());
        });
    }

    #[test]
    fn test_try_snapshot_refuses_while_locked() {
        let shared: SharedReading<NoopRawMutex> = SharedReading::new();
        let handle = shared.handle();

        block_on(async {
            let _guard = shared.lock().await;
            assert!(handle.try_snapshot().is_err());
        });
        assert!(handle.try_snapshot().is_ok());
    }
}
