//! Init-once slot shared by symbol bindings and library handles

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use super::LoadError;

/// A value that is initialised at most once
///
/// Reads after a successful initialisation are a single atomic load. The
/// initialiser runs under a mutex, so concurrent first callers block until it
/// finishes and then see its outcome. A failure is remembered together with
/// the configuration epoch it happened under: callers under the same epoch get
/// the same error back without re-running the initialiser, and a later epoch
/// gets a fresh attempt.
pub(crate) struct OnceSlot<T> {
  value: OnceCell<T>,
  failure: Mutex<Option<(u64, LoadError)>>,
}

impl<T> OnceSlot<T> {
  pub(crate) const fn new() -> Self {
    Self {
      value: OnceCell::new(),
      failure: parking_lot::const_mutex(None),
    }
  }

  #[inline]
  pub(crate) fn get(&self) -> Option<&T> {
    self.value.get()
  }

  /// Run `f` while holding the init lock, passing whether a value is bound
  ///
  /// Nothing can bind the slot while `f` runs.
  pub(crate) fn with_init_lock<R>(&self, f: impl FnOnce(bool) -> R) -> R {
    let _guard = self.failure.lock();
    f(self.value.get().is_some())
  }

  pub(crate) fn get_or_try_init<F>(&self, epoch: u64, init: F) -> Result<&T, LoadError>
  where
    F: FnOnce() -> Result<T, LoadError>,
  {
    if let Some(value) = self.value.get() {
      return Ok(value);
    }

    let mut failure = self.failure.lock();
    // Another caller may have finished while we waited on the lock
    if let Some(value) = self.value.get() {
      return Ok(value);
    }
    if let Some((failed_epoch, err)) = failure.as_ref() {
      if *failed_epoch == epoch {
        return Err(err.clone());
      }
    }

    match init() {
      Ok(value) => {
        *failure = None;
        Ok(self.value.get_or_init(|| value))
      }
      Err(err) => {
        *failure = Some((epoch, err.clone()));
        Err(err)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::loader::LibraryId;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn failure() -> LoadError {
    LoadError::AlreadyLoaded(LibraryId::Avutil)
  }

  #[test]
  fn test_success_is_cached() {
    let slot = OnceSlot::new();
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
      let value = slot
        .get_or_try_init(0, || {
          calls.fetch_add(1, Ordering::SeqCst);
          Ok(7)
        })
        .unwrap();
      assert_eq!(*value, 7);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(slot.get(), Some(&7));
  }

  #[test]
  fn test_failure_is_sticky_within_an_epoch() {
    let slot: OnceSlot<i32> = OnceSlot::new();
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
      let err = slot
        .get_or_try_init(4, || {
          calls.fetch_add(1, Ordering::SeqCst);
          Err(failure())
        })
        .unwrap_err();
      assert_eq!(err, failure());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(slot.get().is_none());
  }

  #[test]
  fn test_new_epoch_retries() {
    let slot = OnceSlot::new();

    assert!(slot.get_or_try_init(0, || Err(failure())).is_err());
    assert_eq!(*slot.get_or_try_init(1, || Ok("bound")).unwrap(), "bound");
    // Bound values ignore later epochs
    assert_eq!(*slot.get_or_try_init(2, || Err(failure())).unwrap(), "bound");
  }

  #[test]
  fn test_init_lock_reports_bound_state() {
    let slot = OnceSlot::new();
    assert!(!slot.with_init_lock(|bound| bound));

    slot.get_or_try_init(0, || Ok(1)).unwrap();
    assert!(slot.with_init_lock(|bound| bound));
  }

  #[test]
  fn test_init_waits_for_init_lock() {
    let slot = OnceSlot::new();
    let (entered_tx, entered_rx) = std::sync::mpsc::channel();

    crossbeam::thread::scope(|scope| {
      let slot = &slot;
      scope.spawn(move |_| {
        slot.with_init_lock(|bound| {
          assert!(!bound);
          entered_tx.send(()).unwrap();
          std::thread::sleep(std::time::Duration::from_millis(50));
          // Still unbound: the other thread is parked on the lock
          assert!(slot.get().is_none());
        });
      });

      entered_rx.recv().unwrap();
      assert_eq!(*slot.get_or_try_init(0, || Ok(9)).unwrap(), 9);
    })
    .unwrap();
  }
}
