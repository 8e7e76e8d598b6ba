//! Ambient tag-map carrier with scoped attachment.
//!
//! The current [`TagMap`] lives in a per-thread slot. Synchronous code attaches
//! a value with [`attach`] and gets back a [`Scope`] that restores the previous
//! value when released (or dropped). Async code wraps a future with
//! [`FutureExt::with_tags`], which re-attaches the value around every poll so
//! the tags follow the future across worker threads.
//!
//! Unrelated threads never observe each other's attached values.

use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::tags::TagMap;

thread_local! {
    static CURRENT: RefCell<TagMap> = RefCell::new(TagMap::empty());
}

/// Returns the tag map currently attached to this execution context.
pub fn current() -> TagMap {
    CURRENT.with(|c| c.borrow().clone())
}

/// Installs `tags` as the current value and returns the scope that restores
/// the previous value.
pub fn attach(tags: TagMap) -> Scope {
    let prev = CURRENT.with(|c| c.replace(tags));
    Scope {
        prev: Some(prev),
        _not_send: PhantomData,
    }
}

/// Handle for one attached context value.
///
/// A scope is Active until [`release`](Self::release) runs, after which it is
/// Released for good: a second release is a no-op. Dropping an Active scope
/// releases it, so restoration happens on every exit path. Scopes are `!Send`;
/// they must be released on the thread that created them.
#[must_use = "dropping the scope immediately restores the previous value"]
#[derive(Debug)]
pub struct Scope {
    prev: Option<TagMap>,
    _not_send: PhantomData<*const ()>,
}

impl Scope {
    /// Restores the value that was current when this scope was created.
    pub fn release(&mut self) {
        if let Some(prev) = self.prev.take() {
            CURRENT.with(|c| *c.borrow_mut() = prev);
        }
    }

    pub fn is_released(&self) -> bool {
        self.prev.is_none()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.release();
    }
}

pin_project_lite::pin_project! {
    /// Future that polls its inner future with a tag map attached.
    pub struct WithTags<F> {
        #[pin]
        inner: F,
        tags: TagMap,
    }
}

impl<F: Future> Future for WithTags<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _scope = attach(this.tags.clone());
        this.inner.poll(cx)
    }
}

/// Extension trait attaching a tag map to a future.
pub trait FutureExt: Sized {
    /// Runs `self` with `tags` as the current context value, restoring the
    /// surrounding value between polls.
    fn with_tags(self, tags: TagMap) -> WithTags<Self>;
}

impl<F: Future> FutureExt for F {
    fn with_tags(self, tags: TagMap) -> WithTags<Self> {
        WithTags { inner: self, tags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{TagKey, TagMetadata, TagValue};

    fn tag_map(k: &str, v: &str) -> TagMap {
        TagMap::builder()
            .put(
                TagKey::new(k).unwrap(),
                TagValue::new(v).unwrap(),
                TagMetadata::default(),
            )
            .build()
    }

    #[test]
    fn scopes_nest_and_restore_in_reverse_order() {
        let a = tag_map("k", "a");
        let b = tag_map("k", "b");
        assert!(current().is_empty());

        let mut scope_a = attach(a.clone());
        assert_eq!(current(), a);

        let mut scope_b = attach(b.clone());
        assert_eq!(current(), b);

        scope_b.release();
        assert_eq!(current(), a);

        scope_a.release();
        assert!(current().is_empty());
    }

    #[test]
    fn drop_releases_the_scope() {
        let a = tag_map("k", "a");
        {
            let _scope = attach(a.clone());
            assert_eq!(current(), a);
        }
        assert!(current().is_empty());
    }

    #[test]
    fn drop_releases_on_panic_paths() {
        let a = tag_map("k", "a");
        let result = std::panic::catch_unwind(|| {
            let _scope = attach(a.clone());
            panic!("boom");
        });
        assert!(result.is_err());
        assert!(current().is_empty());
    }

    #[test]
    fn double_release_is_a_no_op() {
        let a = tag_map("k", "a");
        let b = tag_map("k", "b");

        let mut outer = attach(a.clone());
        let mut inner = attach(b);

        inner.release();
        assert!(inner.is_released());
        assert_eq!(current(), a);

        // Second release must not disturb the now-current value.
        inner.release();
        assert_eq!(current(), a);

        outer.release();
        assert!(current().is_empty());
    }

    #[test]
    fn unrelated_threads_do_not_observe_attached_values() {
        let a = tag_map("k", "a");
        let _scope = attach(a);

        let other = std::thread::spawn(|| current().is_empty())
            .join()
            .unwrap();

        assert!(other);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn with_tags_follows_the_future_across_polls() {
        let a = tag_map("k", "a");

        let observed = {
            let a = a.clone();
            async move {
                let before = current();
                tokio::task::yield_now().await;
                let after = current();
                (before, after)
            }
        }
        .with_tags(a.clone())
        .await;

        assert_eq!(observed.0, a);
        assert_eq!(observed.1, a);
        assert!(current().is_empty());
    }
}
