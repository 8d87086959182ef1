use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use crate::BoxFuture;

/// A future polled from the frame loop with a noop waker.
///
/// There is no runtime behind this: the future only makes progress when
/// `data` is called, so it must be backed by something that completes on
/// its own (a thread handing its result over a channel, or an immediately
/// ready value).
pub struct AsyncTask<T>(Option<BoxFuture<'static, T>>);

impl<T> AsyncTask<T> {
    pub fn new(future: BoxFuture<'static, T>) -> Self {
        Self(Some(future))
    }

    /// Returns the output exactly once; afterwards the task stays empty.
    pub fn data(&mut self) -> Option<T> {
        let future = self.0.as_mut()?;
        let mut cx = Context::from_waker(Waker::noop());
        match Pin::new(future).poll(&mut cx) {
            Poll::Ready(value) => {
                self.0 = None;
                Some(value)
            }
            Poll::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;

    #[test]
    fn ready_future_resolves_once() {
        let mut task = AsyncTask::new(async { 42 }.boxed());
        assert!(task.is_pending());
        assert_eq!(task.data(), Some(42));
        assert_eq!(task.data(), None);
        assert!(!task.is_pending());
    }

    #[test]
    fn oneshot_resolves_after_send() {
        let (tx, rx) = futures::channel::oneshot::channel();
        let mut task = AsyncTask::new(async move { rx.await.ok() }.boxed());
        assert_eq!(task.data(), None);
        tx.send(7).unwrap();
        assert_eq!(task.data(), Some(Some(7)));
    }
}
