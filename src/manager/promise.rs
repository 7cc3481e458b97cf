//! Tracking a future with a single toast: loading while pending, then
//! success, action or error once it settles.

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

use super::ToastManager;
use crate::toast::{ToastId, ToastOptions};
use crate::types::ToastKind;

/// Options for a settled future, either fixed up front or computed from the
/// settled value.
pub enum Resolver<V> {
    Static(ToastOptions),
    With(Box<dyn FnOnce(&V) -> ToastOptions + Send>),
}

impl<V> Resolver<V> {
    pub fn with(f: impl FnOnce(&V) -> ToastOptions + Send + 'static) -> Self {
        Self::With(Box::new(f))
    }

    fn resolve(self, value: &V) -> ToastOptions {
        match self {
            Self::Static(options) => options,
            Self::With(f) => f(value),
        }
    }
}

impl<V> From<ToastOptions> for Resolver<V> {
    fn from(options: ToastOptions) -> Self {
        Self::Static(options)
    }
}

impl<V> fmt::Debug for Resolver<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(options) => f.debug_tuple("Static").field(options).finish(),
            Self::With(_) => f.write_str("With"),
        }
    }
}

pub struct PromiseOptions<T, E> {
    pub loading: ToastOptions,
    pub success: Resolver<T>,
    pub error: Resolver<E>,
    /// When set and the future resolves, the toast becomes an action toast
    /// built from the value instead of a success toast.
    pub action: Option<Box<dyn FnOnce(&T) -> ToastOptions + Send>>,
}

impl<T, E> PromiseOptions<T, E> {
    pub fn new(
        loading: ToastOptions,
        success: impl Into<Resolver<T>>,
        error: impl Into<Resolver<E>>,
    ) -> Self {
        Self {
            loading,
            success: success.into(),
            error: error.into(),
            action: None,
        }
    }

    #[must_use]
    pub fn action(mut self, f: impl FnOnce(&T) -> ToastOptions + Send + 'static) -> Self {
        self.action = Some(Box::new(f));
        self
    }

    fn settled(self, outcome: &Result<T, E>) -> ToastOptions {
        match (outcome, self.action) {
            (Ok(value), Some(action)) => action(value).kind(ToastKind::Action),
            (Ok(value), None) => self.success.resolve(value).kind(ToastKind::Success),
            (Err(err), _) => self.error.resolve(err).kind(ToastKind::Error),
        }
    }
}

impl<T, E> fmt::Debug for PromiseOptions<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromiseOptions")
            .field("loading", &self.loading)
            .field("success", &self.success)
            .field("error", &self.error)
            .field("action", &self.action.is_some())
            .finish()
    }
}

impl ToastManager {
    /// Show a loading toast right away and return a future that awaits
    /// `future`, settles the toast, and yields the outcome unchanged.
    ///
    /// Loading options without an id take over the newest live loading toast
    /// with the same title, so a toast shown with [`ToastManager::loading`]
    /// is tracked in place instead of duplicated.
    ///
    /// Settling a toast that was dismissed in the meantime does nothing.
    /// Dropping the returned future before it completes leaves the loading
    /// toast up with no countdown; use [`ToastManager::spawn_promise`] when
    /// the caller may not poll it to the end.
    pub fn promise<F, T, E>(
        &self,
        future: F,
        mut options: PromiseOptions<T, E>,
    ) -> impl Future<Output = Result<T, E>> + use<F, T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let mut loading = std::mem::take(&mut options.loading);
        if loading.id.is_none() {
            loading.id = self.pending_loading(loading.title.as_deref());
        }
        let id = self.loading(loading);
        let manager = self.clone();
        async move {
            let outcome = future.await;
            manager.settle(&id, options.settled(&outcome), outcome.is_ok());
            outcome
        }
    }

    /// Like [`ToastManager::promise`], but drives the future on the
    /// manager's runtime.
    pub fn spawn_promise<F, T, E>(
        &self,
        future: F,
        options: PromiseOptions<T, E>,
    ) -> JoinHandle<Result<T, E>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let tracked = self.promise(future, options);
        self.runtime().spawn(tracked)
    }

    fn pending_loading(&self, title: Option<&str>) -> Option<ToastId> {
        self.snapshot()
            .iter()
            .rev()
            .find(|toast| {
                toast.is_live() && toast.kind == ToastKind::Loading && toast.title.as_deref() == title
            })
            .map(|toast| toast.id.clone())
    }

    fn settle(&self, id: &ToastId, options: ToastOptions, resolved: bool) {
        if !self.update(id, &options) {
            debug!(toast_id = %id, resolved, "promise settled after its toast was dismissed");
        }
    }
}
