//! The public face of the engine: creates, updates and dismisses toasts,
//! keeps their auto-dismiss countdowns in step with the store, and hands
//! renderers the motion for each record.

mod promise;

pub use promise::{PromiseOptions, Resolver};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::Result;
use crate::animation::{self, Motion, MotionContext, Phase, Rect};
use crate::config::{Config, EngineSettings};
use crate::factory::{self, Defaults};
use crate::store::{Snapshot, Subscription, ToastStore};
use crate::timers::TimerCoordinator;
use crate::toast::{Toast, ToastId, ToastOptions};
use crate::types::{Lifecycle, Position, ToastDuration, ToastKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Cause {
    User,
    Timer,
}

struct Inner {
    store: ToastStore,
    timers: TimerCoordinator<ToastId>,
    defaults: RwLock<Defaults>,
    settings: EngineSettings,
    runtime: Handle,
}

/// Cheaply clonable handle; clones drive the same toasts.
#[derive(Clone)]
pub struct ToastManager {
    inner: Arc<Inner>,
}

impl ToastManager {
    /// Manager bound to the tokio runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Runtime`] outside a tokio runtime.
    pub fn new(settings: EngineSettings) -> Result<Self> {
        Ok(Self::with_handle(settings, Handle::try_current()?))
    }

    pub fn with_handle(settings: EngineSettings, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: ToastStore::new(),
                timers: TimerCoordinator::new(runtime.clone()),
                defaults: RwLock::new(Defaults::default()),
                settings,
                runtime,
            }),
        }
    }

    /// Manager built from loaded configuration, bound to the current runtime.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Runtime`] outside a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let manager = Self::new(config.engine.clone())?;
        manager.set_default_position(config.default_position);
        Ok(manager)
    }

    /// Show a toast. A live toast with the same id is updated in place
    /// instead of duplicated. Returns the toast's id.
    pub fn show(&self, options: ToastOptions) -> ToastId {
        if let Some(id) = options.id.as_ref() {
            if self.inner.update(id, &options) {
                return id.clone();
            }
        }

        let toast = {
            let defaults = self.inner.defaults.read();
            factory::create(&options, &defaults, &self.inner.settings)
        };
        let id = toast.id.clone();
        let duration = toast.duration;
        debug!(
            toast_id = %id,
            kind = %toast.kind,
            position = %toast.position,
            duration = %duration,
            "toast created"
        );
        self.inner.store.add(toast);
        self.inner.schedule(&id, duration);
        id
    }

    pub fn success(&self, options: ToastOptions) -> ToastId {
        self.show(options.kind(ToastKind::Success))
    }

    pub fn error(&self, options: ToastOptions) -> ToastId {
        self.show(options.kind(ToastKind::Error))
    }

    pub fn warning(&self, options: ToastOptions) -> ToastId {
        self.show(options.kind(ToastKind::Warning))
    }

    pub fn info(&self, options: ToastOptions) -> ToastId {
        self.show(options.kind(ToastKind::Info))
    }

    pub fn action(&self, options: ToastOptions) -> ToastId {
        self.show(options.kind(ToastKind::Action))
    }

    /// Loading toasts never dismiss themselves, whatever duration was asked
    /// for.
    pub fn loading(&self, options: ToastOptions) -> ToastId {
        self.show(options.kind(ToastKind::Loading).persistent())
    }

    /// Start the exit of a live toast. Returns `false` for unknown ids and
    /// toasts already on their way out.
    pub fn dismiss(&self, id: &ToastId) -> bool {
        self.inner.dismiss(id, Cause::User)
    }

    /// Merge `partial` into the live toast under `id` and restart its
    /// countdown. Returns `false` for unknown or exiting ids.
    pub fn update(&self, id: &ToastId, partial: &ToastOptions) -> bool {
        self.inner.update(id, partial)
    }

    /// Remove every toast, or only those at `position`, without exit
    /// animation. Only the removed toasts' countdowns are cancelled.
    pub fn clear(&self, position: Option<Position>) -> Vec<ToastId> {
        let removed = self.inner.store.clear(position);
        match position {
            None => self.inner.timers.cancel_all(),
            Some(_) => {
                for id in &removed {
                    self.inner.timers.cancel(id);
                }
            }
        }
        debug!(removed = removed.len(), position = ?position, "toasts cleared");
        removed
    }

    pub fn set_default_position(&self, position: Position) {
        self.inner.defaults.write().position = position;
    }

    /// Options layered under every subsequently created toast.
    pub fn set_default_options(&self, options: ToastOptions) {
        self.inner.defaults.write().options = options;
    }

    pub fn default_position(&self) -> Position {
        self.inner.defaults.read().position
    }

    /// Freeze every countdown, e.g. while the pointer hovers the stack.
    pub fn pause_timers(&self) {
        self.inner.timers.pause();
    }

    pub fn resume_timers(&self) {
        self.inner.timers.resume();
    }

    pub fn timers_paused(&self) -> bool {
        self.inner.timers.is_paused()
    }

    /// Time left before `id` dismisses itself, if it is counting down.
    pub fn remaining(&self, id: &ToastId) -> Option<Duration> {
        self.inner.timers.remaining(id)
    }

    /// Renderer report that the toast finished its first paint.
    pub fn mark_visible(&self, id: &ToastId) -> bool {
        self.inner.store.update(id, |toast| {
            let lifecycle = toast.lifecycle.advance(Lifecycle::Visible)?;
            (lifecycle == Lifecycle::Visible).then(|| Toast {
                lifecycle,
                ..toast.clone()
            })
        })
    }

    /// Enter or exit motion for the toast under `id`, given the bounds the
    /// renderer measured for it.
    pub fn motion(&self, id: &ToastId, phase: Phase, target: Option<Rect>) -> Option<Motion> {
        let toast = self.inner.store.get(id)?;
        let ctx = MotionContext {
            position: toast.position,
            anchor: toast.anchor,
            target,
        };
        Some(animation::motion(toast.animation, phase, &ctx))
    }

    pub fn store(&self) -> &ToastStore {
        &self.inner.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.store.snapshot()
    }

    pub fn get(&self, id: &ToastId) -> Option<Toast> {
        self.inner.store.get(id)
    }

    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl Fn(&Snapshot) + Send + Sync + 'static) -> Subscription {
        self.inner.store.subscribe(listener)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.inner.settings
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.inner.runtime
    }
}

impl std::fmt::Debug for ToastManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastManager")
            .field("store", &self.inner.store)
            .field("timers", &self.inner.timers)
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn update(self: &Arc<Self>, id: &ToastId, partial: &ToastOptions) -> bool {
        let mut duration = None;
        let updated = self.store.update(id, |existing| {
            if existing.exiting {
                return None;
            }
            let next = factory::update(existing, partial, &self.settings);
            duration = Some(next.duration);
            Some(next)
        });
        match duration {
            Some(duration) if updated => {
                debug!(toast_id = %id, duration = %duration, "toast updated");
                self.schedule(id, duration);
                true
            }
            _ => {
                debug!(toast_id = %id, "update ignored, no live toast");
                false
            }
        }
    }

    fn dismiss(self: &Arc<Self>, id: &ToastId, cause: Cause) -> bool {
        // Flipping `exiting` under the store lock decides the winner of
        // concurrent dismissals; only the winner runs the callbacks.
        let mut dismissed = None;
        self.store.update(id, |current| {
            if current.exiting {
                return None;
            }
            dismissed = Some(current.clone());
            Some(Toast {
                exiting: true,
                lifecycle: current
                    .lifecycle
                    .advance(Lifecycle::Exiting)
                    .unwrap_or(current.lifecycle),
                ..current.clone()
            })
        });
        let Some(toast) = dismissed else {
            debug!(toast_id = %id, "dismiss ignored, no live toast");
            return false;
        };
        self.timers.cancel(id);
        if cause == Cause::Timer {
            if let Some(on_auto_close) = &toast.on_auto_close {
                on_auto_close.call(&toast);
            }
        }
        if let Some(on_dismiss) = &toast.on_dismiss {
            on_dismiss.call(&toast);
        }
        debug!(
            toast_id = %id,
            cause = ?cause,
            exit_ms = self.settings.exit_duration.as_millis(),
            "toast dismissed"
        );
        self.remove_after_exit(id.clone(), toast.instance_id);
        true
    }

    /// (Re)start or cancel the countdown for `id` to match `duration`.
    fn schedule(self: &Arc<Self>, id: &ToastId, duration: ToastDuration) {
        let Some(delay) = duration.auto_dismiss_after() else {
            self.timers.cancel(id);
            return;
        };
        trace!(toast_id = %id, delay_ms = delay.as_millis(), "auto-dismiss scheduled");
        let inner = Arc::downgrade(self);
        let key = id.clone();
        self.timers.schedule(id.clone(), delay, move || {
            if let Some(inner) = inner.upgrade() {
                inner.dismiss(&key, Cause::Timer);
            }
        });
    }

    /// Physically drop the record once its exit has played, unless it has
    /// since been replaced by a new instance under the same id.
    fn remove_after_exit(self: &Arc<Self>, id: ToastId, instance: Uuid) {
        let inner = Arc::downgrade(self);
        let delay = self.settings.exit_duration;
        self.runtime.spawn(async move {
            sleep(delay).await;
            if let Some(inner) = inner.upgrade() {
                if inner.store.remove_instance(&id, instance) {
                    trace!(toast_id = %id, "toast removed");
                }
            }
        });
    }
}
