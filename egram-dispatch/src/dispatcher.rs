//! The dispatch loop: pulls update batches, advances the cursor, routes each
//! update through next-step continuations and the handler registries, and
//! keeps handler failures away from the loop.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use egram_core::types::{AllowedUpdate, CallbackQuery, Message, Update};
use egram_core::UpdateSource;
use egram_fsm::{FsmContext, StateStore};

use crate::classifier::{classify, Event};
use crate::matcher;
use crate::registry::{
    Callback, CallbackFilter, CallbackRegistration, EventFuture, MessageFilter,
    MessageRegistration, PollAnswerFilter, PollAnswerRegistration, PollFilter, PollRegistration,
};

/// Default worker cap for [`ExecutionMode::Pooled`].
pub const DEFAULT_POOL_WORKERS: usize = 10;

/// How a matched handler runs: inline on the loop, or offloaded to the
/// runtime behind a bounded worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Await the handler before touching the next update. A slow or hung
    /// handler stalls the loop.
    Direct,
    /// Spawn handlers onto the runtime; at most `max_workers` run at once,
    /// the rest queue. The loop never waits for them.
    Pooled { max_workers: usize },
}

impl ExecutionMode {
    /// Pooled mode with the default worker cap.
    pub fn pooled() -> Self {
        ExecutionMode::Pooled {
            max_workers: DEFAULT_POOL_WORKERS,
        }
    }
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Direct
    }
}

/// Long-poll loop configuration.
pub struct PollingConfig {
    /// Server-side long-poll wait, seconds.
    pub timeout_secs: u64,
    pub allowed_updates: Vec<AllowedUpdate>,
    pub mode: ExecutionMode,
    /// Pause before retrying after a failed fetch, so a dead transport does
    /// not spin the loop hot.
    pub error_retry_delay: Duration,
    /// Invoked once before the first fetch.
    pub on_startup: Option<Box<dyn FnOnce() + Send>>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            allowed_updates: AllowedUpdate::all(),
            mode: ExecutionMode::Direct,
            error_retry_delay: Duration::from_secs(1),
            on_startup: None,
        }
    }
}

/// Runs callbacks in the configured mode and absorbs their failures.
struct Invoker {
    semaphore: Option<Arc<Semaphore>>,
}

impl Invoker {
    fn new(mode: &ExecutionMode) -> Self {
        match mode {
            ExecutionMode::Direct => Self { semaphore: None },
            ExecutionMode::Pooled { max_workers } => Self {
                semaphore: Some(Arc::new(Semaphore::new((*max_workers).max(1)))),
            },
        }
    }

    fn direct() -> Self {
        Self { semaphore: None }
    }

    /// Invokes one callback. Errors and panics are logged, never propagated;
    /// in pooled mode this returns as soon as the task is spawned.
    async fn invoke(&self, kind: &'static str, future: EventFuture) {
        match &self.semaphore {
            None => {
                let outcome = AssertUnwindSafe(future).catch_unwind().await;
                log_outcome(kind, outcome);
            }
            Some(semaphore) => {
                let semaphore = semaphore.clone();
                tokio::spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return,
                    };
                    let outcome = AssertUnwindSafe(future).catch_unwind().await;
                    log_outcome(kind, outcome);
                });
            }
        }
    }
}

fn log_outcome(
    kind: &'static str,
    outcome: Result<egram_core::Result<()>, Box<dyn std::any::Any + Send>>,
) {
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(handler = kind, error = %e, "handler failed"),
        Err(_) => error!(handler = kind, "handler panicked"),
    }
}

/// Owns the handler registries, the next-step queues, the shared state store,
/// and the update cursor. Registries are append-only and scanned in
/// registration order; the first match wins and at most one handler runs per
/// update.
pub struct Dispatcher {
    message_handlers: Vec<MessageRegistration>,
    callback_query_handlers: Vec<CallbackRegistration>,
    poll_handlers: Vec<PollRegistration>,
    poll_answer_handlers: Vec<PollAnswerRegistration>,
    next_step_handlers: Mutex<Vec<(String, Callback<Message>)>>,
    query_next_step_handlers: Mutex<Vec<(String, Callback<CallbackQuery>)>>,
    store: Arc<StateStore>,
    offset: AtomicI64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_store(Arc::new(StateStore::new()))
    }

    pub fn with_store(store: Arc<StateStore>) -> Self {
        Self {
            message_handlers: Vec::new(),
            callback_query_handlers: Vec::new(),
            poll_handlers: Vec::new(),
            poll_answer_handlers: Vec::new(),
            next_step_handlers: Mutex::new(Vec::new()),
            query_next_step_handlers: Mutex::new(Vec::new()),
            store,
            offset: AtomicI64::new(0),
        }
    }

    /// The state store shared with every handler.
    pub fn store(&self) -> Arc<StateStore> {
        self.store.clone()
    }

    /// The smallest unseen update id; what the next fetch will send.
    pub fn offset(&self) -> i64 {
        self.offset.load(Ordering::SeqCst)
    }

    pub fn on_message(
        mut self,
        filter: MessageFilter,
        callback: Callback<Message>,
    ) -> Self {
        self.message_handlers.push(MessageRegistration { filter, callback });
        self
    }

    pub fn on_callback_query(
        mut self,
        filter: CallbackFilter,
        callback: Callback<CallbackQuery>,
    ) -> Self {
        self.callback_query_handlers
            .push(CallbackRegistration { filter, callback });
        self
    }

    pub fn on_poll(
        mut self,
        filter: PollFilter,
        callback: Callback<egram_core::types::Poll>,
    ) -> Self {
        self.poll_handlers.push(PollRegistration { filter, callback });
        self
    }

    pub fn on_poll_answer(
        mut self,
        filter: PollAnswerFilter,
        callback: Callback<egram_core::types::PollAnswer>,
    ) -> Self {
        self.poll_answer_handlers
            .push(PollAnswerRegistration { filter, callback });
        self
    }

    /// Arms a one-shot continuation: the next message from `chat_id` goes to
    /// `callback`, whatever its content. Extra arguments travel as closure
    /// captures.
    pub fn next_step_handler(&self, chat_id: i64, callback: Callback<Message>) {
        lock(&self.next_step_handlers).push((chat_id.to_string(), callback));
    }

    /// Like [`Dispatcher::next_step_handler`], for callback queries.
    pub fn query_next_step_handler(&self, chat_id: i64, callback: Callback<CallbackQuery>) {
        lock(&self.query_next_step_handlers).push((chat_id.to_string(), callback));
    }

    /// Classifies and routes one update, invoking handlers inline. The seam
    /// used by tests and by the polling loop in direct mode.
    pub async fn dispatch(&self, update: Update) {
        self.dispatch_with(update, &Invoker::direct()).await;
    }

    /// Routes a batch in server order, advancing the cursor past each update
    /// before routing it so a failure cannot cause redelivery.
    pub async fn process_batch(&self, updates: Vec<Update>) {
        self.process_batch_with(updates, &Invoker::direct()).await;
    }

    async fn process_batch_with(&self, updates: Vec<Update>, invoker: &Invoker) {
        for update in updates {
            self.offset.store(update.update_id + 1, Ordering::SeqCst);
            self.dispatch_with(update, invoker).await;
        }
    }

    async fn dispatch_with(&self, update: Update, invoker: &Invoker) {
        let update_id = update.update_id;
        let Some(event) = classify(update) else {
            debug!(update_id, "update carried no routable payload");
            return;
        };
        match event {
            Event::Message(message) => self.dispatch_message(message, invoker).await,
            Event::CallbackQuery(query) => self.dispatch_callback_query(query, invoker).await,
            Event::Poll(poll) => self.dispatch_poll(poll, invoker).await,
            Event::PollAnswer(answer) => self.dispatch_poll_answer(answer, invoker).await,
        }
    }

    async fn dispatch_message(&self, message: Message, invoker: &Invoker) {
        // Continuations and ordinary handlers are mutually exclusive for one
        // update: a consumed continuation ends routing here.
        if let Some(callback) = take_next_step(&self.next_step_handlers, message.chat_id()) {
            let fsm = self.fsm_for(message.user_id());
            invoker.invoke("next_step", callback.call(message, fsm)).await;
            return;
        }
        for registration in &self.message_handlers {
            if matcher::message_matches(&registration.filter, &message, &self.store) {
                let fsm = self.fsm_for(message.user_id());
                invoker
                    .invoke("message", registration.callback.call(message, fsm))
                    .await;
                return;
            }
        }
        debug!("no message handler matched");
    }

    async fn dispatch_callback_query(&self, query: CallbackQuery, invoker: &Invoker) {
        if let Some(callback) = take_next_step(&self.query_next_step_handlers, query.chat_id()) {
            let fsm = self.fsm_for(query.user_id());
            invoker
                .invoke("query_next_step", callback.call(query, fsm))
                .await;
            return;
        }
        for registration in &self.callback_query_handlers {
            if matcher::callback_matches(&registration.filter, &query, &self.store) {
                let fsm = self.fsm_for(query.user_id());
                invoker
                    .invoke("callback_query", registration.callback.call(query, fsm))
                    .await;
                return;
            }
        }
        debug!("no callback query handler matched");
    }

    async fn dispatch_poll(&self, poll: egram_core::types::Poll, invoker: &Invoker) {
        for registration in &self.poll_handlers {
            if matcher::poll_matches(&registration.filter, &poll) {
                let fsm = self.fsm_for(None);
                invoker
                    .invoke("poll", registration.callback.call(poll, fsm))
                    .await;
                return;
            }
        }
    }

    async fn dispatch_poll_answer(
        &self,
        answer: egram_core::types::PollAnswer,
        invoker: &Invoker,
    ) {
        for registration in &self.poll_answer_handlers {
            if matcher::poll_answer_matches(&registration.filter, &answer, &self.store) {
                let fsm = self.fsm_for(answer.user_id());
                invoker
                    .invoke("poll_answer", registration.callback.call(answer, fsm))
                    .await;
                return;
            }
        }
    }

    fn fsm_for(&self, user_id: Option<i64>) -> FsmContext {
        FsmContext::new(user_id.unwrap_or_default(), self.store.clone())
    }

    /// The long-poll loop. Fetches with the current offset, routes each
    /// batch, and repeats indefinitely. Fetch failures are logged and retried
    /// after `error_retry_delay` without advancing the cursor; nothing a
    /// handler does can end the loop.
    pub async fn run_polling(&self, source: Arc<dyn UpdateSource>, mut config: PollingConfig) {
        if let Some(hook) = config.on_startup.take() {
            hook();
        }
        let invoker = Invoker::new(&config.mode);
        info!(timeout_secs = config.timeout_secs, "polling started");

        loop {
            let updates = match source
                .get_updates(self.offset(), config.timeout_secs, &config.allowed_updates)
                .await
            {
                Ok(updates) => updates,
                Err(e) => {
                    error!(error = %e, "getUpdates failed, retrying");
                    tokio::time::sleep(config.error_retry_delay).await;
                    continue;
                }
            };
            if !updates.is_empty() {
                debug!(count = updates.len(), offset = self.offset(), "batch received");
            }
            self.process_batch_with(updates, &invoker).await;
        }
    }

    /// Blocking variant: builds a runtime and drives [`Dispatcher::run_polling`]
    /// on it. Does not return except on runtime construction failure.
    pub fn run_polling_blocking(
        &self,
        source: Arc<dyn UpdateSource>,
        config: PollingConfig,
    ) -> egram_core::Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run_polling(source, config));
        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes and returns the first continuation armed for `chat_id`.
fn take_next_step<E>(
    queue: &Mutex<Vec<(String, Callback<E>)>>,
    chat_id: Option<i64>,
) -> Option<Callback<E>> {
    let chat_id = chat_id?.to_string();
    let mut queue = lock(queue);
    let index = queue.iter().position(|(chat, _)| *chat == chat_id)?;
    Some(queue.remove(index).1)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
