//! Integration tests for [`egram_dispatch::Dispatcher`].
//!
//! Covers: registration-order matching with command gating, next-step
//! continuation consumption and suppression, cursor advancement, handler
//! failure isolation, state-gated routing, callback-query routing, and the
//! polling loop surviving transport and handler failures in both execution
//! modes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use egram_core::types::{AllowedUpdate, ChatType, Message, Update};
use egram_core::{EgramError, Result, UpdateSource};
use egram_dispatch::{
    Callback, CallbackFilter, Dispatcher, ExecutionMode, MessageFilter, PollingConfig,
};
use egram_fsm::StateTag;

/// **Test: Registration order and command gating pick exactly one handler.**
///
/// **Setup:** H1 registered with commands=["a"], H2 with no filters.
/// **Action:** Dispatch "/a", then "/b".
/// **Expected:** "/a" invokes H1 only; "/b" invokes H2 only.
#[tokio::test]
async fn test_first_matching_handler_wins() {
    let h1 = Arc::new(AtomicUsize::new(0));
    let h2 = Arc::new(AtomicUsize::new(0));

    let dispatcher = Dispatcher::new()
        .on_message(MessageFilter::new().commands(["a"]), counting_handler(h1.clone()))
        .on_message(MessageFilter::new(), counting_handler(h2.clone()));

    dispatcher.dispatch(text_update(1, 10, 100, "/a")).await;
    assert_eq!(h1.load(Ordering::SeqCst), 1);
    assert_eq!(h2.load(Ordering::SeqCst), 0);

    dispatcher.dispatch(text_update(2, 10, 100, "/b")).await;
    assert_eq!(h1.load(Ordering::SeqCst), 1);
    assert_eq!(h2.load(Ordering::SeqCst), 1);
}

/// **Test: A next-step continuation fires once and suppresses ordinary handlers.**
///
/// **Setup:** A catch-all handler plus a continuation armed for chat 42.
/// **Action:** Dispatch two messages from chat 42.
/// **Expected:** First message goes to the continuation only; second goes to
/// the ordinary handler.
#[tokio::test]
async fn test_next_step_is_one_shot_and_mutually_exclusive() {
    let regular = Arc::new(AtomicUsize::new(0));
    let step = Arc::new(AtomicUsize::new(0));

    let dispatcher =
        Dispatcher::new().on_message(MessageFilter::new(), counting_handler(regular.clone()));
    dispatcher.next_step_handler(42, counting_handler(step.clone()));

    dispatcher.dispatch(text_update(1, 42, 7, "first")).await;
    assert_eq!(step.load(Ordering::SeqCst), 1);
    assert_eq!(regular.load(Ordering::SeqCst), 0);

    dispatcher.dispatch(text_update(2, 42, 7, "second")).await;
    assert_eq!(step.load(Ordering::SeqCst), 1);
    assert_eq!(regular.load(Ordering::SeqCst), 1);
}

/// **Test: A continuation armed for one chat ignores other chats.**
///
/// **Setup:** Continuation for chat 42, catch-all handler.
/// **Action:** Dispatch a message from chat 43.
/// **Expected:** Ordinary handler fires; continuation stays armed.
#[tokio::test]
async fn test_next_step_is_chat_scoped() {
    let regular = Arc::new(AtomicUsize::new(0));
    let step = Arc::new(AtomicUsize::new(0));

    let dispatcher =
        Dispatcher::new().on_message(MessageFilter::new(), counting_handler(regular.clone()));
    dispatcher.next_step_handler(42, counting_handler(step.clone()));

    dispatcher.dispatch(text_update(1, 43, 7, "elsewhere")).await;
    assert_eq!(step.load(Ordering::SeqCst), 0);
    assert_eq!(regular.load(Ordering::SeqCst), 1);

    dispatcher.dispatch(text_update(2, 42, 7, "here")).await;
    assert_eq!(step.load(Ordering::SeqCst), 1);
}

/// **Test: The cursor advances past the highest processed update id.**
///
/// **Setup:** Empty dispatcher.
/// **Action:** Process a batch whose ids are 99 and 100.
/// **Expected:** `offset()` is 101.
#[tokio::test]
async fn test_offset_advances_past_batch() {
    let dispatcher = Dispatcher::new();
    assert_eq!(dispatcher.offset(), 0);

    dispatcher
        .process_batch(vec![
            text_update(99, 1, 1, "a"),
            text_update(100, 1, 1, "b"),
        ])
        .await;
    assert_eq!(dispatcher.offset(), 101);
}

/// **Test: A failing handler does not stop the batch, and the cursor still advances.**
///
/// **Setup:** H1 errors on "/boom"; H2 is a catch-all counter.
/// **Action:** Process a batch of "/boom" then a plain message.
/// **Expected:** H2 ran once; offset moved past both updates.
#[tokio::test]
async fn test_handler_error_is_isolated() {
    let ok = Arc::new(AtomicUsize::new(0));

    let dispatcher = Dispatcher::new()
        .on_message(
            MessageFilter::new().command("boom"),
            Callback::event(|_message: Message| async {
                Err::<(), EgramError>(EgramError::Config("boom".to_string()))
            }),
        )
        .on_message(MessageFilter::new(), counting_handler(ok.clone()));

    dispatcher
        .process_batch(vec![
            text_update(1, 5, 5, "/boom"),
            text_update(2, 5, 5, "fine"),
        ])
        .await;

    assert_eq!(ok.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.offset(), 3);
}

/// **Test: A panicking handler is absorbed too.**
///
/// **Setup:** H1 panics on any message; a later update follows in the batch.
/// **Action:** Process the two-update batch.
/// **Expected:** The batch completes and the cursor covers both updates.
#[tokio::test]
async fn test_handler_panic_is_isolated() {
    let dispatcher = Dispatcher::new().on_message(
        MessageFilter::new().command("panic"),
        Callback::event(|_message: Message| async { panic!("handler blew up") }),
    );

    dispatcher
        .process_batch(vec![
            text_update(7, 5, 5, "/panic"),
            text_update(8, 5, 5, "still here"),
        ])
        .await;
    assert_eq!(dispatcher.offset(), 9);
}

/// **Test: State-gated handlers fire only for users in that state.**
///
/// **Setup:** "/start" handler moves user into WAITING_NAME via the FSM
/// context; a second handler requires WAITING_NAME and finishes the flow.
/// **Action:** Dispatch "/start" then a plain message from the same user,
/// then another plain message.
/// **Expected:** The gated handler fires exactly once (state cleared by
/// `finish`), and the captured text is the second message's.
#[tokio::test]
async fn test_state_gated_flow() {
    const WAITING_NAME: StateTag = StateTag::new("Signup", "WAITING_NAME");
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let seen_in_handler = seen.clone();
    let dispatcher = Dispatcher::new()
        .on_message(
            MessageFilter::new().command("start"),
            Callback::with_fsm(|_message: Message, fsm| async move {
                fsm.set_state(WAITING_NAME, []);
                Ok(())
            }),
        )
        .on_message(
            MessageFilter::new().state(WAITING_NAME),
            Callback::with_fsm(move |message: Message, fsm| {
                let seen = seen_in_handler.clone();
                async move {
                    seen.lock().unwrap().push(message.text.unwrap_or_default());
                    fsm.finish();
                    Ok(())
                }
            }),
        );

    dispatcher.dispatch(text_update(1, 9, 9, "/start")).await;
    assert_eq!(dispatcher.store().get_state(9).as_deref(), Some("Signup:WAITING_NAME"));

    dispatcher.dispatch(text_update(2, 9, 9, "Alice")).await;
    dispatcher.dispatch(text_update(3, 9, 9, "ignored")).await;

    assert_eq!(*seen.lock().unwrap(), vec!["Alice".to_string()]);
    assert_eq!(dispatcher.store().get_state(9), None);
}

/// **Test: Callback queries route by the back-filled chat and the pressing user's state.**
///
/// **Setup:** One handler gated on private chats, one continuation queue
/// check: a query continuation armed for chat 42.
/// **Action:** Dispatch a query in chat 42, then one in a group chat 50.
/// **Expected:** The first is consumed by the continuation; the second
/// reaches the private-gated handler only if private; a group query matches
/// neither.
#[tokio::test]
async fn test_callback_query_routing() {
    let private_only = Arc::new(AtomicUsize::new(0));
    let step = Arc::new(AtomicUsize::new(0));

    let private_counter = private_only.clone();
    let dispatcher = Dispatcher::new().on_callback_query(
        CallbackFilter::new().chat_type(ChatType::Private),
        Callback::event(move |_query: egram_core::types::CallbackQuery| {
            let counter = private_counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }),
    );

    let step_counter = step.clone();
    dispatcher.query_next_step_handler(
        42,
        Callback::event(move |_query: egram_core::types::CallbackQuery| {
            let counter = step_counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }),
    );

    dispatcher
        .dispatch(callback_update(1, 42, 9, "private", "pick"))
        .await;
    assert_eq!(step.load(Ordering::SeqCst), 1);
    assert_eq!(private_only.load(Ordering::SeqCst), 0);

    dispatcher
        .dispatch(callback_update(2, 50, 9, "group", "pick"))
        .await;
    assert_eq!(private_only.load(Ordering::SeqCst), 0);

    dispatcher
        .dispatch(callback_update(3, 42, 9, "private", "pick"))
        .await;
    assert_eq!(private_only.load(Ordering::SeqCst), 1);
}

/// **Test: The polling loop survives a failed fetch and a failing handler.**
///
/// **Setup:** Scripted source: one transport failure, then a one-update
/// batch, then pending forever. Catch-all counting handler.
/// **Action:** Run the loop in the background; wait for the handler.
/// **Expected:** Handler ran once; the failed fetch reused offset 0, and the
/// fetch after the batch used offset 6.
#[tokio::test]
async fn test_polling_survives_failures() {
    let counter = Arc::new(AtomicUsize::new(0));
    let dispatcher = Arc::new(
        Dispatcher::new().on_message(MessageFilter::new(), counting_handler(counter.clone())),
    );
    let source = Arc::new(ScriptedSource::new(vec![
        ScriptStep::Fail,
        ScriptStep::Batch(vec![text_update(5, 42, 7, "hello")]),
    ]));

    let config = PollingConfig {
        error_retry_delay: Duration::from_millis(10),
        ..Default::default()
    };
    let task = tokio::spawn({
        let dispatcher = dispatcher.clone();
        let source = source.clone();
        async move { dispatcher.run_polling(source, config).await }
    });

    wait_until(|| counter.load(Ordering::SeqCst) == 1).await;
    wait_until(|| source.call_offsets().len() >= 3).await;

    let offsets = source.call_offsets();
    assert_eq!(offsets[0], 0);
    assert_eq!(offsets[1], 0);
    assert_eq!(offsets[2], 6);

    task.abort();
}

/// **Test: The startup hook runs once before the first fetch.**
#[tokio::test]
async fn test_startup_hook_runs() {
    let started = Arc::new(AtomicBool::new(false));
    let dispatcher = Arc::new(Dispatcher::new());
    let source = Arc::new(ScriptedSource::new(vec![]));

    let flag = started.clone();
    let config = PollingConfig {
        on_startup: Some(Box::new(move || flag.store(true, Ordering::SeqCst))),
        ..Default::default()
    };
    let task = tokio::spawn({
        let dispatcher = dispatcher.clone();
        let source = source.clone();
        async move { dispatcher.run_polling(source, config).await }
    });

    wait_until(|| started.load(Ordering::SeqCst)).await;
    task.abort();
}

/// **Test: Pooled mode runs every matched handler despite the worker cap.**
///
/// **Setup:** Batch of four messages; each handler sleeps before counting;
/// pool capped at two workers.
/// **Action:** Run the loop with `ExecutionMode::Pooled { max_workers: 2 }`.
/// **Expected:** All four handlers complete.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pooled_mode_completes_all_handlers() {
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    let dispatcher = Arc::new(Dispatcher::new().on_message(
        MessageFilter::new(),
        Callback::event(move |_message: Message| {
            let counter = c.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }),
    ));
    let source = Arc::new(ScriptedSource::new(vec![ScriptStep::Batch(vec![
        text_update(1, 1, 1, "a"),
        text_update(2, 1, 1, "b"),
        text_update(3, 2, 2, "c"),
        text_update(4, 2, 2, "d"),
    ])]));

    let config = PollingConfig {
        mode: ExecutionMode::Pooled { max_workers: 2 },
        ..Default::default()
    };
    let task = tokio::spawn({
        let dispatcher = dispatcher.clone();
        let source = source.clone();
        async move { dispatcher.run_polling(source, config).await }
    });

    wait_until(|| counter.load(Ordering::SeqCst) == 4).await;
    task.abort();
}

// --- Helpers used by tests ---

fn text_update(update_id: i64, chat_id: i64, user_id: i64, text: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "from": {"id": user_id, "first_name": "Test"},
            "chat": {"id": chat_id, "type": "private"},
            "date": 1_700_000_000,
            "text": text
        }
    }))
    .unwrap()
}

fn callback_update(
    update_id: i64,
    chat_id: i64,
    user_id: i64,
    chat_type: &str,
    data: &str,
) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "callback_query": {
            "id": update_id.to_string(),
            "from": {"id": user_id, "first_name": "Presser"},
            "message": {
                "message_id": 1,
                "from": {"id": 1, "is_bot": true},
                "chat": {"id": chat_id, "type": chat_type}
            },
            "data": data
        }
    }))
    .unwrap()
}

fn counting_handler(counter: Arc<AtomicUsize>) -> Callback<Message> {
    Callback::event(move |_message: Message| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    })
}

async fn wait_until(predicate: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !predicate() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

enum ScriptStep {
    Fail,
    Batch(Vec<Update>),
}

/// Update source driven by a script; once exhausted it parks like an idle
/// long poll.
struct ScriptedSource {
    steps: Mutex<VecDeque<ScriptStep>>,
    offsets: Mutex<Vec<i64>>,
}

impl ScriptedSource {
    fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            offsets: Mutex::new(Vec::new()),
        }
    }

    fn call_offsets(&self) -> Vec<i64> {
        self.offsets.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpdateSource for ScriptedSource {
    async fn get_updates(
        &self,
        offset: i64,
        _timeout_secs: u64,
        _allowed_updates: &[AllowedUpdate],
    ) -> Result<Vec<Update>> {
        self.offsets.lock().unwrap().push(offset);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(ScriptStep::Fail) => Err(EgramError::Config("scripted failure".to_string())),
            Some(ScriptStep::Batch(updates)) => Ok(updates),
            None => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }
}
