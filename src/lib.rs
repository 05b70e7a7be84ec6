//! `sandjs` — a sandboxed, tree-walking JavaScript interpreter bundled
//! with a faked browser host environment (Window/Document/Navigator/
//! Location/Screen/Crypto/Performance/timers/Worker). No parser ships
//! here: callers hand in an estree-shaped [`ast::Node`] program, the same
//! contract `boa_engine::Context::eval` would sit behind if you stripped
//! its own parser out and fed it a `boa_ast::StatementList` directly.
//!
//! ```no_run
//! use sandjs::{Engine, HostConfig};
//!
//! let mut engine = Engine::new(HostConfig::default());
//! let program: Vec<sandjs::ast::Node> = vec![];
//! let _ = engine.run(&program);
//! ```

pub mod ast;
pub mod environment;
pub mod error;
pub mod facade;
pub mod interpreter;
pub mod object;
pub mod prototypes;
pub mod realm;
pub mod value;

pub use error::{JsError, JsErrorKind, JsResult};
pub use realm::HostConfig;

use interpreter::Interpreter;
use realm::Realm;
use std::cell::Cell;

/// `console.{log,info,warn}` writes straight to stdout, mirroring the
/// teacher's own `console` builtin (`boa_engine::builtins::console::logger`)
/// rather than routing through the `log` facade: §6 requires script output
/// to default to standard output unconditionally, with no dependency on an
/// embedder having installed a logger.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        println!($($arg)*)
    };
}

/// See [`log_info!`] — `warn`/`dir`/`trace`/`debug` all print to stdout too,
/// matching `window.py`'s `console` record aliasing every method to `print`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        println!($($arg)*)
    };
}

/// `console.error` is the one method the original and every real console
/// route to the error stream instead.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        eprintln!($($arg)*)
    };
}

/// Ambient interpreter-lifecycle tracing (environment push/pop, call
/// entry/exit, timer fire, worker lifecycle) — distinct from `console`'s
/// guaranteed stdout output above. Goes through the `log` facade only;
/// this library never installs a logger itself (standard library-crate
/// practice), so these are silent until an embedding binary calls
/// `simple_logger::SimpleLogger::new().init()` or similar.
#[macro_export]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "logging")]
        {
            log::trace!($($arg)*);
        }
    };
}

/// See [`trace_event!`], at `debug` level for coarser-grained events
/// (function call entry/exit, timer fire, worker spawn/terminate).
#[macro_export]
macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "logging")]
        {
            log::debug!($($arg)*);
        }
    };
}

/// A single script execution context: one `Realm` (global object, every
/// prototype table, the browser façade) plus the tree-walking evaluator
/// sitting on top of it. Grounded on the teacher's `boa_engine::Context`,
/// simplified to a single realm since §1's Non-goals rule out multi-realm.
pub struct Engine {
    interpreter: Interpreter,
    poisoned: Cell<bool>,
}

impl Engine {
    pub fn new(config: HostConfig) -> Self {
        let realm = Realm::new(&config);
        Engine { interpreter: Interpreter::new(realm), poisoned: Cell::new(false) }
    }

    /// Runs `program` to completion. Per §7, an engine that has already
    /// thrown an error past `run` is "unusable until re-seeded" — a second
    /// call after a prior `Err` returns immediately rather than continuing
    /// to evaluate against whatever partially-mutated state the failed run
    /// left behind.
    pub fn run(&mut self, program: &[ast::Node]) -> JsResult<value::Value> {
        if self.poisoned.get() {
            return Err(JsError::new(JsErrorKind::Type, value::string("Engine is poisoned by a prior uncaught error")));
        }
        let result = self.interpreter.run_program(program);
        self.interpreter.pump_background();
        if result.is_err() {
            self.poisoned.set(true);
        }
        result
    }

    /// Advances any due timer callbacks and drains pending worker messages
    /// without running a new top-level program — the hook an embedder's
    /// run loop calls between script evaluations (§5: "Timers observe
    /// script state only between top-level evaluation calls").
    pub fn pump_background(&mut self) -> JsResult<()> {
        self.interpreter.pump_background()
    }

    pub fn interpreter(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    pub fn realm(&self) -> &Realm {
        &self.interpreter.realm
    }
}

/// Convenience one-shot entry point for callers that don't need to reuse
/// an `Engine` across multiple programs (e.g. `tests/`, a CLI driver).
pub fn run_program(config: HostConfig, program: &[ast::Node]) -> JsResult<value::Value> {
    Engine::new(config).run(program)
}
