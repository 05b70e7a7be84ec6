//! The browser host façade (§4.B). Every submodule builds one piece of
//! `window`; `window::install` wires them all onto the realm's global
//! object/environment. Grounded throughout on
//! `examples/original_source/window.py` and `document.py`, with the two
//! documented bugs (§9) fixed rather than reproduced: `screen.width` reads
//! from the chosen resolution tuple instead of a hardcoded constant, and
//! `navigator.vendorSub` is spelled correctly.

pub mod chrome;
pub mod console;
pub mod crypto;
pub mod document;
pub mod encoding;
pub mod json;
pub mod location;
pub mod math;
pub mod navigator;
pub mod performance;
pub mod screen;
pub mod storage;
pub mod timers;
pub mod url_utils;
pub mod window;
pub mod worker;
