//! `screen` (§4.B), grounded on `window.py`'s `Screen`/`SCREEM_RESOLUTIONS`.
//! §9 flags a bug here: the original's `Screen.width` is hardcoded to
//! `2560` regardless of which resolution tuple got picked, while
//! `availWidth`/`height`/`availHeight` all correctly read from it. This
//! crate reads `width` from the same tuple as everything else.

use crate::object::ObjectInitializer;
use crate::value::{boolean, number, object as value_object, string, Value};
use rand::seq::SliceRandom;

const RESOLUTIONS: &[(u32, u32, u32, u32)] = &[
    (3440, 1440, 3440, 1400),
    (1924, 1007, 1924, 1007),
    (1920, 1080, 1920, 1040),
    (1280, 720, 1280, 672),
    (1920, 1080, 1920, 1032),
    (1366, 651, 1366, 651),
    (1366, 768, 1366, 738),
    (1920, 1080, 1920, 1050),
];

pub struct Resolution {
    pub outer_height: u32,
    pub outer_width: u32,
    pub inner_height: u32,
    pub inner_width: u32,
}

pub fn pick_resolution() -> Resolution {
    let &(oh, ow, ih, iw) = RESOLUTIONS.choose(&mut rand::thread_rng()).unwrap();
    Resolution { outer_height: oh, outer_width: ow, inner_height: ih, inner_width: iw }
}

pub fn build(resolution: &Resolution, function_prototype: &Value) -> Value {
    let orientation = value_object(crate::object::Object::new());
    if let Some(o) = orientation.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("angle", number(0.0));
        o.set_own("type", string("landscape-primary"));
        o.set_own("onchange", crate::value::null());
    }

    ObjectInitializer::new(Some(function_prototype.clone()))
        .property("availHeight", number(resolution.outer_height as f64))
        .property("availWidth", number(resolution.outer_width as f64))
        .property("availLeft", number(0.0))
        .property("availTop", number(0.0))
        .property("height", number(resolution.outer_height as f64))
        .property("width", number(resolution.outer_width as f64))
        .property("colorDepth", number(24.0))
        .property("pixelDepth", number(24.0))
        .property("isExtended", boolean(false))
        .property("orientation", orientation)
        .property("onchange", crate::value::null())
        .build_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{to_number, ValueExt};

    fn dummy_function_prototype() -> Value {
        value_object(crate::object::Object::native_function("noop", 0, |_, _, _| Ok(crate::value::undefined()), None))
    }

    #[test]
    fn width_is_read_from_the_chosen_resolution_not_hardcoded() {
        let resolution = Resolution { outer_height: 1366, outer_width: 768, inner_height: 1300, inner_width: 738 };
        let screen = build(&resolution, &dummy_function_prototype());
        let width = screen.as_object().unwrap().borrow().get_own("width").unwrap();
        assert_eq!(to_number(&width), 768.0);
        assert_ne!(to_number(&width), 2560.0);
    }

    #[test]
    fn pick_resolution_returns_one_of_the_known_tuples() {
        let resolution = pick_resolution();
        assert!(RESOLUTIONS.iter().any(|&(oh, ow, _, _)| oh == resolution.outer_height && ow == resolution.outer_width));
    }
}
