//! `navigator` (§4.B), grounded on `window.py`'s `Navigator`/
//! `NavigatorUAData`/`_user_agent_data`. The original's typo'd
//! `vendorSUb` field is spelled correctly here (`vendorSub`) per the
//! bug-fix note in §9 — this crate never reproduces it.

use crate::object::{Object, ObjectInitializer};
use crate::realm::HostConfig;
use crate::value::{boolean, null, number, object as value_object, string, Value};
use rand::Rng;

struct UaInfo {
    brand: String,
    version: String,
    os: String,
    mobile: bool,
}

/// A small heuristic UA sniffer — no full `uaparser`-style database in
/// the pack, so this reads just the fields fingerprinting scripts
/// actually probe (`brands`, `mobile`, `platform`).
fn sniff(user_agent: &str) -> UaInfo {
    let (brand, version) = ["Edg", "OPR", "Chrome", "Firefox", "Safari"]
        .iter()
        .find_map(|token| {
            user_agent.split(token).nth(1).map(|rest| {
                let version: String = rest.trim_start_matches('/').chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
                let version = version.split('.').next().unwrap_or("0").to_string();
                let name = match *token {
                    "Edg" => "Microsoft Edge",
                    "OPR" => "Opera",
                    other => other,
                };
                (name.to_string(), version)
            })
        })
        .unwrap_or_else(|| ("Chrome".to_string(), "124".to_string()));

    let mobile = user_agent.contains("Android") || user_agent.contains("iPhone");
    let os = if user_agent.contains("Windows") {
        "Windows"
    } else if user_agent.contains("Mac OS") {
        "macOS"
    } else if user_agent.contains("Android") {
        "Android"
    } else if user_agent.contains("Linux") {
        "Linux"
    } else {
        "Windows"
    }
    .to_string();

    UaInfo { brand, version, os, mobile }
}

pub fn build(config: &HostConfig, function_prototype: &Value) -> Value {
    let ua = &config.user_agent;
    let info = sniff(ua);
    let language = config.language.clone().unwrap_or_else(|| "es-ES".to_string());
    let platform = config.platform.clone().unwrap_or_else(|| "Win32".to_string());

    let ua_data = value_object(Object::new());
    if let Some(o) = ua_data.as_object() {
        let mut o = o.borrow_mut();
        let brands = crate::prototypes::array::make_array(vec![
            brand_entry(&info.brand, &info.version),
            brand_entry("Chromium", &info.version),
            brand_entry("Not.A/Brand", "99"),
        ]);
        o.set_own("brands", brands);
        o.set_own("mobile", boolean(info.mobile));
        o.set_own("platform", string(info.os.clone()));
    }

    let app_version = ua.strip_prefix("Mozilla/").unwrap_or(ua).to_string();
    let mut rng = rand::thread_rng();

    ObjectInitializer::new(Some(function_prototype.clone()))
        .property("appCodeName", string("Mozilla"))
        .property("appName", string("Netscape"))
        .property("appVersion", string(app_version))
        .property("userAgent", string(ua.clone()))
        .property("userAgentData", ua_data)
        .property("language", string(language.clone()))
        .property("languages", crate::prototypes::array::make_array(vec![string(language)]))
        .property("platform", string(platform))
        .property("vendor", string("Google Inc."))
        .property("vendorSub", string("20030107"))
        .property("productSub", string("20030107"))
        .property("product", string("Gecko"))
        .property("hardwareConcurrency", number(rng.gen_range(2..=6) as f64))
        .property("deviceMemory", number((1u32 << rng.gen_range(0..=2)) as f64))
        .property("maxTouchPoints", number(0.0))
        .property("cookieEnabled", boolean(true))
        .property("onLine", boolean(true))
        .property("webdriver", boolean(false))
        .property("pdfViewerEnabled", boolean(true))
        .property("globalPrivacyControl", boolean(true))
        .property("doNotTrack", null())
        .property("plugins", crate::prototypes::array::make_array(vec![]))
        .property("mimeTypes", crate::prototypes::array::make_array(vec![]))
        .build_value()
}

fn brand_entry(brand: &str, version: &str) -> Value {
    let obj = value_object(Object::new());
    if let Some(o) = obj.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("brand", string(brand.to_string()));
        o.set_own("version", string(version.to_string()));
    }
    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{to_boolean, to_js_string, ValueExt};

    fn dummy_function_prototype() -> Value {
        value_object(Object::native_function("noop", 0, |_, _, _| Ok(crate::value::undefined()), None))
    }

    #[test]
    fn sniff_detects_chrome_and_its_version() {
        let info = sniff("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36");
        assert_eq!(info.brand, "Chrome");
        assert_eq!(info.version, "124");
        assert_eq!(info.os, "Windows");
        assert!(!info.mobile);
    }

    #[test]
    fn sniff_detects_android_as_mobile() {
        let info = sniff("Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 Chrome/124.0.0.0 Mobile Safari/537.36");
        assert!(info.mobile);
        assert_eq!(info.os, "Android");
    }

    #[test]
    fn app_version_strips_leading_mozilla_token() {
        let config = HostConfig { user_agent: "Mozilla/5.0 (Windows NT 10.0) Chrome/124.0.0.0".to_string(), ..HostConfig::default() };
        let nav = build(&config, &dummy_function_prototype());
        let app_version = nav.as_object().unwrap().borrow().get_own("appVersion").unwrap();
        assert!(to_js_string(&app_version).starts_with("5.0"));
    }

    #[test]
    fn vendor_sub_field_is_spelled_correctly() {
        let nav = build(&HostConfig::default(), &dummy_function_prototype());
        let obj = nav.as_object().unwrap();
        let obj = obj.borrow();
        assert!(obj.has_own("vendorSub"));
        assert!(!obj.has_own("vendorSUb"));
    }

    #[test]
    fn webdriver_flag_is_false() {
        let nav = build(&HostConfig::default(), &dummy_function_prototype());
        let webdriver = nav.as_object().unwrap().borrow().get_own("webdriver").unwrap();
        assert_eq!(to_boolean(&webdriver), false);
    }

    #[test]
    fn user_agent_data_brands_is_an_array_of_three() {
        let nav = build(&HostConfig::default(), &dummy_function_prototype());
        let ua_data = nav.as_object().unwrap().borrow().get_own("userAgentData").unwrap();
        let brands = ua_data.as_object().unwrap().borrow().get_own("brands").unwrap();
        assert_eq!(brands.as_object().unwrap().borrow().array_length(), 3);
    }
}
