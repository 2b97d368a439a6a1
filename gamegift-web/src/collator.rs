//! Display-name ordering for the current locale.
use gamegift_core::{CaseFoldCollator, NameCollator};
use std::cmp::Ordering;

/// Orders names with `Intl.Collator` in the browser and falls back to
/// case-folded comparison elsewhere.
#[derive(Debug, Clone)]
pub struct BrowserCollator {
    #[cfg(target_arch = "wasm32")]
    intl: js_sys::Intl::Collator,
}

impl BrowserCollator {
    #[must_use]
    pub fn for_lang(lang: &str) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let locales = js_sys::Array::new();
            locales.push(&wasm_bindgen::JsValue::from_str(lang));
            Self {
                intl: js_sys::Intl::Collator::new(&locales, &js_sys::Object::new()),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = lang;
            Self {}
        }
    }
}

impl NameCollator for BrowserCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        #[cfg(target_arch = "wasm32")]
        {
            let compare_fn = self.intl.compare();
            let result = compare_fn
                .call2(
                    &self.intl,
                    &wasm_bindgen::JsValue::from_str(a),
                    &wasm_bindgen::JsValue::from_str(b),
                )
                .ok()
                .and_then(|v| v.as_f64())
                .and_then(|n| n.partial_cmp(&0.0));
            if let Some(ordering) = result {
                return ordering;
            }
        }
        CaseFoldCollator.compare(a, b)
    }
}
