use js_sys::{Function, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use page_turn_core::{
    layout_pages, parse_page_list_json, BookEngine, Config, Inputs, Outputs, PageSpec, StepToken,
    TextureRef, TextureResolver,
};

#[wasm_bindgen]
pub struct PageTurnBook {
    core: BookEngine,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

struct JsResolver {
    f: Function,
}

impl TextureResolver for JsResolver {
    fn resolve(&mut self, key: &str) -> Option<TextureRef> {
        // resolver(key) -> string | null/undefined; a throwing resolver counts as missing
        let arg = JsValue::from_str(key);
        match self.f.call1(&JsValue::UNDEFINED, &arg) {
            Ok(val) => {
                if jsvalue_is_undefined_or_null(&val) {
                    return None;
                }
                val.as_string().filter(|s| !s.trim().is_empty())
            }
            Err(_) => None,
        }
    }
}

fn pages_from_js(pages: JsValue) -> Result<Vec<PageSpec>, JsError> {
    if jsvalue_is_undefined_or_null(&pages) {
        return Ok(Vec::new());
    }
    let s = JSON::stringify(&pages)
        .map_err(|e| JsError::new(&format!("set_pages stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new("set_pages: stringify produced non-string"))?;
    parse_page_list_json(&s).map_err(|e| JsError::new(&format!("set_pages parse error: {e}")))
}

#[wasm_bindgen]
impl PageTurnBook {
    /// Create a book with no pages. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new PageTurnBook({ curve: { turning_window_ms: 300 } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PageTurnBook, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let core = BookEngine::try_new(cfg).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(PageTurnBook { core })
    }

    /// Replace the page list with an array of `{ front, back }` records.
    /// The book closes back onto its front cover.
    #[wasm_bindgen(js_name = set_pages)]
    pub fn set_pages(&mut self, pages: JsValue) -> Result<(), JsError> {
        let pages = pages_from_js(pages)?;
        self.core.set_pages(pages);
        Ok(())
    }

    /// Navigate to `page`. Negative values clamp to the front cover, values past
    /// the end clamp to the back cover. Returns the step token of the new chain.
    #[wasm_bindgen(js_name = go_to_page)]
    pub fn go_to_page(&mut self, page: i32) -> u32 {
        let page = usize::try_from(page).unwrap_or(0);
        self.core.go_to_page(page).0
    }

    /// Cancel the flip chain identified by `token`. Returns false for stale tokens.
    #[wasm_bindgen]
    pub fn cancel(&mut self, token: u32) -> bool {
        self.core.cancel(StepToken(token))
    }

    /// Stop scheduling flip steps (call when the view unmounts).
    #[wasm_bindgen]
    pub fn shutdown(&mut self) {
        self.core.shutdown();
    }

    /// Resolve page texture keys with a JS callback:
    /// `resolver(key: string) -> string | null/undefined`.
    /// Unresolved keys bind the configured fallback textures.
    #[wasm_bindgen(js_name = bind_textures)]
    pub fn bind_textures(&mut self, resolver: Function) {
        let mut js_resolver = JsResolver { f: resolver };
        self.core.bind_textures(&mut js_resolver);
    }

    /// Step the book by dt (seconds) with inputs JSON. Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out: &Outputs = self.core.update(dt, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    #[wasm_bindgen(js_name = page_count)]
    pub fn page_count(&self) -> u32 {
        self.core.page_count() as u32
    }

    #[wasm_bindgen(js_name = delayed_page)]
    pub fn delayed_page(&self) -> u32 {
        self.core.delayed_page() as u32
    }

    #[wasm_bindgen(js_name = target_page)]
    pub fn target_page(&self) -> u32 {
        self.core.target_page() as u32
    }

    /// Shared skinned page mesh (positions, skins, indices, face groups).
    #[wasm_bindgen]
    pub fn geometry(&mut self) -> Result<JsValue, JsError> {
        swb::to_value(self.core.geometry())
            .map_err(|e| JsError::new(&format!("geometry error: {e}")))
    }

    /// Material bindings for one page, or null when the page does not exist.
    #[wasm_bindgen]
    pub fn materials(&self, page: u32) -> Result<JsValue, JsError> {
        match self.core.materials(page as usize) {
            Some(m) => swb::to_value(m).map_err(|e| JsError::new(&format!("materials error: {e}"))),
            None => Ok(JsValue::NULL),
        }
    }
}

/// Build the sheet list for a cover, a back cover and a run of pictures.
#[wasm_bindgen(js_name = layout_pages)]
pub fn layout_pages_js(
    cover: String,
    back_cover: String,
    pictures: JsValue,
) -> Result<JsValue, JsError> {
    let pictures: Vec<String> = if jsvalue_is_undefined_or_null(&pictures) {
        Vec::new()
    } else {
        swb::from_value(pictures).map_err(|e| JsError::new(&format!("pictures error: {e}")))?
    };
    let pages = layout_pages(&cover, &back_cover, &pictures);
    swb::to_value(&pages).map_err(|e| JsError::new(&format!("layout error: {e}")))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
