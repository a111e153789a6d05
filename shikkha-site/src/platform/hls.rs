//! Adaptive streaming through hls.js, with the native HLS support of Safari as fallback.
//!
//! hls.js is loaded by `index.html` as a global `Hls` class.

use std::rc::Rc;

use shikkha_client::playback::{
    Attachment, QualityLevel, QualitySelection, StreamEvent, StreamingBackend, StreamingSession,
};
use shikkha_client::{ClientError, Result};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::js_sys::{self, Array, Reflect};
use web_sys::{HtmlMediaElement, HtmlVideoElement};

const MANIFEST_PARSED: &str = "hlsManifestParsed";
const ERROR: &str = "hlsError";
const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";

#[wasm_bindgen]
extern "C" {
    type Hls;

    #[wasm_bindgen(static_method_of = Hls, js_name = isSupported)]
    fn is_supported() -> bool;

    #[wasm_bindgen(constructor)]
    fn new() -> Hls;

    #[wasm_bindgen(method, js_name = loadSource)]
    fn load_source(this: &Hls, url: &str);

    #[wasm_bindgen(method, js_name = attachMedia)]
    fn attach_media(this: &Hls, media: &HtmlMediaElement);

    #[wasm_bindgen(method)]
    fn on(this: &Hls, event: &str, callback: &js_sys::Function);

    #[wasm_bindgen(method, setter = currentLevel)]
    fn set_current_level(this: &Hls, level: i32);

    #[wasm_bindgen(method)]
    fn destroy(this: &Hls);
}

type EventHandler = Closure<dyn FnMut(JsValue, JsValue)>;

fn hls_available() -> bool {
    Reflect::has(&js_sys::global(), &JsValue::from_str("Hls")).unwrap_or(false)
        && Hls::is_supported()
}

fn property(value: &JsValue, name: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

fn parse_levels(data: &JsValue) -> Vec<QualityLevel> {
    let levels = property(data, "levels");
    if !Array::is_array(&levels) {
        return vec![];
    }

    Array::from(&levels)
        .iter()
        .enumerate()
        .map(|(index, level)| QualityLevel {
            index,
            height: property(&level, "height").as_f64().unwrap_or_default() as u32,
            bitrate: property(&level, "bitrate").as_f64().unwrap_or_default() as u64,
        })
        .collect()
}

fn parse_error(data: &JsValue) -> StreamEvent {
    StreamEvent::Error {
        fatal: property(data, "fatal").as_bool().unwrap_or(false),
        details: property(data, "details")
            .as_string()
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

/// A live hls.js instance. Dropping it destroys the instance, which detaches it from the video
/// element and stops loading segments.
pub struct HlsSession {
    hls: Hls,
    _on_manifest: EventHandler,
    _on_error: EventHandler,
}

impl StreamingSession for HlsSession {
    fn set_quality(&self, selection: QualitySelection) {
        let level = match selection {
            QualitySelection::Auto => -1,
            QualitySelection::Level(index) => index as i32,
        };
        self.hls.set_current_level(level);
    }
}

impl Drop for HlsSession {
    fn drop(&mut self) {
        self.hls.destroy();
    }
}

pub struct HlsBackend {
    video: HtmlVideoElement,
}

impl HlsBackend {
    pub fn new(video: HtmlVideoElement) -> Self {
        Self { video }
    }
}

impl StreamingBackend for HlsBackend {
    type Session = HlsSession;

    fn attach(&self, url: &str, on_event: Rc<dyn Fn(StreamEvent)>) -> Result<Attachment<HlsSession>> {
        if hls_available() {
            let hls = Hls::new();

            let on_manifest: EventHandler = {
                let on_event = Rc::clone(&on_event);
                Closure::new(move |_event: JsValue, data: JsValue| {
                    on_event(StreamEvent::ManifestParsed(parse_levels(&data)))
                })
            };
            let on_error: EventHandler = Closure::new(move |_event: JsValue, data: JsValue| {
                on_event(parse_error(&data))
            });

            hls.on(MANIFEST_PARSED, on_manifest.as_ref().unchecked_ref());
            hls.on(ERROR, on_error.as_ref().unchecked_ref());
            hls.load_source(url);
            hls.attach_media(&self.video);

            return Ok(Attachment::Adaptive(HlsSession {
                hls,
                _on_manifest: on_manifest,
                _on_error: on_error,
            }));
        }

        if !self.video.can_play_type(HLS_MIME_TYPE).is_empty() {
            log::info!("hls.js is unavailable, using native HLS playback");
            self.video.set_src(url);
            return Ok(Attachment::Native);
        }

        Err(ClientError::Stream(
            "HLS playback is not supported by this browser".to_string(),
        ))
    }

    fn detach_native(&self) {
        if let Err(e) = self.video.remove_attribute("src") {
            log::warn!("Failed to unbind the video source: {e:?}");
        }
        // Without a reload the element keeps playing the buffered media
        self.video.load();
    }
}
