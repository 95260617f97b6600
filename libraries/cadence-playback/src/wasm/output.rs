//! `AudioOutput` over a browser `HtmlAudioElement`
//!
//! Listeners are installed per load and carry that load's id. `unload`
//! removes them before the element is touched, so events queued by the
//! browser for an old source never reach the engine.

use crate::error::{PlaybackError, Result};
use crate::output::{AudioOutput, OutputEvent, OutputEventSink};
use crate::types::LoadId;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlAudioElement};

type Listener = Closure<dyn FnMut(Event)>;

pub struct WebAudioOutput {
    element: HtmlAudioElement,
    sink: Option<OutputEventSink>,
    /// Load currently attached; shared with pending play promises
    active: Rc<Cell<Option<LoadId>>>,
    listeners: Vec<(&'static str, Listener)>,
}

impl WebAudioOutput {
    /// Create an output with a detached audio element
    pub fn new() -> Result<Self> {
        let element = HtmlAudioElement::new().map_err(|e| PlaybackError::Load(js_message(&e)))?;
        element.set_preload("auto");
        Ok(Self::with_element(element))
    }

    /// Wrap an element owned by the page
    pub fn with_element(element: HtmlAudioElement) -> Self {
        Self {
            element,
            sink: None,
            active: Rc::new(Cell::new(None)),
            listeners: Vec::new(),
        }
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    fn install_listeners(&mut self, load: LoadId) {
        let Some(sink) = self.sink.clone() else {
            debug!(load, "No event sink attached, listeners skipped");
            return;
        };

        let element = self.element.clone();
        let handlers: [(&'static str, fn(&HtmlAudioElement) -> OutputEvent); 7] = [
            ("loadedmetadata", |el| OutputEvent::MetadataLoaded {
                duration_secs: el.duration(),
            }),
            ("canplay", |_| OutputEvent::Ready),
            ("timeupdate", |el| OutputEvent::TimeUpdate {
                current_time_secs: el.current_time(),
                duration_secs: el.duration(),
            }),
            ("ended", |_| OutputEvent::Ended),
            ("error", |el| OutputEvent::Error {
                message: el
                    .error()
                    .map(|e| format!("media error code {}", e.code()))
                    .unwrap_or_else(|| "unknown media error".to_string()),
            }),
            ("playing", |_| OutputEvent::PlayStarted),
            ("pause", |_| OutputEvent::Paused),
        ];

        for (name, to_event) in handlers {
            let sink = sink.clone();
            let element = element.clone();
            let listener = Closure::wrap(Box::new(move |_event: Event| {
                sink.emit(load, to_event(&element));
            }) as Box<dyn FnMut(Event)>);

            if self
                .element
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .is_err()
            {
                debug!(event = name, "Failed to add media listener");
            }
            self.listeners.push((name, listener));
        }
    }

    fn remove_listeners(&mut self) {
        for (name, listener) in self.listeners.drain(..) {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

impl AudioOutput for WebAudioOutput {
    fn attach_events(&mut self, events: OutputEventSink) {
        self.sink = Some(events);
    }

    fn unload(&mut self) {
        self.remove_listeners();
        self.active.set(None);
        let _ = self.element.pause();
        let _ = self.element.remove_attribute("src");
        self.element.load();
    }

    fn load(&mut self, load: LoadId, url: &str) -> Result<()> {
        self.install_listeners(load);
        self.active.set(Some(load));
        self.element.set_src(url);
        self.element.load();
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let Some(load) = self.active.get() else {
            return Err(PlaybackError::PlayRejected("no source attached".into()));
        };
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::PlayRejected(js_message(&e)))?;

        let active = Rc::clone(&self.active);
        let sink = self.sink.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                // Only the load that issued the request may be rejected
                if active.get() == Some(load) {
                    if let Some(sink) = sink {
                        sink.emit(
                            load,
                            OutputEvent::PlayRejected {
                                message: js_message(&e),
                            },
                        );
                    }
                }
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            debug!(error = %js_message(&e), "Pause request failed");
        }
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        self.element.set_current_time(position_secs);
        Ok(())
    }
}

impl Drop for WebAudioOutput {
    fn drop(&mut self) {
        self.remove_listeners();
        let _ = self.element.pause();
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
