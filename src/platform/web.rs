//! Browser bindings
//!
//! `WebPetalField` is the handle JS drives from `requestAnimationFrame` and
//! pointer events. Frame timestamps are `performance.now()`; the season is
//! read from the wall clock separately.

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::persistence::{AwardError, AwardRequest, AwardSink, NullSink};
use crate::renderer::{PetalRenderer, VertexBatch};
use crate::season::{PaletteSupplier, SeasonalCalendar};
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{CounterAnchor, PetalField, Viewport};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// `prefers-reduced-motion: reduce`; false if the query is unavailable
pub fn prefers_reduced_motion() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.match_media("(prefers-reduced-motion: reduce)") {
        Ok(Some(query)) => query.matches(),
        _ => false,
    }
}

/// Counter badge located by DOM element id (center of its bounding box)
pub struct DomCounterAnchor {
    element_id: String,
}

impl DomCounterAnchor {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl CounterAnchor for DomCounterAnchor {
    fn counter_position(&self) -> Option<Vec2> {
        let element = web_sys::window()?
            .document()?
            .get_element_by_id(&self.element_id)?;
        let rect = element.get_bounding_client_rect();
        if rect.width() <= 0.0 && rect.height() <= 0.0 {
            // Hidden badge
            return None;
        }
        Some(Vec2::new(
            (rect.x() + rect.width() / 2.0) as f32,
            (rect.y() + rect.height() / 2.0) as f32,
        ))
    }
}

/// POSTs each award as JSON; the request runs detached from the frame loop
pub struct FetchSink {
    url: String,
}

impl FetchSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl AwardSink for FetchSink {
    fn award(&mut self, request: AwardRequest) -> Result<(), AwardError> {
        let body = serde_json::to_string(&request)?;
        let url = self.url.clone();
        spawn_local(async move {
            if let Err(e) = post_award(&url, &body).await {
                log::warn!("Award of {} petals not persisted: {}", request.amount, e);
            }
        });
        Ok(())
    }
}

fn js_error(value: JsValue) -> AwardError {
    AwardError::Transport(format!("{:?}", value))
}

async fn post_award(url: &str, body: &str) -> Result<(), AwardError> {
    let window = web_sys::window().ok_or_else(|| AwardError::Transport("no window".into()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = response.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(AwardError::Status(response.status()));
    }
    Ok(())
}

/// JS-facing petal field with its session and vertex batch
#[wasm_bindgen]
pub struct WebPetalField {
    /// Stored preferences, without the OS reduced-motion override
    settings: Settings,
    field: PetalField,
    session: Session,
    batch: VertexBatch,
    last_pointer: Option<Vec2>,
    first_collection_pending: bool,
}

#[wasm_bindgen]
impl WebPetalField {
    /// `counter_element_id`: DOM id of the petal counter badge.
    /// `award_url`: endpoint awards are POSTed to; omitted means offline.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        counter_element_id: Option<String>,
        award_url: Option<String>,
    ) -> WebPetalField {
        let settings = Settings::load();
        let mut effective = settings.clone();
        effective.reduced_motion |= prefers_reduced_motion();

        let calendar = SeasonalCalendar::default();
        let mut field = PetalField::new(&effective, Viewport::new(width, height))
            .with_palette(move |_frame_ms: f64| calendar.palette(js_sys::Date::now()));
        if let Some(id) = counter_element_id {
            field = field.with_anchor(DomCounterAnchor::new(id));
        }

        let sink: Box<dyn AwardSink> = match award_url {
            Some(url) => Box::new(FetchSink::new(url)),
            None => Box::new(NullSink),
        };

        log::info!(
            "Petal field ready ({}x{}, reduced motion: {})",
            width,
            height,
            effective.reduced_motion
        );

        Self {
            settings,
            field,
            session: Session::new(sink),
            batch: VertexBatch::new(),
            last_pointer: None,
            first_collection_pending: false,
        }
    }

    /// Advance one frame and return the vertex data (x, y, r, g, b, a per vertex)
    pub fn tick(&mut self, now_ms: f64) -> js_sys::Float32Array {
        self.field.tick(now_ms);
        self.batch.render(self.field.petals());
        js_sys::Float32Array::from(self.batch.as_floats())
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.field.set_viewport(Viewport::new(width, height));
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.field.set_reduced_motion(reduced);
    }

    /// Switch quality preset ("low", "medium", "high") and persist it;
    /// false for an unknown name
    pub fn set_quality(&mut self, name: &str) -> bool {
        match self.settings.apply_quality(name) {
            Ok(preset) => {
                self.field.set_max_petals(self.settings.max_petals());
                self.settings.save();
                log::info!("Quality set to {}", preset.as_str());
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Pointer down; returns petals awarded by this strike
    pub fn pointer_down(&mut self, x: f32, y: f32) -> u32 {
        let point = Vec2::new(x, y);
        self.field.begin_gesture();
        self.last_pointer = Some(point);
        match self.field.strike(point) {
            Some(event) => self.credit(&event),
            None => 0,
        }
    }

    /// Pointer move; only strikes while a gesture is active
    pub fn pointer_move(&mut self, x: f32, y: f32) -> u32 {
        let point = Vec2::new(x, y);
        let Some(from) = self.last_pointer else {
            return 0;
        };
        self.last_pointer = Some(point);
        let hits = self.field.slash(from, point);
        hits.iter().map(|event| self.credit(event)).sum()
    }

    pub fn pointer_up(&mut self) {
        self.last_pointer = None;
        self.field.end_gesture();
    }

    fn credit(&mut self, event: &crate::sim::CollectionEvent) -> u32 {
        let viewport = *self.field.viewport();
        let update = self.session.record(event, &viewport);
        if update.first_collection {
            self.first_collection_pending = true;
        }
        update.value
    }

    pub fn session_total(&self) -> f64 {
        self.session.total() as f64
    }

    /// Value of the most recent collection (0 before any)
    pub fn last_value(&self) -> u32 {
        self.session.last_value().unwrap_or(0)
    }

    /// True once, after the first petal of the session is collected
    pub fn take_first_collection(&mut self) -> bool {
        std::mem::take(&mut self.first_collection_pending)
    }

    pub fn live_count(&self) -> usize {
        self.field.live_count()
    }
}
