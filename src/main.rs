//! Petal Drift entry point
//!
//! The browser build is driven from JS through `platform::web::WebPetalField`.
//! Natively this runs a headless session: petals fall, an auto-collector
//! strikes them as they pass the middle of the screen, and every award is
//! written to stdout as a JSON line.
//!
//! Usage: `petal-drift [frames] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let frames: u32 = args.first().and_then(|s| s.parse().ok()).unwrap_or(3600);
    let settings = match args.get(1) {
        Some(path) => match load_settings(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => petal_drift::Settings::default(),
    };

    headless::run(&settings, frames);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> Result<petal_drift::Settings, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(petal_drift::Settings::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;

    use petal_drift::Session;
    use petal_drift::consts::REFERENCE_FRAME_MS;
    use petal_drift::persistence::JsonLinesSink;
    use petal_drift::renderer::{PetalRenderer, VertexBatch};
    use petal_drift::season::SeasonalCalendar;
    use petal_drift::settings::Settings;
    use petal_drift::sim::{PetalField, Viewport};

    pub fn run(settings: &Settings, frames: u32) {
        let start_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);

        let calendar = SeasonalCalendar::default();
        let viewport = Viewport::default();
        let mut field = PetalField::new(settings, viewport).with_palette(calendar);
        let mut session = Session::new(Box::new(JsonLinesSink::new(std::io::stdout())));
        let mut batch = VertexBatch::new();

        log::info!(
            "Petal Drift (native) starting: seed {}, season {:?}, {} frames",
            field.seed(),
            calendar.season_at(start_ms),
            frames
        );

        let mut spawned = 0u32;
        let mut evicted = 0usize;
        let mut peak_vertices = 0usize;

        for frame in 0..frames {
            let now_ms = start_ms + frame as f64 * REFERENCE_FRAME_MS as f64;
            let report = field.tick(now_ms);
            spawned += u32::from(report.spawned.is_some());
            evicted += report.evicted.len();

            // Auto-collector: one tap per frame on the first petal past mid-screen
            let midline = field.viewport().height * 0.5;
            let target = field
                .petals()
                .iter()
                .find(|p| !p.is_collecting() && p.pos.y > midline)
                .map(|p| p.pos);
            if let Some(point) = target {
                tap(&mut field, &mut session, point);
            }

            batch.render(field.petals());
            peak_vertices = peak_vertices.max(batch.len());
        }

        log::info!(
            "Session finished: {} collected ({} petals) of {} spawned, {} drifted away",
            session.total(),
            session.collections(),
            spawned,
            evicted
        );
        log::info!("Peak frame: {} vertices", peak_vertices);
    }

    fn tap(field: &mut PetalField, session: &mut Session, point: Vec2) {
        field.begin_gesture();
        if let Some(event) = field.strike(point) {
            let viewport = *field.viewport();
            session.record(&event, &viewport);
        }
        field.end_gesture();
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
