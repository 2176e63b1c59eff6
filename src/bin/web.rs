//! Simulation server: runs games on a wall-clock cadence and serves their logs over REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use basketball_sim::logic::BASE_TICK_INTERVAL;
use basketball_sim::{
    ConfigurationError, PerTeam, PersonalFouls, Playback, Preset, RuleSet, SimulationInstance,
    Team, TeamId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Unique identifier for a live simulation.
type SimulationId = Uuid;

/// Where a live simulation is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RunState {
    /// Created or reset; no ticks issued yet.
    Ready,
    Running,
    Paused,
    Finished,
}

/// Per-simulation entry: the game, its playback settings, and last activity time (for auto-cleanup).
struct SimulationEntry {
    instance: SimulationInstance,
    run_state: RunState,
    playback: Playback,
    created_at: DateTime<Utc>,
    last_activity: Instant,
}

/// In-memory state: many simulations by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<SimulationId, SimulationEntry>>>;

/// Inactivity threshold: simulations not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct PresetResponse {
    key: Preset,
    name: &'static str,
    rules: RuleSet,
}

/// Game setup: explicit rules win over a preset name; neither means NBA rules.
#[derive(Deserialize, Default)]
struct SimulationBody {
    #[serde(default)]
    rules: Option<RuleSet>,
    #[serde(default)]
    preset: Option<String>,
    /// Fixed seed for a reproducible game.
    #[serde(default)]
    seed: Option<u64>,
    /// Turn on personal fouls and free throws.
    #[serde(default)]
    fouls: bool,
    #[serde(default = "default_speed")]
    speed: u32,
}

fn default_speed() -> u32 {
    1
}

#[derive(Deserialize)]
struct SpeedBody {
    speed: u32,
}

#[derive(Deserialize)]
struct EventsQuery {
    #[serde(default)]
    since: usize,
}

/// Path segment: simulation id (e.g. /api/simulations/{id})
#[derive(Deserialize)]
struct SimulationPath {
    id: SimulationId,
}

/// Snapshot of a live simulation for polling clients.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationSnapshot<'a> {
    id: SimulationId,
    run_state: RunState,
    speed: u32,
    created_at: DateTime<Utc>,
    rules: &'a RuleSet,
    quarter: u32,
    time: u32,
    shot_clock: u32,
    possession: TeamId,
    score: PerTeam<u32>,
    game_over: bool,
    event_count: usize,
    teams: &'a PerTeam<Team>,
}

impl SimulationEntry {
    fn snapshot(&self, id: SimulationId) -> SimulationSnapshot<'_> {
        let state = self.instance.state();
        SimulationSnapshot {
            id,
            run_state: self.run_state,
            speed: self.playback.speed(),
            created_at: self.created_at,
            rules: self.instance.rules(),
            quarter: state.quarter,
            time: state.time,
            shot_clock: state.shot_clock,
            possession: state.possession,
            score: state.score,
            game_over: state.is_game_over(),
            event_count: state.events.len(),
            teams: self.instance.teams(),
        }
    }
}

/// An empty body means the defaults; anything else must be a valid `SimulationBody`.
fn parse_body(payload: &[u8]) -> Result<SimulationBody, serde_json::Error> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(SimulationBody::default());
    }
    serde_json::from_slice(payload)
}

fn resolve_rules(body: &SimulationBody) -> Result<RuleSet, ConfigurationError> {
    if let Some(rules) = body.rules {
        return Ok(rules);
    }
    match &body.preset {
        Some(name) => Ok(Preset::from_name(name)?.rules()),
        None => Ok(RuleSet::default()),
    }
}

/// Validate the setup and build a game (the configuration boundary for HTTP clients).
fn build_instance(body: &SimulationBody) -> Result<SimulationInstance, ConfigurationError> {
    let rules = resolve_rules(body)?;
    let instance = match body.seed {
        Some(seed) => SimulationInstance::seeded(rules, seed)?,
        None => SimulationInstance::from_entropy(rules)?,
    };
    Ok(if body.fouls {
        instance.with_fouls(PersonalFouls::default())
    } else {
        instance
    })
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Lock, look up, touch last_activity, and hand the entry to `f` (404 if not found).
fn with_simulation(
    state: &AppState,
    id: SimulationId,
    f: impl FnOnce(&mut SimulationEntry) -> HttpResponse,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(entry)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No simulation" })),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "basketball-sim",
    })
}

/// Built-in rule presets.
#[get("/api/presets")]
async fn api_presets() -> HttpResponse {
    let presets: Vec<PresetResponse> = Preset::ALL
        .into_iter()
        .map(|key| PresetResponse {
            key,
            name: key.name(),
            rules: key.rules(),
        })
        .collect();
    HttpResponse::Ok().json(presets)
}

/// Play a whole game immediately; returns the summary and the full event log.
#[post("/api/simulate")]
async fn api_simulate(payload: Bytes) -> HttpResponse {
    let body = match parse_body(&payload) {
        Ok(body) => body,
        Err(e) => return bad_request(e),
    };
    let mut instance = match build_instance(&body) {
        Ok(instance) => instance,
        Err(e) => return bad_request(e),
    };
    let summary = instance.run_to_completion();
    HttpResponse::Ok().json(serde_json::json!({
        "rules": instance.rules(),
        "summary": summary,
        "events": instance.events(),
    }))
}

/// Create a live simulation (returns it with id; client polls it by id).
#[post("/api/simulations")]
async fn api_create_simulation(state: AppState, payload: Bytes) -> HttpResponse {
    let body = match parse_body(&payload) {
        Ok(body) => body,
        Err(e) => return bad_request(e),
    };
    let instance = match build_instance(&body) {
        Ok(instance) => instance,
        Err(e) => return bad_request(e),
    };
    let id = Uuid::new_v4();
    let entry = SimulationEntry {
        instance,
        run_state: RunState::Ready,
        playback: Playback::new(body.speed),
        created_at: Utc::now(),
        last_activity: Instant::now(),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(entry.snapshot(id));
    g.insert(id, entry);
    log::info!("Created simulation {id}");
    response
}

#[get("/api/simulations/{id}")]
async fn api_get_simulation(state: AppState, path: Path<SimulationPath>) -> HttpResponse {
    let id = path.id;
    with_simulation(&state, id, |entry| HttpResponse::Ok().json(entry.snapshot(id)))
}

/// Events logged from index `since` on, for incremental consumers such as a court visualizer.
#[get("/api/simulations/{id}/events")]
async fn api_get_events(
    state: AppState,
    path: Path<SimulationPath>,
    query: Query<EventsQuery>,
) -> HttpResponse {
    with_simulation(&state, path.id, |entry| {
        let events = entry.instance.events();
        HttpResponse::Ok().json(serde_json::json!({
            "events": events.since(query.since),
            "next": events.len(),
            "gameOver": entry.instance.is_game_over(),
        }))
    })
}

/// Start or resume ticking.
#[post("/api/simulations/{id}/start")]
async fn api_start_simulation(state: AppState, path: Path<SimulationPath>) -> HttpResponse {
    let id = path.id;
    with_simulation(&state, id, |entry| {
        if entry.run_state == RunState::Finished {
            return bad_request("Game is over; reset to play again");
        }
        entry.run_state = RunState::Running;
        HttpResponse::Ok().json(entry.snapshot(id))
    })
}

/// Stop issuing ticks; state is kept exactly as it is.
#[post("/api/simulations/{id}/pause")]
async fn api_pause_simulation(state: AppState, path: Path<SimulationPath>) -> HttpResponse {
    let id = path.id;
    with_simulation(&state, id, |entry| {
        if entry.run_state == RunState::Running {
            entry.run_state = RunState::Paused;
        }
        HttpResponse::Ok().json(entry.snapshot(id))
    })
}

/// New rosters and a fresh game under the same rules.
#[post("/api/simulations/{id}/reset")]
async fn api_reset_simulation(state: AppState, path: Path<SimulationPath>) -> HttpResponse {
    let id = path.id;
    with_simulation(&state, id, |entry| {
        entry.instance.reset();
        entry.run_state = RunState::Ready;
        HttpResponse::Ok().json(entry.snapshot(id))
    })
}

/// Change playback speed (1-10 ticks per 50 ms).
#[put("/api/simulations/{id}/speed")]
async fn api_set_speed(state: AppState, path: Path<SimulationPath>, body: Json<SpeedBody>) -> HttpResponse {
    let id = path.id;
    with_simulation(&state, id, |entry| {
        entry.playback = Playback::new(body.speed);
        HttpResponse::Ok().json(entry.snapshot(id))
    })
}

/// Post-game summary (409 until the game is over).
#[get("/api/simulations/{id}/summary")]
async fn api_get_summary(state: AppState, path: Path<SimulationPath>) -> HttpResponse {
    with_simulation(&state, path.id, |entry| {
        if !entry.instance.is_game_over() {
            return HttpResponse::Conflict().json(serde_json::json!({ "error": "Game is still in progress" }));
        }
        HttpResponse::Ok().json(entry.instance.summary())
    })
}

#[delete("/api/simulations/{id}")]
async fn api_delete_simulation(state: AppState, path: Path<SimulationPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.remove(&path.id) {
        Some(_) => HttpResponse::NoContent().finish(),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No simulation" })),
    }
}

/// Step every running simulation by its speed. A tick always completes before a pause or reset
/// can take the lock.
fn tick_running(state: &AppState) {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return,
    };
    for (id, entry) in g.iter_mut() {
        if entry.run_state != RunState::Running {
            continue;
        }
        entry.instance.step_many(entry.playback.ticks_per_interval());
        if entry.instance.is_game_over() {
            entry.run_state = RunState::Finished;
            let score = entry.instance.state().score;
            log::info!("Simulation {id} finished: Team A {} - {} Team B", score.a, score.b);
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<SimulationId, SimulationEntry>::new()));

    // Game clock driver: one wake-up per base interval, each running game advances `speed` seconds.
    let state_ticker = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(BASE_TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            tick_running(&state_ticker);
        }
    });

    // Background task: every 30 minutes, remove simulations inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive simulation(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_presets)
            .service(api_simulate)
            .service(api_create_simulation)
            .service(api_get_simulation)
            .service(api_get_events)
            .service(api_start_simulation)
            .service(api_pause_simulation)
            .service(api_reset_simulation)
            .service(api_set_speed)
            .service(api_get_summary)
            .service(api_delete_simulation)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn state() -> AppState {
        Data::new(RwLock::new(HashMap::new()))
    }

    fn rules_json(three_point_value: i64) -> String {
        serde_json::json!({
            "rules": {
                "scoring": { "threePointValue": three_point_value, "twoPointValue": 2, "freeThrowValue": 1 },
                "time": { "quarterLength": 12, "shotClock": 24 },
                "team": { "playersPerTeam": 5, "foulOutLimit": 6 },
                "advanced": { "bonusRule": true, "threeSecondRule": true, "bonusPossession": false }
            },
            "seed": 1
        })
        .to_string()
    }

    #[::core::prelude::v1::test]
    fn empty_body_means_defaults() {
        let body = parse_body(b"  \n").unwrap();
        assert!(body.rules.is_none());
        assert!(body.preset.is_none());
        assert!(parse_body(b"{\"rules\": 7}").is_err());
    }

    #[actix_web::test]
    async fn simulate_rejects_malformed_rules() {
        let app = test::init_service(App::new().service(api_simulate)).await;
        let req = test::TestRequest::post()
            .uri("/api/simulate")
            .insert_header(("content-type", "application/json"))
            .set_payload(rules_json(-3))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn simulate_uses_the_posted_rules() {
        let app = test::init_service(App::new().service(api_simulate)).await;
        let req = test::TestRequest::post()
            .uri("/api/simulate")
            .insert_header(("content-type", "application/json"))
            .set_payload(rules_json(4))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["rules"]["scoring"]["threePointValue"], 4);
    }

    #[actix_web::test]
    async fn create_rejects_invalid_setups() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .service(api_create_simulation),
        )
        .await;

        let truncated = r#"{"rules": {"scoring": "#.to_string();
        for payload in [
            rules_json(-3),
            rules_json(0),
            truncated,
            r#"{"preset":"streetball"}"#.to_string(),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/simulations")
                .insert_header(("content-type", "application/json"))
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        let req = test::TestRequest::post().uri("/api/simulations").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["runState"], "ready");
        assert_eq!(body["rules"]["time"]["shotClock"], 24);
    }
}
