use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::innings::{
    predict_first_innings, predict_second_innings, ChaseOutcome, City, Innings1Request,
    Innings2Request, PredictionError, ScorePrediction, Team, TossDecision,
};
use crate::models::ModelRegistry;

#[derive(Clone)]
pub struct AppState {
    pub models: ModelRegistry,
}

/// Build the Axum router for the prediction form.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/options", get(options_handler))
        .route("/api/innings1", post(innings1_handler))
        .route("/api/innings2", post(innings2_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize)]
struct Options {
    teams: Vec<&'static str>,
    cities: Vec<&'static str>,
    toss_decisions: Vec<&'static str>,
    balls: Vec<u32>,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    score_model: String,
    win_model: String,
}

#[derive(Debug, Serialize)]
struct ScoreResponse {
    #[serde(flatten)]
    prediction: ScorePrediction,
    message: String,
    range: String,
}

#[derive(Debug, Serialize)]
struct ChaseResponse {
    #[serde(flatten)]
    outcome: ChaseOutcome,
    message: String,
    /// Two-decimal labels for the metric cards; absent when already won.
    #[serde(skip_serializing_if = "Option::is_none")]
    win_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loss_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chasing_favored: Option<bool>,
}

async fn index_handler() -> impl IntoResponse {
    Html(FORM_HTML)
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        score_model: state.models.score.name().to_string(),
        win_model: state.models.win.name().to_string(),
    })
}

/// GET /api/options
async fn options_handler() -> Json<Options> {
    Json(Options {
        teams: Team::ALL.iter().map(|t| t.name()).collect(),
        cities: City::ALL.iter().map(|c| c.name()).collect(),
        toss_decisions: TossDecision::ALL.iter().map(|d| d.name()).collect(),
        balls: (0..=5).collect(),
    })
}

/// POST /api/innings1
async fn innings1_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<Innings1Request>,
) -> Result<Json<ScoreResponse>, (StatusCode, String)> {
    let prediction = predict_first_innings(&request, state.models.score.as_ref()).map_err(reject)?;
    Ok(Json(ScoreResponse {
        message: prediction.to_string(),
        range: prediction.range_label(),
        prediction,
    }))
}

/// POST /api/innings2
async fn innings2_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<Innings2Request>,
) -> Result<Json<ChaseResponse>, (StatusCode, String)> {
    let outcome = predict_second_innings(&request, state.models.win.as_ref()).map_err(reject)?;
    let (win_label, loss_label, chasing_favored) = match &outcome {
        ChaseOutcome::Probability(p) => (
            Some(format!("{:.2}%", p.win_pct)),
            Some(format!("{:.2}%", p.loss_pct)),
            Some(p.chasing_favored()),
        ),
        ChaseOutcome::AlreadyWon { .. } => (None, None, None),
    };
    Ok(Json(ChaseResponse {
        message: outcome.to_string(),
        outcome,
        win_label,
        loss_label,
        chasing_favored,
    }))
}

/// Validation problems go back to the user verbatim; model failures are
/// logged and reported generically.
fn reject(err: PredictionError) -> (StatusCode, String) {
    match err {
        PredictionError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        PredictionError::Inference(e) => {
            error!("Prediction failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Prediction failed".to_string(),
            )
        }
    }
}

/// Embedded single-file form (HTML + CSS + JS)
const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>IPL Predictor</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .tabs { display: flex; gap: .5rem; }
  .tab { background: none; border: 1px solid var(--border); color: var(--muted); padding: .5rem 1rem; border-radius: 6px; cursor: pointer; }
  .tab.active { border-color: var(--accent); color: var(--accent); }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; display: none; }
  .panel.active { display: block; }
  .panel h2 { font-size: 1.1rem; margin-bottom: 1rem; }
  .grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  @media (max-width: 768px) { .grid { grid-template-columns: 1fr; } }
  label { display: block; color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; margin-bottom: .3rem; }
  select, input { width: 100%; background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .45rem .6rem; }
  h3 { font-size: .95rem; margin: 1.2rem 0 .6rem; }
  .go { margin-top: 1.2rem; background: var(--accent); color: #fff; border: none; padding: .6rem 1.2rem; border-radius: 6px; cursor: pointer; font-weight: 600; }
  .result { margin-top: 1.2rem; }
  .msg { padding: .8rem 1rem; border-radius: 6px; margin-bottom: .6rem; }
  .msg.ok { background: rgba(0,200,150,.15); color: var(--green); }
  .msg.err { background: rgba(255,79,106,.15); color: var(--red); }
  .metrics { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; margin-bottom: .6rem; }
  .metric { border: 1px solid var(--border); border-radius: 10px; padding: 1rem; }
  .metric .label { color: var(--muted); font-size: .8rem; margin-bottom: .3rem; }
  .metric .value { font-size: 1.6rem; font-weight: 700; }
  footer { padding: 1rem 2rem; color: var(--muted); font-size: .8rem; border-top: 1px solid var(--border); }
</style>
</head>
<body>
<header><h1>🏏 IPL Match Prediction System</h1></header>

<main>
  <div class="tabs">
    <button class="tab active" data-tab="t1">1️⃣ First Innings Score Predictor</button>
    <button class="tab" data-tab="t2">2️⃣ Second Innings Winner Predictor</button>
  </div>

  <section class="panel active" id="t1">
    <h2>First Innings Score Prediction</h2>
    <div class="grid">
      <div>
        <label>Batting Team</label><select id="bat_team" class="team"></select>
        <label>Bowling Team</label><select id="bowl_team" class="team"></select>
      </div>
      <div>
        <label>Toss Winner</label><select id="toss_winner" class="team"></select>
        <label>Toss Decision</label><select id="toss_decision" class="decision"></select>
        <label>Current Score</label><input id="score1" type="number" min="0" step="1" value="0">
        <label>Wickets Fallen</label><input id="wickets1" type="number" min="0" max="10" step="1" value="0">
      </div>
    </div>
    <h3>Overs Completed</h3>
    <div class="grid">
      <div><label>Overs</label><input id="overs1" type="number" min="0" max="20" step="1" value="0"></div>
      <div><label>Balls</label><select id="balls1" class="balls"></select></div>
    </div>
    <button class="go" onclick="predictScore()">Predict Final Score</button>
    <div class="result" id="result1"></div>
  </section>

  <section class="panel" id="t2">
    <h2>Second Innings Winner Prediction</h2>
    <div class="grid">
      <div>
        <label>Batting Team (Chasing)</label><select id="chase_team" class="team"></select>
        <label>Bowling Team (Defending)</label><select id="defend_team" class="team"></select>
        <label>City</label><select id="city" class="city"></select>
      </div>
      <div>
        <label>Target Score</label><input id="target" type="number" min="1" step="1" value="1">
        <label>Current Score</label><input id="score2" type="number" min="0" step="1" value="0">
        <label>Wickets Fallen</label><input id="wickets2" type="number" min="0" max="10" step="1" value="0">
      </div>
    </div>
    <h3>Overs Completed</h3>
    <div class="grid">
      <div><label>Overs</label><input id="overs2" type="number" min="0" max="20" step="1" value="0"></div>
      <div><label>Balls</label><select id="balls2" class="balls"></select></div>
    </div>
    <button class="go" onclick="predictWinner()">Predict Winner</button>
    <div class="result" id="result2"></div>
  </section>
</main>

<footer>IPL ML Prediction System</footer>

<script>
const num = id => parseInt(document.getElementById(id).value, 10) || 0;
const val = id => document.getElementById(id).value;
const fill = (cls, items) => document.querySelectorAll('select.' + cls).forEach(sel => {
  sel.innerHTML = items.map(v => `<option value="${v}">${v}</option>`).join('');
});
const msg = (kind, text) => `<div class="msg ${kind}">${text}</div>`;
// Error text is inserted as plain text.
const showError = (out, text) => {
  const div = document.createElement('div');
  div.className = 'msg err';
  div.textContent = text;
  out.replaceChildren(div);
};

document.querySelectorAll('.tab').forEach(btn => btn.addEventListener('click', () => {
  document.querySelectorAll('.tab').forEach(b => b.classList.toggle('active', b === btn));
  document.querySelectorAll('.panel').forEach(p => p.classList.toggle('active', p.id === btn.dataset.tab));
}));

async function loadOptions() {
  const r = await fetch('/api/options');
  if (!r.ok) return;
  const o = await r.json();
  fill('team', o.teams);
  fill('city', o.cities);
  fill('decision', o.toss_decisions);
  fill('balls', o.balls);
}

async function post(url, body) {
  const r = await fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) });
  const text = await r.text();
  if (!r.ok) throw new Error(text || r.statusText);
  return JSON.parse(text);
}

async function predictScore() {
  const out = document.getElementById('result1');
  try {
    const p = await post('/api/innings1', {
      batting_team: val('bat_team'),
      bowling_team: val('bowl_team'),
      toss_winner: val('toss_winner'),
      toss_decision: val('toss_decision'),
      current_score: num('score1'),
      wickets: num('wickets1'),
      overs: num('overs1'),
      balls: num('balls1'),
    });
    out.innerHTML = msg('ok', `🏏 ${p.message}`) + `<p>${p.range}</p>`;
  } catch (e) {
    showError(out, e.message);
  }
}

async function predictWinner() {
  const out = document.getElementById('result2');
  try {
    const p = await post('/api/innings2', {
      chasing_team: val('chase_team'),
      defending_team: val('defend_team'),
      city: val('city'),
      target: num('target'),
      current_score: num('score2'),
      wickets: num('wickets2'),
      overs: num('overs2'),
      balls: num('balls2'),
    });
    if (p.status === 'already_won') {
      out.innerHTML = msg('ok', `🎉 ${p.message}`);
      return;
    }
    const chasingFavored = p.chasing_favored;
    out.innerHTML = `<h3>Winning Probability</h3>
      <div class="metrics">
        <div class="metric"><div class="label">${p.chasing_team}</div><div class="value">${p.win_label}</div></div>
        <div class="metric"><div class="label">${p.defending_team}</div><div class="value">${p.loss_label}</div></div>
      </div>` + msg(chasingFavored ? 'ok' : 'err', `${chasingFavored ? '✅' : '❌'} ${p.message}`);
  } catch (e) {
    showError(out, e.message);
  }
}

loadOptions();
</script>
</body>
</html>"#;
