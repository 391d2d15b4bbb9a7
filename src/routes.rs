use std::{path::Path as FsPath, sync::Arc};

use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{debug, info};

use crate::catalog::{self, Module, ModuleSummary, QuizOutcome, Section};
use crate::chat::{ChatBackend, ChatRequest};
use crate::error::{AppError, Result};
use crate::labs::{self, LabKind, LabSpec, RescueReport, RoundOutcome, TranscriptLine, WorkflowBuilder};
use crate::progress::{ProgressSnapshot, ProgressStore};
use crate::reviews::{ReviewRecord, ReviewRequest, ReviewStore};
use crate::validator::{self, FrameworkElement, ValidationResult};

pub struct AppState {
    pub chat: Arc<dyn ChatBackend>,
    pub reviews: ReviewStore,
    pub progress: Mutex<ProgressStore>,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatBackend>, reviews: ReviewStore, progress: ProgressStore) -> Self {
        Self {
            chat,
            reviews,
            progress: Mutex::new(progress),
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    chat: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionView {
    module_id: &'static str,
    section: &'static Section,
    previous: Option<&'static str>,
    next: Option<&'static str>,
    unlocked: bool,
}

#[derive(Debug, Deserialize)]
struct QuizRequest {
    answer: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionRequest {
    section_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeRequest {
    section_id: String,
    seconds: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrollRequest {
    section_id: String,
    fraction: f64,
}

#[derive(Debug, Deserialize)]
struct DevModeRequest {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct PromptRequest {
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct SummaryRequest {
    summary: String,
}

#[derive(Serialize)]
struct ChatReply {
    text: String,
}

#[derive(Serialize)]
struct ComposedWorkflow {
    prompt: String,
    validation: ValidationResult,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        chat: state.chat.is_configured(),
    })
}

async fn list_modules() -> Json<Vec<ModuleSummary>> {
    Json(catalog::modules().iter().map(Module::summary).collect())
}

#[axum::debug_handler]
async fn get_module(Path(id): Path<String>) -> Result<Json<&'static Module>> {
    Ok(Json(catalog::module(&id)?))
}

#[axum::debug_handler]
async fn get_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SectionView>> {
    let (module, section) = catalog::section(&id)?;
    let unlocked = state.progress.lock().await.is_unlocked(section.id)?;
    Ok(Json(SectionView {
        module_id: module.id,
        section,
        previous: catalog::previous_section(section.id)?.map(|s| s.id),
        next: catalog::next_section(section.id)?.map(|s| s.id),
        unlocked,
    }))
}

#[axum::debug_handler]
async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<QuizRequest>,
) -> Result<Json<QuizOutcome>> {
    let outcome = catalog::check_quiz(&id, body.answer)?;
    state.progress.lock().await.record_quiz(&outcome)?;
    debug!("Quiz {} answered: correct={}", id, outcome.correct);
    Ok(Json(outcome))
}

async fn get_progress(State(state): State<Arc<AppState>>) -> Json<ProgressSnapshot> {
    Json(state.progress.lock().await.snapshot())
}

#[axum::debug_handler]
async fn complete_section(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SectionRequest>,
) -> Result<Json<ProgressSnapshot>> {
    let mut progress = state.progress.lock().await;
    progress.mark_complete(&body.section_id)?;
    Ok(Json(progress.snapshot()))
}

#[axum::debug_handler]
async fn set_position(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SectionRequest>,
) -> Result<Json<ProgressSnapshot>> {
    let mut progress = state.progress.lock().await;
    progress.set_position(&body.section_id)?;
    Ok(Json(progress.snapshot()))
}

#[axum::debug_handler]
async fn add_time(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TimeRequest>,
) -> Result<Json<ProgressSnapshot>> {
    let mut progress = state.progress.lock().await;
    progress.add_time(&body.section_id, body.seconds)?;
    Ok(Json(progress.snapshot()))
}

#[axum::debug_handler]
async fn record_scroll(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScrollRequest>,
) -> Result<Json<ProgressSnapshot>> {
    let mut progress = state.progress.lock().await;
    progress.record_scroll(&body.section_id, body.fraction)?;
    Ok(Json(progress.snapshot()))
}

#[axum::debug_handler]
async fn set_dev_mode(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DevModeRequest>,
) -> Json<ProgressSnapshot> {
    let mut progress = state.progress.lock().await;
    progress.set_dev_mode(body.enabled);
    info!("Developer mode {}", if body.enabled { "on" } else { "off" });
    Json(progress.snapshot())
}

async fn reset_progress(State(state): State<Arc<AppState>>) -> Json<ProgressSnapshot> {
    let mut progress = state.progress.lock().await;
    progress.reset();
    info!("Progress reset");
    Json(progress.snapshot())
}

async fn list_elements() -> Json<&'static [FrameworkElement]> {
    Json(validator::elements())
}

async fn validate_prompt(Json(body): Json<PromptRequest>) -> Json<ValidationResult> {
    Json(validator::validate(&body.prompt))
}

#[axum::debug_handler]
async fn get_lab(Path(name): Path<String>) -> Result<Json<&'static LabSpec>> {
    Ok(Json(LabKind::parse(&name)?.spec()))
}

#[axum::debug_handler]
async fn evaluate_round(
    State(state): State<Arc<AppState>>,
    Path((name, round)): Path<(String, usize)>,
    Json(body): Json<PromptRequest>,
) -> Result<Json<RoundOutcome>> {
    let kind = LabKind::parse(&name)?;
    let outcome = labs::evaluate(kind, round, &body.prompt, state.chat.as_ref()).await?;
    info!(
        "Lab {} round {}: {}/{}",
        kind.as_str(),
        round,
        outcome.view.score,
        outcome.view.max
    );
    Ok(Json(outcome))
}

async fn rescue_transcript() -> Json<Vec<(&'static str, &'static str)>> {
    Json(
        labs::TRANSCRIPT
            .iter()
            .map(|TranscriptLine { speaker, text }| (*speaker, *text))
            .collect(),
    )
}

async fn rescue_check(Json(body): Json<SummaryRequest>) -> Json<RescueReport> {
    Json(labs::check_summary(&body.summary))
}

async fn compose_workflow(Json(builder): Json<WorkflowBuilder>) -> Json<ComposedWorkflow> {
    let prompt = builder.compose();
    let validation = validator::validate(&prompt);
    Json(ComposedWorkflow { prompt, validation })
}

#[axum::debug_handler]
async fn chat_completion(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    if body.prompt.trim().is_empty() {
        return Err(AppError::EmptyPrompt);
    }
    let text = state.chat.complete(body).await?;
    Ok(Json(ChatReply { text }))
}

#[axum::debug_handler]
async fn submit_review(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ReviewRecord>> {
    Ok(Json(state.reviews.submit(body.rating, &body.review).await?))
}

async fn list_reviews(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ReviewRecord>>> {
    Ok(Json(state.reviews.list().await?))
}

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/modules", get(list_modules))
        .route("/api/modules/{id}", get(get_module))
        .route("/api/sections/{id}", get(get_section))
        .route("/api/sections/{id}/quiz", post(submit_quiz))
        .route("/api/progress", get(get_progress))
        .route("/api/progress/complete", post(complete_section))
        .route("/api/progress/position", post(set_position))
        .route("/api/progress/time", post(add_time))
        .route("/api/progress/scroll", post(record_scroll))
        .route("/api/progress/dev-mode", post(set_dev_mode))
        .route("/api/progress/reset", post(reset_progress))
        .route("/api/elements", get(list_elements))
        .route("/api/validate", post(validate_prompt))
        .route("/api/labs/{lab}", get(get_lab))
        .route("/api/labs/{lab}/rounds/{round}", post(evaluate_round))
        .route("/api/rescue/transcript", get(rescue_transcript))
        .route("/api/rescue/check", post(rescue_check))
        .route("/api/workflow/compose", post(compose_workflow))
        .route("/api/chat", post(chat_completion))
        .route("/api/reviews", post(submit_review).get(list_reviews))
}

/// API plus the built frontend: `/` serves `index.html` and unknown paths
/// fall through to the static directory.
pub fn app(state: Arc<AppState>, frontend_dir: &FsPath) -> Router {
    api_routes()
        .route_service("/", ServeFile::new(frontend_dir.join("index.html")))
        .fallback_service(ServeDir::new(frontend_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
