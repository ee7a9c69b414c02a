use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use chrono::Utc;
use eyre::{Result, WrapErr};
use log::{error, info};
use serde::Deserialize;
use tokio::signal;

use crate::analyzer::{AnalysisResult, Analyzer};
use crate::pages;
use crate::report::SeoReport;
use crate::youtube::VideoSearch;

/// Read-only handles shared by every request
#[derive(Clone)]
pub struct AppState {
    pub search: Option<Arc<dyn VideoSearch>>,
    pub analyzer: Arc<Analyzer>,
    pub max_results: u32,
}

#[derive(Debug, Deserialize)]
pub struct KeywordForm {
    keyword: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    #[serde(default)]
    title: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/seo", get(seo_form).post(submit_keyword))
        .route("/seo/", get(seo_form).post(submit_keyword))
        .route("/seo/report/{keyword}", get(generate_report))
        .route("/seo/analyze-video/{video_id}", get(analyze_video))
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("binding to {addr}"))?;
    info!("Listening on http://{addr}");
    eprintln!("Listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("running HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {e}");
    }
}

async fn index() -> Html<String> {
    Html(pages::index_page())
}

async fn seo_form() -> Html<String> {
    Html(pages::seo_form_page())
}

async fn submit_keyword(Form(form): Form<KeywordForm>) -> Response {
    let keyword = form.keyword.trim();
    if keyword.is_empty() {
        return Redirect::to("/seo/").into_response();
    }
    Redirect::to(&format!("/seo/report/{}", urlencoding::encode(keyword))).into_response()
}

/// Search, aggregate and render the keyword report
pub async fn build_report(search: Option<&dyn VideoSearch>, keyword: &str, max_results: u32) -> Result<SeoReport> {
    let search = search.ok_or_else(|| eyre::eyre!("API de YouTube no configurada"))?;
    let videos = search.search_videos(keyword, max_results).await?;
    let report = SeoReport::build(keyword, videos, Utc::now());
    info!(
        "Report for {keyword:?}: {} videos, {} analyzable",
        report.videos.len(),
        report.analyzable
    );
    Ok(report)
}

async fn generate_report(State(state): State<AppState>, Path(keyword): Path<String>) -> Html<String> {
    match build_report(state.search.as_deref(), &keyword, state.max_results).await {
        Ok(report) => Html(pages::report_page(&report)),
        Err(e) => {
            let msg = format!("Error al generar el informe: {e}");
            error!("{msg}");
            Html(pages::report_error_page(&keyword, &msg))
        }
    }
}

async fn analyze_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(params): Query<AnalyzeParams>,
) -> Html<String> {
    info!("Analyzing video {video_id} ({:?})", params.title);
    match state.analyzer.analyze(&video_id, &params.title).await {
        AnalysisResult::Success(analysis) => Html(pages::analysis_page(&analysis)),
        AnalysisResult::Failure { video_id, error } => Html(pages::analysis_error_page(&video_id, &error)),
    }
}
