use std::collections::HashMap;
use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentFormat, ExtractionError};
use crate::matching::repository::{self, NewResume};
use crate::matching::storage::sanitize_filename;
use crate::models::job::JobRow;
use crate::models::resume::ResumeRow;
use crate::scoring::{
    Candidate, ExtractedProfile, LocationMatch, QualityReport, ScoreBreakdown,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response bodies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub description: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub resume_id: i64,
    pub original_filename: String,
    pub composite: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Serialize)]
pub struct RankingResponse {
    pub job_id: i64,
    pub embedding_model: String,
    pub candidates: Vec<RankingEntry>,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub resume_id: i64,
    pub job_id: i64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Deserialize)]
pub struct AnalyzeResumeRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct AnalyzeResumeResponse {
    pub quality: QualityReport,
    pub profile: ExtractedProfile,
}

#[derive(Deserialize)]
pub struct AnalyzeLocationRequest {
    #[serde(default)]
    pub candidate_location: String,
    #[serde(default)]
    pub job_location: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let description = req.description.trim();
    if description.is_empty() {
        return Err(AppError::Validation("description must not be empty".to_string()));
    }
    let job = repository::insert_job(&state.db, description, req.location.trim()).await?;
    info!("Created job {}", job.id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(load_job(&state, id).await?))
}

/// POST /api/v1/jobs/:id/resumes
///
/// Multipart fields: `resume` (PDF or DOCX file), optional `location`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let job = load_job(&state, job_id).await?;

    let mut upload: Option<(String, Bytes)> = None;
    let mut location: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = sanitize_filename(field.file_name().unwrap_or_default());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
                upload = Some((filename, bytes));
            }
            "location" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid location field: {e}")))?;
                location = Some(text.trim().to_string()).filter(|l| !l.is_empty());
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("missing 'resume' file field".to_string()))?;
    if DocumentFormat::from_path(FsPath::new(&filename)).is_none() {
        return Err(AppError::Validation(format!(
            "'{filename}' is not a PDF or DOCX file"
        )));
    }
    if bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    let stored = state.storage.save(&filename, &bytes).await?;
    let stored = stored.to_string_lossy();
    let resume = repository::insert_resume(
        &state.db,
        NewResume {
            job_id: job.id,
            file_path: &stored,
            original_filename: &filename,
            candidate_location: location.as_deref(),
        },
    )
    .await?;

    info!(
        "Stored resume {} for job {} ({} bytes)",
        resume.id,
        job.id,
        bytes.len()
    );
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/jobs/:id/ranking
pub async fn handle_rank_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<RankingResponse>, AppError> {
    let job = load_job(&state, job_id).await?;
    let resumes = repository::list_resumes_for_job(&state.db, job.id).await?;

    let candidates = extract_candidates(&resumes).await?;

    let ranked = state
        .engine
        .rank_candidates(&job.posting(), candidates)
        .await?;

    let mut filenames: HashMap<i64, String> = resumes
        .into_iter()
        .map(|r| (r.id, r.original_filename))
        .collect();
    let candidates = ranked
        .into_iter()
        .enumerate()
        .map(|(i, r)| RankingEntry {
            rank: i + 1,
            resume_id: r.resume_id,
            original_filename: filenames.remove(&r.resume_id).unwrap_or_default(),
            composite: r.composite,
            breakdown: r.breakdown,
        })
        .collect();

    Ok(Json(RankingResponse {
        job_id: job.id,
        embedding_model: state.engine.model_name().to_string(),
        candidates,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/:id/score
pub async fn handle_score_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ScoreResponse>, AppError> {
    let resume = load_resume(&state, id).await?;
    let job = load_job(&state, resume.job_id).await?;
    let text = extract_text(FsPath::new(&resume.file_path)).await?;

    let breakdown = state
        .engine
        .compute_composite(&job.posting(), &text, resume.candidate_location.as_deref())
        .await?;

    Ok(Json(ScoreResponse {
        resume_id: resume.id,
        job_id: job.id,
        breakdown,
    }))
}

/// GET /api/v1/resumes/:id/file
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let resume = load_resume(&state, id).await?;
    let path = FsPath::new(&resume.file_path);
    let bytes = match state.storage.read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File for resume {id} not found")));
        }
        Err(e) => return Err(e.into()),
    };

    let content_type = DocumentFormat::from_path(path)
        .map(DocumentFormat::content_type)
        .unwrap_or("application/octet-stream");
    let disposition = format!(
        "attachment; filename=\"{}\"",
        resume.original_filename.replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Stateless analysis
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis/resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeResumeRequest>,
) -> Json<AnalyzeResumeResponse> {
    Json(AnalyzeResumeResponse {
        quality: state.engine.evaluate_quality(&req.text),
        profile: state.engine.extract_profile(&req.text),
    })
}

/// POST /api/v1/analysis/location
pub async fn handle_analyze_location(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeLocationRequest>,
) -> Json<LocationMatch> {
    Json(
        state
            .engine
            .match_location(&req.candidate_location, &req.job_location),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Pulls the text of every resume concurrently. Order follows completion.
async fn extract_candidates(resumes: &[ResumeRow]) -> Result<Vec<Candidate>, AppError> {
    let mut extractions = JoinSet::new();
    for resume in resumes {
        let resume_id = resume.id;
        let file_path = resume.file_path.clone();
        let location = resume.candidate_location.clone();
        extractions.spawn(async move {
            let text = extract_text(FsPath::new(&file_path)).await?;
            Ok::<_, ExtractionError>(Candidate {
                resume_id,
                text,
                location,
            })
        });
    }

    let mut candidates = Vec::with_capacity(resumes.len());
    while let Some(joined) = extractions.join_next().await {
        let candidate = joined.map_err(|e| anyhow::anyhow!("extraction task failed: {e}"))??;
        candidates.push(candidate);
    }
    Ok(candidates)
}

async fn load_job(state: &AppState, id: i64) -> Result<JobRow, AppError> {
    repository::get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

async fn load_resume(state: &AppState, id: i64) -> Result<ResumeRow, AppError> {
    repository::get_resume(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume(id: i64, file_path: &std::path::Path, location: Option<&str>) -> ResumeRow {
        ResumeRow {
            id,
            job_id: 1,
            file_path: file_path.to_string_lossy().into_owned(),
            original_filename: format!("cv-{id}.pdf"),
            candidate_location: location.map(str::to_string),
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_extract_candidates_covers_every_resume() {
        let dir = tempfile::tempdir().unwrap();
        let mut rows = Vec::new();
        for id in 1..=4 {
            let path = dir.path().join(format!("{id}.pdf"));
            std::fs::write(&path, b"not really a pdf").unwrap();
            rows.push(resume(id, &path, (id == 2).then_some("Berlin")));
        }

        let mut candidates = extract_candidates(&rows).await.unwrap();
        candidates.sort_by_key(|c| c.resume_id);

        let ids: Vec<i64> = candidates.iter().map(|c| c.resume_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(candidates.iter().all(|c| c.text.is_empty()));
        assert_eq!(candidates[1].location.as_deref(), Some("Berlin"));
    }

    #[tokio::test]
    async fn test_extract_candidates_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.pdf");
        std::fs::write(&present, b"x").unwrap();
        let rows = vec![
            resume(1, &present, None),
            resume(2, &dir.path().join("gone.pdf"), None),
        ];

        let err = extract_candidates(&rows).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Extraction(ExtractionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_candidates_empty() {
        assert!(extract_candidates(&[]).await.unwrap().is_empty());
    }
}
