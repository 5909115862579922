use sqlx::PgPool;

use crate::models::job::JobRow;
use crate::models::resume::ResumeRow;

pub async fn insert_job(
    pool: &PgPool,
    description: &str,
    location: &str,
) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (description, location)
        VALUES ($1, $2)
        RETURNING id, description, location, created_at
        "#,
    )
    .bind(description)
    .bind(location)
    .fetch_one(pool)
    .await
}

pub async fn get_job(pool: &PgPool, id: i64) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        "SELECT id, description, location, created_at FROM jobs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub struct NewResume<'a> {
    pub job_id: i64,
    pub file_path: &'a str,
    pub original_filename: &'a str,
    pub candidate_location: Option<&'a str>,
}

pub async fn insert_resume(pool: &PgPool, new: NewResume<'_>) -> Result<ResumeRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (job_id, file_path, original_filename, candidate_location)
        VALUES ($1, $2, $3, $4)
        RETURNING id, job_id, file_path, original_filename, candidate_location, created_at
        "#,
    )
    .bind(new.job_id)
    .bind(new.file_path)
    .bind(new.original_filename)
    .bind(new.candidate_location)
    .fetch_one(pool)
    .await
}

pub async fn get_resume(pool: &PgPool, id: i64) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT id, job_id, file_path, original_filename, candidate_location, created_at
        FROM resumes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_resumes_for_job(
    pool: &PgPool,
    job_id: i64,
) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT id, job_id, file_path, original_filename, candidate_location, created_at
        FROM resumes
        WHERE job_id = $1
        ORDER BY id
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}
