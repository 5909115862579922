// Candidate matching API: job records, resume uploads, scoring and ranking.
// Handlers stay thin; all scoring lives in `crate::scoring`.

pub mod handlers;
pub mod repository;
pub mod storage;
