//! The batch driver: preflight, discovery, sequential execution, verdict.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{FailurePolicy, RunConfig, JOB_SPEC_EXTENSION};
use crate::discovery::{discover_jobs, JobSpec};
use crate::error::{DriverError, Result};
use crate::preflight::{check_model_dir, prepare_output_dir};
use crate::runner::{JobStatus, PredictionRunner};

/// What happened to one job.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub name: String,
    pub spec_path: PathBuf,
    pub status: JobStatus,
    pub elapsed: Duration,
}

/// Record of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Apply the failure policy to the recorded outcomes.
    pub fn verdict(&self, policy: FailurePolicy) -> Result<()> {
        match policy {
            FailurePolicy::LastInvocation => match self.outcomes.last() {
                Some(last) if !last.status.success() => Err(DriverError::JobFailed {
                    job: last.name.clone(),
                    status: last.status,
                }),
                _ => Ok(()),
            },
            FailurePolicy::AnyInvocation => {
                let failed = self.failed();
                if failed > 0 {
                    Err(DriverError::JobsFailed {
                        failed,
                        total: self.outcomes.len(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Drives one batch through a [`PredictionRunner`].
pub struct BatchDriver<R> {
    config: RunConfig,
    runner: R,
}

impl<R: PredictionRunner> BatchDriver<R> {
    pub fn new(config: RunConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Environment checks followed by job discovery, in that order.
    pub async fn preflight(&self) -> Result<Vec<JobSpec>> {
        check_model_dir(&self.config.model_dir)?;
        prepare_output_dir(&self.config.output_dir)?;
        self.runner.ensure_available().await?;
        discover_jobs(&self.config.input_dir, JOB_SPEC_EXTENSION)
    }

    /// Run the whole batch. Every error is terminal for the batch.
    pub async fn run(&self) -> Result<BatchReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("Batch {} starting (input: {:?})", run_id, self.config.input_dir);

        let jobs = self.preflight().await?;
        info!("Found {} job(s) to run", jobs.len());

        let mut outcomes = Vec::with_capacity(jobs.len());
        if self.config.dry_run {
            for job in &jobs {
                info!("[dry-run] would run prediction for {} ({:?})", job.name, job.path);
            }
        } else {
            for (index, job) in jobs.iter().enumerate() {
                info!("[{}/{}] Running prediction for {}", index + 1, jobs.len(), job.name);
                let clock = Instant::now();
                let status = self
                    .runner
                    .run(&self.config.model_dir, &self.config.output_dir, &job.path)
                    .await?;
                let elapsed = clock.elapsed();

                if status.success() {
                    info!("Job {} finished in {:.1?}", job.name, elapsed);
                } else {
                    warn!("Job {} failed with {}", job.name, status);
                }
                outcomes.push(JobOutcome {
                    name: job.name.clone(),
                    spec_path: job.path.clone(),
                    status,
                    elapsed,
                });
            }
        }

        let report = BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        info!(
            "Batch {} finished: {} succeeded, {} failed",
            run_id,
            report.succeeded(),
            report.failed()
        );

        report.verdict(self.config.failure_policy)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, status: JobStatus) -> JobOutcome {
        JobOutcome {
            name: name.to_string(),
            spec_path: PathBuf::from(format!("{}.json", name)),
            status,
            elapsed: Duration::from_secs(1),
        }
    }

    fn report(statuses: &[JobStatus]) -> BatchReport {
        BatchReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            outcomes: statuses
                .iter()
                .enumerate()
                .map(|(i, s)| outcome(&format!("job{}", i), *s))
                .collect(),
        }
    }

    const FAIL: JobStatus = JobStatus::Failed { code: Some(1) };
    const OK: JobStatus = JobStatus::Succeeded;

    #[test]
    fn test_last_invocation_policy_ignores_earlier_failures() {
        let r = report(&[FAIL, OK]);
        assert!(r.verdict(FailurePolicy::LastInvocation).is_ok());
        assert_eq!(r.failed(), 1);
    }

    #[test]
    fn test_last_invocation_policy_fails_on_final_failure() {
        let r = report(&[OK, FAIL]);
        match r.verdict(FailurePolicy::LastInvocation) {
            Err(DriverError::JobFailed { job, status }) => {
                assert_eq!(job, "job1");
                assert_eq!(status, FAIL);
            }
            other => panic!("unexpected verdict: {:?}", other),
        }
    }

    #[test]
    fn test_any_invocation_policy_counts_failures() {
        let r = report(&[FAIL, OK, OK]);
        assert!(matches!(
            r.verdict(FailurePolicy::AnyInvocation),
            Err(DriverError::JobsFailed { failed: 1, total: 3 })
        ));
    }

    #[test]
    fn test_empty_report_passes_both_policies() {
        let r = report(&[]);
        assert!(r.verdict(FailurePolicy::LastInvocation).is_ok());
        assert!(r.verdict(FailurePolicy::AnyInvocation).is_ok());
    }
}
