// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Experiment Store
//!
//! The durable persistence adapter for [`ExperimentStore`]. The one method
//! that matters most is [`SqliteExperimentStore::update_phase`]: it performs
//! the conditional `UPDATE ... WHERE phase = ?` and the matching
//! `phase_history` insert inside a single `sqlx` transaction, so a reader
//! never observes a phase change without its audit entry, and a concurrent
//! writer that lost the race sees zero rows affected rather than a partial
//! commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use phoenix_domain::entities::{Actor, AnalysisResult, DeploymentStatus, Experiment, PhaseHistoryEntry, VariantDeployment};
use phoenix_domain::repositories::{ExperimentFilter, ExperimentStore};
use phoenix_domain::{ExperimentConfig, ExperimentId, Phase, PhoenixError, Variant};

/// `phoenix-domain` has no dependency on `sqlx`, so the conversion from its
/// error type has to live here rather than as a blanket `From` impl.
trait DbResultExt<T> {
    fn db(self) -> Result<T, PhoenixError>;
}

impl<T> DbResultExt<T> for Result<T, sqlx::Error> {
    fn db(self) -> Result<T, PhoenixError> {
        self.map_err(|e| PhoenixError::database_error(e.to_string()))
    }
}

pub struct SqliteExperimentStore {
    pool: SqlitePool,
}

impl SqliteExperimentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, PhoenixError> {
        let pool = super::schema::initialize_database(database_url).await.db()?;
        Ok(Self::new(pool))
    }
}

fn row_to_experiment(row: &sqlx::sqlite::SqliteRow) -> Result<Experiment, PhoenixError> {
    let config_json: String = row.try_get("config_json").db()?;
    let config: ExperimentConfig = serde_json::from_str(&config_json)?;

    let results_json: Option<String> = row.try_get("results_json").db()?;
    let results: Option<AnalysisResult> = match results_json {
        Some(s) => Some(serde_json::from_str(&s)?),
        None => None,
    };

    let id_str: String = row.try_get("id").db()?;
    let phase_str: String = row.try_get("phase").db()?;

    Ok(Experiment {
        id: ExperimentId::parse(&id_str)?,
        name: row.try_get("name").db()?,
        description: row.try_get("description").db()?,
        config,
        phase: Phase::from_str(&phase_str).map_err(PhoenixError::validation)?,
        message: row.try_get("message").db()?,
        created_at: row.try_get("created_at").db()?,
        updated_at: row.try_get("updated_at").db()?,
        started_at: row.try_get("started_at").db()?,
        completed_at: row.try_get("completed_at").db()?,
        results,
        owner: row.try_get("owner").db()?,
        degraded_teardown: row.try_get::<i64, _>("degraded_teardown").db()? != 0,
        revision: row.try_get("revision").db()?,
    })
}

fn deployment_status_str(status: DeploymentStatus) -> &'static str {
    match status {
        DeploymentStatus::Pending => "pending",
        DeploymentStatus::Deploying => "deploying",
        DeploymentStatus::Ready => "ready",
        DeploymentStatus::Degraded => "degraded",
        DeploymentStatus::Terminated => "terminated",
        DeploymentStatus::Failed => "failed",
    }
}

fn deployment_status_from_str(s: &str) -> Result<DeploymentStatus, PhoenixError> {
    match s {
        "pending" => Ok(DeploymentStatus::Pending),
        "deploying" => Ok(DeploymentStatus::Deploying),
        "ready" => Ok(DeploymentStatus::Ready),
        "degraded" => Ok(DeploymentStatus::Degraded),
        "terminated" => Ok(DeploymentStatus::Terminated),
        "failed" => Ok(DeploymentStatus::Failed),
        other => Err(PhoenixError::database_error(format!("unknown deployment status '{other}'"))),
    }
}

fn actor_from_str(s: &str) -> Result<Actor, PhoenixError> {
    match s {
        "scheduler" => Ok(Actor::Scheduler),
        "api" => Ok(Actor::Api),
        "user" => Ok(Actor::User),
        other => Err(PhoenixError::database_error(format!("unknown actor '{other}'"))),
    }
}

fn row_to_deployment(row: &sqlx::sqlite::SqliteRow) -> Result<VariantDeployment, PhoenixError> {
    let experiment_id_str: String = row.try_get("experiment_id").db()?;
    let variant_str: String = row.try_get("variant").db()?;
    let status_str: String = row.try_get("status").db()?;
    let hosts_json: String = row.try_get("target_hosts_json").db()?;

    Ok(VariantDeployment {
        experiment_id: ExperimentId::parse(&experiment_id_str)?,
        variant: match variant_str.as_str() {
            "baseline" => Variant::Baseline,
            "candidate" => Variant::Candidate,
            other => return Err(PhoenixError::database_error(format!("unknown variant '{other}'"))),
        },
        config_id: row.try_get("config_id").db()?,
        target_hosts: serde_json::from_str(&hosts_json)?,
        status: deployment_status_from_str(&status_str)?,
        ready_hosts: row.try_get::<i64, _>("ready_hosts").db()? as usize,
        last_error: row.try_get("last_error").db()?,
        namespace: row.try_get("namespace").db()?,
    })
}

#[async_trait]
impl ExperimentStore for SqliteExperimentStore {
    async fn create_experiment(&self, experiment: &Experiment) -> Result<(), PhoenixError> {
        let config_json = serde_json::to_string(&experiment.config)?;
        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM experiments WHERE id = ?")
            .bind(experiment.id.to_string())
            .fetch_optional(&self.pool)
            .await
            .db()?;
        if existing.is_some() {
            return Err(PhoenixError::AlreadyExists(experiment.id.to_string()));
        }

        sqlx::query(
            "INSERT INTO experiments
             (id, name, description, config_json, phase, message, owner, degraded_teardown, revision,
              results_json, created_at, updated_at, started_at, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(experiment.id.to_string())
        .bind(&experiment.name)
        .bind(&experiment.description)
        .bind(config_json)
        .bind(experiment.phase.to_string())
        .bind(&experiment.message)
        .bind(&experiment.owner)
        .bind(experiment.degraded_teardown as i64)
        .bind(&experiment.revision)
        .bind::<Option<String>>(None)
        .bind(experiment.created_at)
        .bind(experiment.updated_at)
        .bind(experiment.started_at)
        .bind(experiment.completed_at)
        .execute(&self.pool)
        .await
        .db()?;
        Ok(())
    }

    async fn get_experiment(&self, id: ExperimentId) -> Result<Experiment, PhoenixError> {
        let row = sqlx::query("SELECT * FROM experiments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .db()?
            .ok_or_else(|| PhoenixError::not_found(id.to_string()))?;
        row_to_experiment(&row)
    }

    async fn list_experiments(&self, filter: &ExperimentFilter) -> Result<Vec<Experiment>, PhoenixError> {
        let rows = sqlx::query("SELECT * FROM experiments ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .db()?;
        let mut experiments = Vec::new();
        for row in &rows {
            let experiment = row_to_experiment(row)?;
            if filter.matches(&experiment) {
                experiments.push(experiment);
            }
        }
        if filter.page_size > 0 {
            let start = filter.page.saturating_mul(filter.page_size).min(experiments.len());
            let end = (start + filter.page_size).min(experiments.len());
            experiments = experiments[start..end].to_vec();
        }
        Ok(experiments)
    }

    async fn update_phase(
        &self,
        id: ExperimentId,
        from: Phase,
        to: Phase,
        message: &str,
        at: DateTime<Utc>,
        entry: PhaseHistoryEntry,
    ) -> Result<(), PhoenixError> {
        let mut tx = self.pool.begin().await.db()?;

        let started_at_clause = if to == Phase::Running { "started_at = COALESCE(started_at, ?1)," } else { "" };
        let completed_at_clause =
            if to.is_terminal() { "completed_at = COALESCE(completed_at, ?1)," } else { "" };

        let sql = format!(
            "UPDATE experiments SET phase = ?2, message = ?3, updated_at = ?1, {started_at_clause} {completed_at_clause} phase = ?2 \
             WHERE id = ?4 AND phase = ?5"
        );

        let result = sqlx::query(&sql)
            .bind(at)
            .bind(to.to_string())
            .bind(message)
            .bind(id.to_string())
            .bind(from.to_string())
            .execute(&mut *tx)
            .await
            .db()?;

        if result.rows_affected() == 0 {
            tx.rollback().await.db()?;
            return Err(PhoenixError::conflict(format!(
                "experiment {id} is not in phase {from} (expected for transition to {to})"
            )));
        }

        sqlx::query(
            "INSERT INTO phase_history (experiment_id, from_phase, to_phase, at, reason, actor)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.experiment_id.to_string())
        .bind(entry.from.to_string())
        .bind(entry.to.to_string())
        .bind(entry.at)
        .bind(&entry.reason)
        .bind(entry.actor.to_string())
        .execute(&mut *tx)
        .await
        .db()?;

        tx.commit().await.db()?;
        Ok(())
    }

    async fn upsert_variant_deployment(&self, deployment: &VariantDeployment) -> Result<(), PhoenixError> {
        let hosts_json = serde_json::to_string(&deployment.target_hosts)?;
        sqlx::query(
            "INSERT INTO variant_deployments
             (experiment_id, variant, config_id, target_hosts_json, status, ready_hosts, last_error, namespace)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (experiment_id, variant) DO UPDATE SET
                config_id = excluded.config_id,
                target_hosts_json = excluded.target_hosts_json,
                status = excluded.status,
                ready_hosts = excluded.ready_hosts,
                last_error = excluded.last_error,
                namespace = excluded.namespace",
        )
        .bind(deployment.experiment_id.to_string())
        .bind(deployment.variant.to_string())
        .bind(&deployment.config_id)
        .bind(hosts_json)
        .bind(deployment_status_str(deployment.status))
        .bind(deployment.ready_hosts as i64)
        .bind(&deployment.last_error)
        .bind(&deployment.namespace)
        .execute(&self.pool)
        .await
        .db()?;
        Ok(())
    }

    async fn get_variant_deployments(
        &self,
        experiment_id: ExperimentId,
    ) -> Result<Vec<VariantDeployment>, PhoenixError> {
        let rows = sqlx::query("SELECT * FROM variant_deployments WHERE experiment_id = ?")
            .bind(experiment_id.to_string())
            .fetch_all(&self.pool)
            .await
            .db()?;
        rows.iter().map(row_to_deployment).collect()
    }

    async fn get_variant_deployment(
        &self,
        experiment_id: ExperimentId,
        variant: Variant,
    ) -> Result<VariantDeployment, PhoenixError> {
        let row = sqlx::query("SELECT * FROM variant_deployments WHERE experiment_id = ? AND variant = ?")
            .bind(experiment_id.to_string())
            .bind(variant.to_string())
            .fetch_optional(&self.pool)
            .await
            .db()?
            .ok_or_else(|| PhoenixError::not_found(format!("deployment {experiment_id}/{variant}")))?;
        row_to_deployment(&row)
    }

    async fn append_phase_history(&self, entry: &PhaseHistoryEntry) -> Result<(), PhoenixError> {
        sqlx::query(
            "INSERT INTO phase_history (experiment_id, from_phase, to_phase, at, reason, actor)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.experiment_id.to_string())
        .bind(entry.from.to_string())
        .bind(entry.to.to_string())
        .bind(entry.at)
        .bind(&entry.reason)
        .bind(entry.actor.to_string())
        .execute(&self.pool)
        .await
        .db()?;
        Ok(())
    }

    async fn get_phase_history(&self, experiment_id: ExperimentId) -> Result<Vec<PhaseHistoryEntry>, PhoenixError> {
        let rows = sqlx::query("SELECT * FROM phase_history WHERE experiment_id = ? ORDER BY at ASC, id ASC")
            .bind(experiment_id.to_string())
            .fetch_all(&self.pool)
            .await
            .db()?;

        rows.iter()
            .map(|row| {
                let from_str: String = row.try_get("from_phase").db()?;
                let to_str: String = row.try_get("to_phase").db()?;
                let actor_str: String = row.try_get("actor").db()?;
                Ok(PhaseHistoryEntry {
                    experiment_id,
                    from: Phase::from_str(&from_str).map_err(PhoenixError::validation)?,
                    to: Phase::from_str(&to_str).map_err(PhoenixError::validation)?,
                    at: row.try_get("at").db()?,
                    reason: row.try_get("reason").db()?,
                    actor: actor_from_str(&actor_str)?,
                })
            })
            .collect()
    }

    async fn write_results(&self, experiment_id: ExperimentId, results: &AnalysisResult) -> Result<(), PhoenixError> {
        let current = self.get_experiment(experiment_id).await?;
        if current.phase != Phase::Analyzing && !current.phase.is_terminal() {
            return Err(PhoenixError::conflict(format!(
                "cannot write results for experiment {experiment_id} in phase {}",
                current.phase
            )));
        }
        let results_json = serde_json::to_string(results)?;
        sqlx::query("UPDATE experiments SET results_json = ?, updated_at = ? WHERE id = ?")
            .bind(results_json)
            .bind(Utc::now())
            .bind(experiment_id.to_string())
            .execute(&self.pool)
            .await
            .db()?;
        Ok(())
    }

    async fn mark_degraded_teardown(&self, experiment_id: ExperimentId) -> Result<(), PhoenixError> {
        sqlx::query("UPDATE experiments SET degraded_teardown = 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(experiment_id.to_string())
            .execute(&self.pool)
            .await
            .db()?;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}
