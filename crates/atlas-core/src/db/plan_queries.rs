//! Plan create, read and compare-and-swap update.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, TransactionBehavior};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{AtlasError, DatabaseResultExt, Result},
    models::{Plan, PlanId, PlanStatus},
};

const PLAN_COLUMNS: &str = "plan_id, user_id, status, goal, turn, turns, contributions, warnings, clarification, error, created_at, updated_at, completed_at, processing_ms";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE plan_id = ?1)";
const INSERT_PLAN_SQL: &str = "INSERT INTO plans (plan_id, user_id, status, goal, turn, turns, contributions, warnings, clarification, error, created_at, updated_at, completed_at, processing_ms) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";
const UPDATE_PLAN_SQL: &str = "UPDATE plans SET status = ?1, turn = ?2, turns = ?3, contributions = ?4, warnings = ?5, clarification = ?6, error = ?7, updated_at = ?8, completed_at = ?9, processing_ms = ?10 WHERE plan_id = ?11 AND turn = ?12";

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn json_column<T: DeserializeOwned>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn optional_json_column<T: DeserializeOwned>(
    row: &rusqlite::Row,
    idx: usize,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        serde_json::from_str(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(idx)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Serialized forms of the JSON columns, computed before any SQL runs.
struct EncodedPlan {
    turns: String,
    contributions: String,
    warnings: String,
    error: Option<String>,
}

impl EncodedPlan {
    fn new(plan: &Plan) -> Result<Self> {
        Ok(Self {
            turns: to_json(&plan.turns)?,
            contributions: to_json(&plan.contributions)?,
            warnings: to_json(&plan.warnings)?,
            error: plan.error.as_ref().map(to_json).transpose()?,
        })
    }
}

impl super::Database {
    /// Helper function to construct a Plan from a database row
    fn build_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<Plan> {
        let status_str: String = row.get(2)?;
        let status = status_str.parse::<PlanStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                format!("Invalid plan status: {status_str}").into(),
            )
        })?;

        Ok(Plan {
            plan_id: PlanId::from(row.get::<_, String>(0)?),
            user_id: row.get(1)?,
            status,
            goal: row.get(3)?,
            turn: row.get::<_, i64>(4)? as u64,
            turns: json_column(row, 5)?,
            contributions: json_column(row, 6)?,
            warnings: json_column(row, 7)?,
            clarification: row.get(8)?,
            error: optional_json_column(row, 9)?,
            created_at: timestamp_column(row, 10)?,
            updated_at: timestamp_column(row, 11)?,
            completed_at: row
                .get::<_, Option<String>>(12)?
                .map(|s| s.parse::<Timestamp>())
                .transpose()
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(e))
                })?,
            processing_ms: row.get::<_, i64>(13)? as u64,
        })
    }

    /// Inserts a new plan. Fails with `Conflict` if the ID is taken.
    pub fn insert_plan(&mut self, plan: &Plan) -> Result<()> {
        let encoded = EncodedPlan::new(plan)?;
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_PLAN_EXISTS_SQL, params![plan.plan_id.as_str()], |row| {
                row.get(0)
            })
            .db_context("Failed to check plan existence")?;
        if exists {
            return Err(AtlasError::Conflict {
                plan_id: plan.plan_id.clone(),
            });
        }

        tx.execute(
            INSERT_PLAN_SQL,
            params![
                plan.plan_id.as_str(),
                &plan.user_id,
                plan.status.as_str(),
                &plan.goal,
                plan.turn as i64,
                &encoded.turns,
                &encoded.contributions,
                &encoded.warnings,
                plan.clarification.as_deref(),
                encoded.error.as_deref(),
                plan.created_at.to_string(),
                plan.updated_at.to_string(),
                plan.completed_at.map(|t| t.to_string()),
                plan.processing_ms as i64,
            ],
        )
        .db_context("Failed to insert plan")?;

        tx.commit().db_context("Failed to commit transaction")
    }

    /// Retrieves a plan by its ID.
    pub fn get_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE plan_id = ?1");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        stmt.query_row(params![plan_id.as_str()], Self::build_plan_from_row)
            .optional()
            .db_context("Failed to query plan")
    }

    /// Applies `mutator` to the stored plan if its turn still equals
    /// `expected_turn`, then writes the result back.
    ///
    /// The read, the mutation and the write happen inside one `IMMEDIATE`
    /// transaction, and the `UPDATE` is additionally guarded on the turn. An
    /// error from the mutator rolls everything back.
    pub fn update_plan<F>(
        &mut self,
        plan_id: &PlanId,
        expected_turn: u64,
        mutator: F,
    ) -> Result<Plan>
    where
        F: FnOnce(&mut Plan) -> Result<()>,
    {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE plan_id = ?1");
        let mut plan = tx
            .query_row(&sql, params![plan_id.as_str()], Self::build_plan_from_row)
            .optional()
            .db_context("Failed to query plan")?
            .ok_or_else(|| AtlasError::NotFound {
                plan_id: plan_id.clone(),
            })?;

        if plan.turn != expected_turn {
            return Err(AtlasError::ConcurrentModification {
                plan_id: plan_id.clone(),
                expected_turn,
                actual_turn: plan.turn,
            });
        }

        mutator(&mut plan)?;
        plan.touch();

        let encoded = EncodedPlan::new(&plan)?;
        let updated = tx
            .execute(
                UPDATE_PLAN_SQL,
                params![
                    plan.status.as_str(),
                    plan.turn as i64,
                    &encoded.turns,
                    &encoded.contributions,
                    &encoded.warnings,
                    plan.clarification.as_deref(),
                    encoded.error.as_deref(),
                    plan.updated_at.to_string(),
                    plan.completed_at.map(|t| t.to_string()),
                    plan.processing_ms as i64,
                    plan_id.as_str(),
                    expected_turn as i64,
                ],
            )
            .db_context("Failed to update plan")?;

        if updated == 0 {
            return Err(AtlasError::ConcurrentModification {
                plan_id: plan_id.clone(),
                expected_turn,
                actual_turn: plan.turn,
            });
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }
}
