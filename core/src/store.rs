//! SQLite ledger of generation runs.
//!
//! RULE: Only store.rs talks to the database.
//! The pipeline hands finished profiles to the store; it never executes SQL.

use crate::{
    error::DatasetResult,
    profile::{DailyRecord, Profile},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

pub struct ProfileStore {
    conn: Connection,
}

impl ProfileStore {
    /// Open (or create) the ledger database at `path`.
    pub fn open(path: &str) -> DatasetResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DatasetResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DatasetResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_profiles.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        profile_count: usize,
        generated_at: DateTime<Utc>,
    ) -> DatasetResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, profile_count, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run_id,
                seed as i64,
                version,
                profile_count as i64,
                generated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    // ── Profiles ───────────────────────────────────────────────

    /// Insert every profile and its daily log. All-or-nothing.
    pub fn insert_profiles(&self, run_id: &str, profiles: &[Profile]) -> DatasetResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut profile_stmt = tx.prepare(
                "INSERT INTO profile (
                    run_id, profile_id, seq, age, household_size, goats, chickens,
                    base_risk, poverty_risk
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            let mut day_stmt = tx.prepare(
                "INSERT INTO daily_record (
                    run_id, profile_id, day_index, steps_mean, steps_std, idle_flag,
                    charge_night_fraction, charge_cycles, sms_loan_count
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for (seq, p) in profiles.iter().enumerate() {
                profile_stmt.execute(params![
                    run_id,
                    &p.id,
                    seq as i64,
                    p.age,
                    p.household_size,
                    p.goats,
                    p.chickens,
                    p.base_risk(),
                    p.poverty_risk(),
                ])?;
                for d in &p.daily_records {
                    day_stmt.execute(params![
                        run_id,
                        &p.id,
                        d.day_index,
                        d.steps_mean,
                        d.steps_std,
                        d.idle_flag,
                        d.charge_night_fraction,
                        d.charge_cycles,
                        d.sms_loan_count,
                    ])?;
                }
            }
        }
        tx.commit()?;
        log::info!("store: persisted {} profiles for run {run_id}", profiles.len());
        Ok(())
    }

    pub fn profile_count(&self, run_id: &str) -> DatasetResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM profile WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Labels in generation order.
    pub fn labels(&self, run_id: &str) -> DatasetResult<Vec<f64>> {
        let mut stmt = self.conn.prepare(
            "SELECT poverty_risk FROM profile WHERE run_id = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn daily_records(&self, run_id: &str, profile_id: &str) -> DatasetResult<Vec<DailyRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT day_index, steps_mean, steps_std, idle_flag, charge_night_fraction,
                    charge_cycles, sms_loan_count
             FROM daily_record WHERE run_id = ?1 AND profile_id = ?2
             ORDER BY day_index ASC",
        )?;
        let rows = stmt.query_map(params![run_id, profile_id], |row| {
            Ok(DailyRecord {
                day_index: row.get(0)?,
                steps_mean: row.get(1)?,
                steps_std: row.get(2)?,
                idle_flag: row.get(3)?,
                charge_night_fraction: row.get(4)?,
                charge_cycles: row.get(5)?,
                sms_loan_count: row.get(6)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
