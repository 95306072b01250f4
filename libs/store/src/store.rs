//! The SQLite store implementation.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::debug;

use rota_engine::{
    Assignments, PeriodGeneration, Person, RotationPolicy, ShiftDefinition, SwapRecord,
    WeekendAssignment,
};
use rota_id::{GenerationId, PersonId, ShiftId};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("not found: {0}")]
    NotFound(String),

    /// Appending a period whose date range collides with an existing one.
    #[error("period starting {new_start} overlaps period starting {existing_start}")]
    OverlappingPeriod {
        new_start: NaiveDate,
        existing_start: NaiveDate,
    },

    /// A stored value no longer parses (id, date, or snapshot JSON).
    #[error("corrupt stored value: {0}")]
    Corrupt(String),
}

/// SQLite-backed store for roster, shift table, history, and weekend track.
pub struct RotaStore {
    conn: Connection,
    policy: RotationPolicy,
}

impl RotaStore {
    /// Open or create a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        // WAL keeps readers unblocked while an operator writes
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self { conn, policy };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory(policy: RotationPolicy) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, policy };
        store.init_schema()?;
        Ok(store)
    }

    /// The rotation policy this store was opened with.
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS people (
                person_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                fixed_shift_id TEXT
            );

            CREATE TABLE IF NOT EXISTS shifts (
                shift_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                starts_at TEXT NOT NULL,
                ends_at TEXT NOT NULL,
                sequence INTEGER NOT NULL,
                min_team INTEGER NOT NULL,
                max_team INTEGER NOT NULL,
                extreme INTEGER NOT NULL DEFAULT 0,
                color TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS generations (
                generation_id TEXT PRIMARY KEY,
                start_date TEXT NOT NULL UNIQUE,
                roster_snapshot TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS assignments (
                generation_id TEXT NOT NULL,
                person_id TEXT NOT NULL,
                shift_id TEXT NOT NULL,
                PRIMARY KEY (generation_id, person_id)
            );

            CREATE TABLE IF NOT EXISTS swaps (
                generation_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                person_a TEXT NOT NULL,
                person_b TEXT NOT NULL,
                PRIMARY KEY (generation_id, seq)
            );

            CREATE TABLE IF NOT EXISTS weekend_assignments (
                date TEXT PRIMARY KEY,
                person_id TEXT NOT NULL,
                generation_id TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_assignments_person ON assignments(person_id);
            CREATE INDEX IF NOT EXISTS idx_weekend_generation ON weekend_assignments(generation_id);
            "#,
        )?;

        debug!("store schema initialized");
        Ok(())
    }

    // =========================================================================
    // People
    // =========================================================================

    /// Insert or update a roster member.
    pub fn upsert_person(&self, person: &Person) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO people (person_id, name, fixed_shift_id)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(person_id) DO UPDATE SET
                name = excluded.name,
                fixed_shift_id = excluded.fixed_shift_id
            "#,
            params![
                person.id.to_string(),
                person.name,
                person.fixed_shift.map(|s| s.to_string()),
            ],
        )?;
        Ok(())
    }

    /// All roster members, in stable identifier order.
    pub fn list_people(&self) -> Result<Vec<Person>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT person_id, name, fixed_shift_id FROM people ORDER BY person_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, name, fixed)| {
                Ok(Person {
                    id: parse_person_id(&id)?,
                    name,
                    fixed_shift: fixed.as_deref().map(parse_shift_id).transpose()?,
                })
            })
            .collect()
    }

    /// One roster member.
    pub fn get_person(&self, person: PersonId) -> Result<Option<Person>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT person_id, name, fixed_shift_id FROM people WHERE person_id = ?1",
                params![person.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, name, fixed)| {
            Ok(Person {
                id: parse_person_id(&id)?,
                name,
                fixed_shift: fixed.as_deref().map(parse_shift_id).transpose()?,
            })
        })
        .transpose()
    }

    /// Delete a person and cascade into history.
    ///
    /// Removes the person's assignment rows from every period and their
    /// weekend duty days. Roster snapshots stay untouched: they record the
    /// team as it was, and other people's rows are never renumbered.
    pub fn delete_person(&mut self, person: PersonId) -> Result<(), StoreError> {
        let key = person.to_string();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM assignments WHERE person_id = ?1", params![key])?;
        tx.execute(
            "DELETE FROM weekend_assignments WHERE person_id = ?1",
            params![key],
        )?;
        let removed = tx.execute("DELETE FROM people WHERE person_id = ?1", params![key])?;
        tx.commit()?;

        if removed == 0 {
            return Err(StoreError::NotFound(format!("person {person}")));
        }
        debug!(%person, "deleted person and cascaded into history");
        Ok(())
    }

    // =========================================================================
    // Shift definitions
    // =========================================================================

    /// Insert or update a shift definition.
    pub fn upsert_shift(&self, shift: &ShiftDefinition) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO shifts (shift_id, name, starts_at, ends_at, sequence, min_team, max_team, extreme, color)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(shift_id) DO UPDATE SET
                name = excluded.name,
                starts_at = excluded.starts_at,
                ends_at = excluded.ends_at,
                sequence = excluded.sequence,
                min_team = excluded.min_team,
                max_team = excluded.max_team,
                extreme = excluded.extreme,
                color = excluded.color
            "#,
            params![
                shift.id.to_string(),
                shift.name,
                shift.starts_at.to_string(),
                shift.ends_at.to_string(),
                shift.sequence,
                shift.min_team,
                shift.max_team,
                shift.extreme,
                shift.color,
            ],
        )?;
        Ok(())
    }

    /// All shift definitions in rotation (sequence) order.
    pub fn list_shifts(&self) -> Result<Vec<ShiftDefinition>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT shift_id, name, starts_at, ends_at, sequence, min_team, max_team, extreme, color
            FROM shifts ORDER BY sequence, shift_id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, u32>(6)?,
                    row.get::<_, bool>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(id, name, starts_at, ends_at, sequence, min_team, max_team, extreme, color)| {
                    Ok(ShiftDefinition {
                        id: parse_shift_id(&id)?,
                        name,
                        starts_at: parse_time(&starts_at)?,
                        ends_at: parse_time(&ends_at)?,
                        sequence,
                        min_team,
                        max_team,
                        extreme,
                        color,
                    })
                },
            )
            .collect()
    }

    /// Delete a shift definition. Historical assignments keep the id.
    pub fn delete_shift(&self, shift: ShiftId) -> Result<(), StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM shifts WHERE shift_id = ?1",
            params![shift.to_string()],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(format!("shift {shift}")));
        }
        Ok(())
    }

    // =========================================================================
    // Period history
    // =========================================================================

    /// Append a generated period to history.
    ///
    /// Rejects any period whose date range overlaps an existing one; the
    /// period length comes from the store's policy.
    pub fn append_generation(&mut self, generation: &PeriodGeneration) -> Result<(), StoreError> {
        let period_days = i64::from(self.policy.period_days);
        let existing_starts: Vec<NaiveDate> = {
            let mut stmt = self.conn.prepare("SELECT start_date FROM generations")?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            rows.iter()
                .map(|s| parse_date(s))
                .collect::<Result<Vec<_>, _>>()?
        };
        for existing in existing_starts {
            if (generation.start_date - existing).num_days().abs() < period_days {
                return Err(StoreError::OverlappingPeriod {
                    new_start: generation.start_date,
                    existing_start: existing,
                });
            }
        }

        let roster_snapshot = serde_json::to_string(&generation.roster)
            .map_err(|e| StoreError::Corrupt(format!("roster snapshot: {e}")))?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO generations (generation_id, start_date, roster_snapshot) VALUES (?1, ?2, ?3)",
            params![
                generation.id.to_string(),
                generation.start_date.to_string(),
                roster_snapshot,
            ],
        )?;
        for (person, shift) in &generation.assignments {
            tx.execute(
                "INSERT INTO assignments (generation_id, person_id, shift_id) VALUES (?1, ?2, ?3)",
                params![
                    generation.id.to_string(),
                    person.to_string(),
                    shift.to_string()
                ],
            )?;
        }
        for (seq, swap) in generation.swaps.iter().enumerate() {
            tx.execute(
                "INSERT INTO swaps (generation_id, seq, person_a, person_b) VALUES (?1, ?2, ?3, ?4)",
                params![
                    generation.id.to_string(),
                    (seq + 1) as i64,
                    swap.person_a.to_string(),
                    swap.person_b.to_string()
                ],
            )?;
        }
        tx.commit()?;

        debug!(generation = %generation.id, start = %generation.start_date, "appended period");
        Ok(())
    }

    /// One period by id.
    pub fn get_generation(
        &self,
        generation: GenerationId,
    ) -> Result<Option<PeriodGeneration>, StoreError> {
        let header = self
            .conn
            .query_row(
                "SELECT generation_id, start_date, roster_snapshot FROM generations WHERE generation_id = ?1",
                params![generation.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        header
            .map(|(id, start, roster)| self.load_generation(&id, &start, &roster))
            .transpose()
    }

    /// Full history ordered by start date (oldest first).
    pub fn list_generations(&self) -> Result<Vec<PeriodGeneration>, StoreError> {
        let headers: Vec<(String, String, String)> = {
            let mut stmt = self.conn.prepare(
                "SELECT generation_id, start_date, roster_snapshot FROM generations ORDER BY start_date",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        headers
            .iter()
            .map(|(id, start, roster)| self.load_generation(id, start, roster))
            .collect()
    }

    /// The most recent period, if any.
    pub fn latest_generation(&self) -> Result<Option<PeriodGeneration>, StoreError> {
        Ok(self.list_generations()?.pop())
    }

    /// Replace a period's assignment map (swap engine write path).
    pub fn replace_assignments(
        &mut self,
        generation: GenerationId,
        assignments: &Assignments,
    ) -> Result<(), StoreError> {
        let key = generation.to_string();
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM generations WHERE generation_id = ?1)",
            params![key],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::NotFound(format!("generation {generation}")));
        }

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM assignments WHERE generation_id = ?1", params![key])?;
        for (person, shift) in assignments {
            tx.execute(
                "INSERT INTO assignments (generation_id, person_id, shift_id) VALUES (?1, ?2, ?3)",
                params![key, person.to_string(), shift.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Record a manual pairwise swap against a period.
    pub fn record_swap(
        &self,
        generation: GenerationId,
        person_a: PersonId,
        person_b: PersonId,
    ) -> Result<(), StoreError> {
        let next_seq: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM swaps WHERE generation_id = ?1",
            params![generation.to_string()],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT INTO swaps (generation_id, seq, person_a, person_b) VALUES (?1, ?2, ?3, ?4)",
            params![
                generation.to_string(),
                next_seq,
                person_a.to_string(),
                person_b.to_string()
            ],
        )?;
        Ok(())
    }

    fn load_generation(
        &self,
        id: &str,
        start_date: &str,
        roster_snapshot: &str,
    ) -> Result<PeriodGeneration, StoreError> {
        let roster: Vec<Person> = serde_json::from_str(roster_snapshot)
            .map_err(|e| StoreError::Corrupt(format!("roster snapshot for {id}: {e}")))?;

        let mut assignments = Assignments::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT person_id, shift_id FROM assignments WHERE generation_id = ?1",
            )?;
            let rows = stmt
                .query_map(params![id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            for (person, shift) in rows {
                assignments.insert(parse_person_id(&person)?, parse_shift_id(&shift)?);
            }
        }

        let swaps = {
            let mut stmt = self.conn.prepare(
                "SELECT person_a, person_b FROM swaps WHERE generation_id = ?1 ORDER BY seq",
            )?;
            let rows = stmt
                .query_map(params![id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|(a, b)| {
                    Ok(SwapRecord {
                        person_a: parse_person_id(&a)?,
                        person_b: parse_person_id(&b)?,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()?
        };

        Ok(PeriodGeneration {
            id: parse_generation_id(id)?,
            start_date: parse_date(start_date)?,
            assignments,
            roster,
            swaps,
        })
    }

    // =========================================================================
    // Weekend track
    // =========================================================================

    /// Append (or overwrite) weekend duty days.
    pub fn append_weekend(&mut self, duty: &[WeekendAssignment]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for wa in duty {
            tx.execute(
                r#"
                INSERT INTO weekend_assignments (date, person_id, generation_id)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(date) DO UPDATE SET
                    person_id = excluded.person_id,
                    generation_id = excluded.generation_id
                "#,
                params![
                    wa.date.to_string(),
                    wa.person.to_string(),
                    wa.generation.to_string()
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Weekend duty tied to one generation, in date order.
    pub fn list_weekend_for(
        &self,
        generation: GenerationId,
    ) -> Result<Vec<WeekendAssignment>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, person_id, generation_id FROM weekend_assignments WHERE generation_id = ?1 ORDER BY date",
        )?;
        let rows = stmt
            .query_map(params![generation.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(date, person, generation)| {
                Ok(WeekendAssignment {
                    date: parse_date(date)?,
                    person: parse_person_id(person)?,
                    generation: parse_generation_id(generation)?,
                })
            })
            .collect()
    }

    /// Replace one generation's weekend pattern (weekend swap write path).
    pub fn replace_weekend_for(
        &mut self,
        generation: GenerationId,
        duty: &[WeekendAssignment],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM weekend_assignments WHERE generation_id = ?1",
            params![generation.to_string()],
        )?;
        for wa in duty {
            tx.execute(
                "INSERT INTO weekend_assignments (date, person_id, generation_id) VALUES (?1, ?2, ?3)",
                params![
                    wa.date.to_string(),
                    wa.person.to_string(),
                    wa.generation.to_string()
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Drop a whole month of weekend duty — the track's deletion
    /// granularity.
    pub fn delete_weekend_month(&self, year: i32, month: u32) -> Result<usize, StoreError> {
        let prefix = format!("{year:04}-{month:02}");
        let removed = self.conn.execute(
            "DELETE FROM weekend_assignments WHERE substr(date, 1, 7) = ?1",
            params![prefix],
        )?;
        Ok(removed)
    }
}

fn parse_person_id(s: &str) -> Result<PersonId, StoreError> {
    PersonId::parse(s).map_err(|e| StoreError::Corrupt(format!("person id '{s}': {e}")))
}

fn parse_shift_id(s: &str) -> Result<ShiftId, StoreError> {
    ShiftId::parse(s).map_err(|e| StoreError::Corrupt(format!("shift id '{s}': {e}")))
}

fn parse_generation_id(s: &str) -> Result<GenerationId, StoreError> {
    GenerationId::parse(s).map_err(|e| StoreError::Corrupt(format!("generation id '{s}': {e}")))
}

fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    s.parse()
        .map_err(|e| StoreError::Corrupt(format!("date '{s}': {e}")))
}

fn parse_time(s: &str) -> Result<chrono::NaiveTime, StoreError> {
    s.parse()
        .map_err(|e| StoreError::Corrupt(format!("time '{s}': {e}")))
}
