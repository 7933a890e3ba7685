//! Reference lookups for identified plants
//!
//! Two read-only reference tables back the identification response: plant
//! disease facts and pesticide solutions. Each is searched with an ordered
//! chain of substring-match stages; the first stage with a hit wins.

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use shared::{is_healthy, validate_sql_identifier};
use sqlx::{types::Json, PgPool};

use crate::config::ReferenceTableConfig;
use crate::error::{AppError, AppResult};

/// A reference row as column name → value
pub type ReferenceRecord = Map<String, Value>;

/// Column a filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Plant,
    Disease,
}

/// Case-sensitive "column contains needle" filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatch<'a> {
    pub field: Field,
    pub needle: &'a str,
}

/// Read-only table of reference records
#[axum::async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Name used in logs and status reports
    fn name(&self) -> &str;

    /// First record, in the source's natural order, satisfying every filter
    async fn find_first(&self, filters: &[FieldMatch<'_>]) -> AppResult<Option<ReferenceRecord>>;

    /// Number of records in the source
    async fn count(&self) -> AppResult<i64>;
}

/// Reference table stored in PostgreSQL
#[derive(Clone)]
pub struct PgReferenceSource {
    db: PgPool,
    table: String,
    plant_column: String,
    disease_column: String,
}

impl PgReferenceSource {
    pub fn new(db: PgPool, config: &ReferenceTableConfig) -> AppResult<Self> {
        for identifier in [&config.table, &config.plant_column, &config.disease_column] {
            validate_sql_identifier(identifier).map_err(|msg| {
                AppError::Configuration(format!("invalid reference identifier '{}': {}", identifier, msg))
            })?;
        }

        Ok(Self {
            db,
            table: config.table.clone(),
            plant_column: config.plant_column.clone(),
            disease_column: config.disease_column.clone(),
        })
    }

    fn column(&self, field: Field) -> &str {
        match field {
            Field::Plant => &self.plant_column,
            Field::Disease => &self.disease_column,
        }
    }

    fn select_sql(&self, filters: &[FieldMatch<'_>]) -> String {
        let conditions: Vec<String> = filters
            .iter()
            .enumerate()
            .map(|(index, filter)| {
                format!(
                    "strpos(t.\"{}\"::text, ${}) > 0",
                    self.column(filter.field),
                    index + 1
                )
            })
            .collect();

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        format!(
            "SELECT row_to_json(t) FROM \"{}\" t{} ORDER BY t.ctid LIMIT 1",
            self.table, where_clause
        )
    }
}

#[axum::async_trait]
impl ReferenceSource for PgReferenceSource {
    fn name(&self) -> &str {
        &self.table
    }

    async fn find_first(&self, filters: &[FieldMatch<'_>]) -> AppResult<Option<ReferenceRecord>> {
        let sql = self.select_sql(filters);

        let mut query = sqlx::query_scalar::<_, Json<ReferenceRecord>>(&sql);
        for filter in filters {
            query = query.bind(filter.needle);
        }

        let record = query.fetch_optional(&self.db).await?;
        Ok(record.map(|Json(record)| record))
    }

    async fn count(&self) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", self.table);
        let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.db).await?;
        Ok(count)
    }
}

/// One step of a fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    PlantAndDisease,
    PlantOnly,
    DiseaseOnly,
}

impl MatchStage {
    /// Filters for this stage, or `None` when the stage does not apply
    pub fn filters<'a>(&self, plant: &'a str, disease: &'a str) -> Option<Vec<FieldMatch<'a>>> {
        let plant_match = FieldMatch {
            field: Field::Plant,
            needle: plant,
        };
        let disease_match = FieldMatch {
            field: Field::Disease,
            needle: disease,
        };

        match self {
            MatchStage::PlantAndDisease => Some(vec![plant_match, disease_match]),
            MatchStage::PlantOnly => Some(vec![plant_match]),
            MatchStage::DiseaseOnly => {
                (!disease.is_empty() && !is_healthy(disease)).then(|| vec![disease_match])
            }
        }
    }
}

/// Plant facts are keyed by plant, falling back to the disease name
pub const PLANT_FACTS_CHAIN: &[MatchStage] = &[MatchStage::PlantOnly, MatchStage::DiseaseOnly];

/// Solutions prefer rows naming both plant and disease
pub const SOLUTION_CHAIN: &[MatchStage] = &[
    MatchStage::PlantAndDisease,
    MatchStage::PlantOnly,
    MatchStage::DiseaseOnly,
];

/// Deadline for a single reference query unless configured otherwise
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a best-effort lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupMatch {
    pub found: bool,
    pub record: Option<ReferenceRecord>,
}

impl LookupMatch {
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn found(record: ReferenceRecord) -> Self {
        Self {
            found: true,
            record: Some(record),
        }
    }
}

/// Availability of one reference source
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceStatus {
    Connected { records: i64 },
    Error { message: String },
}

/// Runs fallback chains against a reference source
pub struct LookupService<'a> {
    source: &'a dyn ReferenceSource,
    query_timeout: Duration,
}

impl<'a> LookupService<'a> {
    pub fn new(source: &'a dyn ReferenceSource) -> Self {
        Self {
            source,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Bound every query against the source by `query_timeout`
    pub fn with_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    async fn find_first(&self, filters: &[FieldMatch<'_>]) -> AppResult<Option<ReferenceRecord>> {
        tokio::time::timeout(self.query_timeout, self.source.find_first(filters))
            .await
            .map_err(|_| self.timed_out())?
    }

    async fn count(&self) -> AppResult<i64> {
        tokio::time::timeout(self.query_timeout, self.source.count())
            .await
            .map_err(|_| self.timed_out())?
    }

    fn timed_out(&self) -> AppError {
        AppError::Internal(format!(
            "query on {} timed out after {:?}",
            self.source.name(),
            self.query_timeout
        ))
    }

    /// Walk `chain` until a stage returns a record.
    ///
    /// Source errors end the search and are reported as not found.
    pub async fn search(&self, chain: &[MatchStage], plant: &str, disease: &str) -> LookupMatch {
        for stage in chain {
            let Some(filters) = stage.filters(plant, disease) else {
                continue;
            };

            match self.find_first(&filters).await {
                Ok(Some(record)) => {
                    tracing::debug!(source = self.source.name(), ?stage, "Reference match");
                    return LookupMatch::found(record);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(source = self.source.name(), ?stage, "Reference query failed: {}", e);
                    return LookupMatch::not_found();
                }
            }
        }

        LookupMatch::not_found()
    }

    pub async fn find_plant_facts(&self, plant: &str, disease: &str) -> LookupMatch {
        self.search(PLANT_FACTS_CHAIN, plant, disease).await
    }

    pub async fn find_solution_facts(&self, plant: &str, disease: &str) -> LookupMatch {
        self.search(SOLUTION_CHAIN, plant, disease).await
    }

    pub async fn status(&self) -> SourceStatus {
        match self.count().await {
            Ok(records) => SourceStatus::Connected { records },
            Err(e) => {
                tracing::warn!(source = self.source.name(), "Reference status check failed: {}", e);
                SourceStatus::Error {
                    message: e.to_string(),
                }
            }
        }
    }
}
