use async_trait::async_trait;
use papa_entities::{popup_steps, popups, shops, EventType};
use sea_orm::{
    ColumnTrait, DatabaseBackend, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter as _, QueryOrder, Statement, Value,
};
use std::sync::Arc;
use tracing::debug;

use super::AnalyticsStore;
use crate::types::{DailyEventCount, QueryFilter, StepCount};

/// Postgres-backed store. Aggregates use parameterized SQL; lookups go
/// through the entities.
pub struct SeaOrmAnalyticsStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAnalyticsStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// WHERE conditions with their positional parameters
struct WhereClause {
    conditions: Vec<String>,
    values: Vec<Value>,
}

impl WhereClause {
    fn for_filter(filter: &QueryFilter, time_column: &str) -> Self {
        let mut clause = WhereClause {
            conditions: Vec::new(),
            values: Vec::new(),
        };

        clause.push("shop_id", "=", filter.shop_id.clone());
        if let Some(popup_id) = &filter.popup_id {
            clause.push("popup_id", "=", popup_id.clone());
        }
        if let Some(range) = &filter.date_range {
            if let Some(start) = range.start {
                clause.push(time_column, ">=", start);
            }
            if let Some(end) = range.end {
                clause.push(time_column, "<=", end);
            }
        }

        clause
    }

    fn next_param(&self) -> usize {
        self.values.len() + 1
    }

    fn push(&mut self, column: &str, op: &str, value: impl Into<Value>) {
        self.conditions
            .push(format!("{} {} ${}", column, op, self.next_param()));
        self.values.push(value.into());
    }

    fn push_event_types(&mut self, event_types: &[EventType]) {
        let placeholders: Vec<String> = event_types
            .iter()
            .enumerate()
            .map(|(i, _)| format!("${}", self.next_param() + i))
            .collect();
        self.conditions
            .push(format!("event_type IN ({})", placeholders.join(", ")));
        self.values
            .extend(event_types.iter().map(|t| Value::from(t.as_str())));
    }

    fn sql(&self) -> String {
        self.conditions.join(" AND ")
    }
}

#[derive(FromQueryResult)]
struct CountRow {
    count: i64,
}

#[derive(FromQueryResult)]
struct StepCountRow {
    step_number: i32,
    count: i64,
}

#[derive(FromQueryResult)]
struct DailyCountRow {
    date: String,
    event_type: String,
    count: i64,
}

fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

impl SeaOrmAnalyticsStore {
    async fn count(&self, sql: String, values: Vec<Value>) -> Result<u64, DbErr> {
        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            values,
        ))
        .one(self.db.as_ref())
        .await?;

        Ok(row.map(|r| to_count(r.count)).unwrap_or(0))
    }
}

#[async_trait]
impl AnalyticsStore for SeaOrmAnalyticsStore {
    async fn find_shop_by_domain(&self, domain: &str) -> Result<Option<shops::Model>, DbErr> {
        shops::Entity::find()
            .filter(shops::Column::ShopDomain.eq(domain))
            .one(self.db.as_ref())
            .await
    }

    async fn find_popup(
        &self,
        shop_id: &str,
        popup_id: &str,
    ) -> Result<Option<popups::Model>, DbErr> {
        popups::Entity::find_by_id(popup_id.to_string())
            .filter(popups::Column::ShopId.eq(shop_id))
            .one(self.db.as_ref())
            .await
    }

    async fn list_steps_for_popup(
        &self,
        popup_id: &str,
    ) -> Result<Vec<popup_steps::Model>, DbErr> {
        popup_steps::Entity::find()
            .filter(popup_steps::Column::PopupId.eq(popup_id))
            .order_by_asc(popup_steps::Column::StepNumber)
            .all(self.db.as_ref())
            .await
    }

    async fn count_events(
        &self,
        filter: &QueryFilter,
        event_types: &[EventType],
    ) -> Result<u64, DbErr> {
        if event_types.is_empty() {
            return Ok(0);
        }

        let mut clause = WhereClause::for_filter(filter, "timestamp");
        clause.push_event_types(event_types);

        let sql = format!(
            "SELECT COUNT(*) AS count FROM popup_events WHERE {}",
            clause.sql()
        );
        debug!("Counting {:?} events for shop {}", event_types, filter.shop_id);

        self.count(sql, clause.values).await
    }

    async fn group_events_by_step_number(
        &self,
        filter: &QueryFilter,
        event_type: EventType,
    ) -> Result<Vec<StepCount>, DbErr> {
        let mut clause = WhereClause::for_filter(filter, "timestamp");
        clause.push("event_type", "=", event_type.as_str());
        clause.conditions.push("step_number IS NOT NULL".to_string());

        let sql = format!(
            r#"
            SELECT
                step_number,
                COUNT(*) AS count
            FROM popup_events
            WHERE {}
            GROUP BY step_number
            ORDER BY step_number ASC
            "#,
            clause.sql()
        );

        let rows = StepCountRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            &sql,
            clause.values,
        ))
        .all(self.db.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| StepCount {
                step_number: row.step_number,
                count: to_count(row.count),
            })
            .collect())
    }

    async fn count_collected_emails(&self, filter: &QueryFilter) -> Result<u64, DbErr> {
        let clause = WhereClause::for_filter(filter, "created_at");
        let sql = format!(
            "SELECT COUNT(*) AS count FROM collected_emails WHERE {}",
            clause.sql()
        );

        self.count(sql, clause.values).await
    }

    async fn daily_event_counts(
        &self,
        filter: &QueryFilter,
        limit: u32,
    ) -> Result<Vec<DailyEventCount>, DbErr> {
        let clause = WhereClause::for_filter(filter, "timestamp");
        let where_clause = clause.sql();
        let limit_param = clause.next_param();
        let mut values = clause.values;
        values.push((limit as i64).into());

        // Dates are UTC calendar days. The same filter parameters are used by
        // both the day selection and the grouping.
        let sql = format!(
            r#"
            WITH recent_days AS (
                SELECT DISTINCT (timestamp AT TIME ZONE 'UTC')::date AS day
                FROM popup_events
                WHERE {where_clause}
                ORDER BY day DESC
                LIMIT ${limit_param}
            )
            SELECT
                to_char((timestamp AT TIME ZONE 'UTC')::date, 'YYYY-MM-DD') AS date,
                event_type,
                COUNT(*) AS count
            FROM popup_events
            WHERE {where_clause}
                AND (timestamp AT TIME ZONE 'UTC')::date IN (SELECT day FROM recent_days)
            GROUP BY 1, 2
            ORDER BY 1 DESC, 2 ASC
            "#
        );

        let rows = DailyCountRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            &sql,
            values,
        ))
        .all(self.db.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailyEventCount {
                date: row.date,
                event_type: row.event_type,
                count: to_count(row.count),
            })
            .collect())
    }
}
