use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use nutridash_core::{ChartData, ConnectionState, ExtractedRecord, FoodItem, NutritionStats};
use serde::{Deserialize, Serialize};

use crate::{Result, page, state::AppState};

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render(&state))
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Result<Json<NutritionStats>> {
    Ok(Json(state.store()?.nutrition_stats().await?))
}

pub async fn foods_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<FoodItem>>> {
    Ok(Json(state.store()?.list_foods().await?))
}

pub async fn charts_handler(State(state): State<Arc<AppState>>) -> Result<Json<ChartData>> {
    Ok(Json(state.store()?.chart_data().await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    /// Return only the newest `limit` records, newest first.
    pub limit: Option<usize>,
}

pub async fn records_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecordsQuery>,
) -> Json<Vec<ExtractedRecord>> {
    let records = match query.limit {
        Some(n) => state.records.recent(n),
        None => state.records.snapshot(),
    };
    Json(records)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub connection: ConnectionState,
    pub server_url: String,
    pub attempts: u64,
    pub records_appended: u64,
    pub records_retained: usize,
}

pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        connection: state.connection_state(),
        server_url: state.server_url.clone(),
        attempts: state.attempts.get(),
        records_appended: state.records.total_appended(),
        records_retained: state.records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;
    use nutridash_core::{Catalogue, Extractor, RecordLog, connection_state_channel};
    use nutridash_listener::AttemptCounter;
    use nutridash_store::FoodStore;
    use tempfile::TempDir;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn state_with(store: Option<FoodStore>) -> (Arc<AppState>, RecordLog) {
        let (log, _rx) = RecordLog::with_capacity(2);
        let (_tx, rx) = connection_state_channel();
        let state = AppState::new(
            Catalogue::builtin().expect("builtin catalogue should parse"),
            store,
            log.clone(),
            rx,
            AttemptCounter::default(),
            "wss://chat.example.com",
        );
        (state, log)
    }

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn seeded_store() -> (FoodStore, TempDir) {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("web.db").display());
        let store = FoodStore::connect(&url).await.expect("store should connect");
        let catalogue = Catalogue::builtin().expect("builtin catalogue should parse");
        store
            .seed_from_catalogue(&catalogue)
            .await
            .expect("seeding should succeed");
        (store, dir)
    }

    #[tokio::test]
    async fn test_store_endpoints_without_store() {
        let (state, _log) = state_with(None);

        assert!(matches!(
            stats_handler(State(state.clone())).await,
            Err(AppError::NoStore)
        ));
        assert!(matches!(
            foods_handler(State(state.clone())).await,
            Err(AppError::NoStore)
        ));
        assert!(matches!(charts_handler(State(state)).await, Err(AppError::NoStore)));
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_store_endpoints_with_seeded_store() {
        let (store, _dir) = seeded_store().await;
        let (state, _log) = state_with(Some(store));

        let Json(stats) = stats_handler(State(state.clone()))
            .await
            .expect("stats should load");
        assert_eq!(stats.total_calories, 2500);

        let Json(foods) = foods_handler(State(state.clone()))
            .await
            .expect("foods should load");
        assert_eq!(foods.len(), 6);

        let Json(charts) = charts_handler(State(state)).await.expect("charts should load");
        assert_eq!(charts.meal_calories.iter().sum::<i64>(), 2500);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_records_and_status() {
        let (state, log) = state_with(None);
        let extractor = Extractor::with_defaults().expect("default patterns should compile");
        for text in ["I have a fig", "I have a kiwi", "I have a plum"] {
            log.append(extractor.extract_text(text));
        }

        let Json(all) =
            records_handler(State(state.clone()), Query(RecordsQuery::default())).await;
        let names: Vec<_> = all.iter().filter_map(|r| r.food_item.as_deref()).collect();
        assert_eq!(names, ["kiwi", "plum"]);

        let Json(newest) =
            records_handler(State(state.clone()), Query(RecordsQuery { limit: Some(1) })).await;
        assert_eq!(newest[0].food_item.as_deref(), Some("plum"));

        let Json(status) = status_handler(State(state)).await;
        assert_eq!(status.connection, ConnectionState::Disconnected);
        assert_eq!(status.records_appended, 3);
        assert_eq!(status.records_retained, 2);
        assert_eq!(status.attempts, 0);
    }
}
