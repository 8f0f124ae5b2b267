//! In-memory homepage section API.
//!
//! Serves the same routes as the production section store so the client
//! crates can be exercised end to end without a database. Content is
//! normalized on the way in, so stored sections are always canonical.

mod error;
mod seed;

pub use error::{ApiError, MockError, MockResult};
pub use seed::{default_sections, load_seed, parse_seed};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use storefront_model::{
    RawSectionInput, RawSectionPatch, Section, SectionId, reorder_sections, sort_by_order,
};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Base path of the section collection.
pub const SECTIONS_PATH: &str = "/api/homepage-sections";

/// Sections held by the server, sorted by order.
#[derive(Debug, Default)]
pub struct MockState {
    sections: RwLock<Vec<Section>>,
}

impl MockState {
    pub fn new(mut sections: Vec<Section>) -> Self {
        sort_by_order(&mut sections);
        Self {
            sections: RwLock::new(sections),
        }
    }

    /// Copy of the current sections, inactive ones included.
    pub async fn snapshot(&self) -> Vec<Section> {
        self.sections.read().await.clone()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(rename = "includeInactive", default)]
    include_inactive: bool,
}

/// Body of the reorder route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<SectionId>,
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

fn not_found(id: &SectionId) -> ApiError {
    ApiError::NotFound(format!("section {id} not found"))
}

/// Moves `id` to position `order` (clamped to the list) and renumbers every
/// section to its index, so no two sections share an order.
fn place_at(sections: &mut [Section], id: &SectionId, order: i64) {
    sort_by_order(sections);
    let mut ids: Vec<SectionId> = sections
        .iter()
        .filter(|s| &s.id != id)
        .map(|s| s.id.clone())
        .collect();
    let slot = usize::try_from(order.max(0)).map_or(ids.len(), |slot| slot.min(ids.len()));
    ids.insert(slot, id.clone());
    reorder_sections(sections, &ids);
}

fn find_section(sections: &[Section], id: &SectionId) -> Result<Section, ApiError> {
    sections
        .iter()
        .find(|s| &s.id == id)
        .cloned()
        .ok_or_else(|| not_found(id))
}

async fn list_sections(
    State(state): State<Arc<MockState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Section>> {
    let sections = state.sections.read().await;
    let listed: Vec<Section> = sections
        .iter()
        .filter(|s| params.include_inactive || s.active)
        .cloned()
        .collect();
    debug!(
        "Listing {} of {} sections (include_inactive={})",
        listed.len(),
        sections.len(),
        params.include_inactive
    );
    Json(listed)
}

async fn create_section(
    State(state): State<Arc<MockState>>,
    payload: Result<Json<RawSectionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Section>), ApiError> {
    let Json(raw) = payload.map_err(bad_body)?;
    let input = raw.normalize()?;

    let mut sections = state.sections.write().await;
    let requested = input.order;
    let order = requested
        .unwrap_or_else(|| sections.iter().map(|s| s.order + 1).max().unwrap_or(0));
    let id = SectionId::new(format!("sec_{}", Uuid::now_v7().simple()));
    sections.push(input.into_section(id.clone(), order));

    match requested {
        Some(order) => place_at(&mut sections, &id, order),
        None => sort_by_order(&mut sections),
    }
    let section = find_section(&sections, &id)?;
    info!(
        "Created {} section {} at order {}",
        section.section_type(),
        section.id,
        section.order
    );
    Ok((StatusCode::CREATED, Json(section)))
}

async fn update_section(
    State(state): State<Arc<MockState>>,
    Path(id): Path<SectionId>,
    payload: Result<Json<RawSectionPatch>, JsonRejection>,
) -> Result<Json<Section>, ApiError> {
    let Json(raw) = payload.map_err(bad_body)?;

    let mut sections = state.sections.write().await;
    let section = sections
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| not_found(&id))?;
    let patch = raw.normalize(Some(section.section_type()))?;
    section.apply(&patch);

    match patch.order {
        Some(order) => place_at(&mut sections, &id, order),
        None => sort_by_order(&mut sections),
    }
    let updated = find_section(&sections, &id)?;
    info!("Updated section {}", id);
    Ok(Json(updated))
}

async fn delete_section(
    State(state): State<Arc<MockState>>,
    Path(id): Path<SectionId>,
) -> Result<StatusCode, ApiError> {
    let mut sections = state.sections.write().await;
    let before = sections.len();
    sections.retain(|s| s.id != id);
    if sections.len() == before {
        return Err(not_found(&id));
    }
    info!("Deleted section {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder(
    State(state): State<Arc<MockState>>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(bad_body)?;

    let mut seen = HashSet::with_capacity(request.ids.len());
    if let Some(duplicate) = request.ids.iter().find(|id| !seen.insert(*id)) {
        return Err(ApiError::BadRequest(format!(
            "section {duplicate} listed more than once"
        )));
    }

    let mut sections = state.sections.write().await;
    if let Some(unknown) = request
        .ids
        .iter()
        .find(|id| !sections.iter().any(|s| &s.id == *id))
    {
        return Err(not_found(unknown));
    }

    reorder_sections(&mut sections, &request.ids);
    info!("Reordered {} sections", request.ids.len());
    Ok(StatusCode::NO_CONTENT)
}

/// Build the HTTP API router with the given state.
pub fn build_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route(SECTIONS_PATH, get(list_sections).post(create_section))
        .route(&format!("{SECTIONS_PATH}/reorder"), post(reorder))
        .route(
            &format!("{SECTIONS_PATH}/{{id}}"),
            put(update_section).delete(delete_section),
        )
        .with_state(state)
}
