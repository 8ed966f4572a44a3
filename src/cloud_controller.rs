//! Cloud Controller v2 response shapes.
//!
//! Only the fields this tool reads are modelled; everything else in the
//! payloads is ignored.

use serde::Deserialize;

/// A paged v2 list response (`{"resources": [...]}`)
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "E: Deserialize<'de> + Default"))]
pub struct ResourceList<E> {
    #[serde(default)]
    pub resources: Vec<Resource<E>>,
}

/// One list entry: metadata plus a resource-specific entity
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "E: Deserialize<'de> + Default"))]
pub struct Resource<E> {
    pub metadata: Metadata,
    #[serde(default)]
    pub entity: E,
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
    pub guid: String,
}

/// Bindings carry nothing beyond their metadata for our purposes
#[derive(Debug, Default, Deserialize)]
pub struct ServiceBindingEntity {}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppEntity {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceInstanceEntity {
    pub name: String,
    pub dashboard_url: Option<String>,
}

/// `GET /v2/spaces/:guid/summary`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpaceSummary {
    pub services: Vec<SpaceService>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpaceService {
    pub guid: String,
    pub name: String,
    /// Absent for user-provided services
    pub service_plan: Option<ServicePlan>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServicePlan {
    pub service: ServiceOffering,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceOffering {
    pub label: String,
}
