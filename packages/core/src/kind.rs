//! Resource kinds and their registry entries.

use std::fmt;

use crate::strategy::{
    ActivityStrategy, DealStrategy, DefaultStrategy, OrganizationStrategy, PersonStrategy,
    ProductStrategy, ResourceStrategy, StageStrategy,
};

/// Backend API generation serving a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    /// Path prefix appended to the account's base URL.
    pub fn prefix(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "/v1",
            ApiVersion::V2 => "/api/v2",
        }
    }
}

/// A category of record with its own schema and endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Activity,
    Deal,
    Organization,
    Person,
    Pipeline,
    Product,
    Stage,
    User,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Activity,
        ResourceKind::Deal,
        ResourceKind::Organization,
        ResourceKind::Person,
        ResourceKind::Pipeline,
        ResourceKind::Product,
        ResourceKind::Stage,
        ResourceKind::User,
    ];

    /// Singular lowercase name, as used in V1 `related_objects` keys.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Activity => "activity",
            ResourceKind::Deal => "deal",
            ResourceKind::Organization => "organization",
            ResourceKind::Person => "person",
            ResourceKind::Pipeline => "pipeline",
            ResourceKind::Product => "product",
            ResourceKind::Stage => "stage",
            ResourceKind::User => "user",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Collection path below the version prefix, e.g. `/deals`.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Activity => "/activities",
            ResourceKind::Deal => "/deals",
            ResourceKind::Organization => "/organizations",
            ResourceKind::Person => "/persons",
            ResourceKind::Pipeline => "/pipelines",
            ResourceKind::Product => "/products",
            ResourceKind::Stage => "/stages",
            ResourceKind::User => "/users",
        }
    }

    pub fn api_version(&self) -> ApiVersion {
        match self {
            ResourceKind::User => ApiVersion::V1,
            _ => ApiVersion::V2,
        }
    }

    /// V1 endpoint listing the kind's field definitions, if it has custom fields.
    pub fn fields_path(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Activity => Some("/activityFields"),
            ResourceKind::Deal => Some("/dealFields"),
            ResourceKind::Organization => Some("/organizationFields"),
            ResourceKind::Person => Some("/personFields"),
            ResourceKind::Product => Some("/productFields"),
            ResourceKind::Pipeline | ResourceKind::Stage | ResourceKind::User => None,
        }
    }

    /// Per-kind customization hooks.
    pub fn strategy(&self) -> &'static dyn ResourceStrategy {
        match self {
            ResourceKind::Activity => &ActivityStrategy,
            ResourceKind::Deal => &DealStrategy,
            ResourceKind::Organization => &OrganizationStrategy,
            ResourceKind::Person => &PersonStrategy,
            ResourceKind::Product => &ProductStrategy,
            ResourceKind::Stage => &StageStrategy,
            ResourceKind::Pipeline | ResourceKind::User => &DefaultStrategy,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
