//! Picks the office to validate check-ins against.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use attendance_core::config::office::OfficeConfig;
use attendance_core::traits::office::OfficeLocationSource;
use attendance_core::types::geo::OfficeLocation;

/// Where a resolved office came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficeOrigin {
    /// Looked up from the backend.
    Lookup,
    /// The configured fallback.
    Fallback,
}

/// An office together with its origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOffice {
    /// The office to validate against.
    pub location: OfficeLocation,
    /// Whether it was looked up or fell back.
    pub origin: OfficeOrigin,
}

/// Resolves the active office, preferring the backend record.
///
/// Any lookup failure (error, no record, unusable coordinates) falls back to
/// the configured office and is logged; resolution itself never fails.
#[derive(Debug, Clone)]
pub struct OfficeResolver {
    source: Option<Arc<dyn OfficeLocationSource>>,
    fallback: OfficeLocation,
}

impl OfficeResolver {
    /// Creates a resolver with a backend source and a configured fallback.
    pub fn new(source: Arc<dyn OfficeLocationSource>, config: &OfficeConfig) -> Self {
        Self {
            source: Some(source),
            fallback: config.to_location(),
        }
    }

    /// Creates a resolver that always returns the configured office.
    pub fn fallback_only(config: &OfficeConfig) -> Self {
        Self {
            source: None,
            fallback: config.to_location(),
        }
    }

    /// Returns the office to use for the next check-in.
    pub async fn resolve(&self) -> ResolvedOffice {
        let Some(source) = &self.source else {
            return self.fallback();
        };

        match source.find_active_office().await {
            Ok(Some(location)) => match location.coordinates.ensure_valid() {
                Ok(()) => {
                    debug!(label = ?location.label, "Using looked-up office");
                    ResolvedOffice {
                        location,
                        origin: OfficeOrigin::Lookup,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Looked-up office has invalid coordinates, using fallback");
                    self.fallback()
                }
            },
            Ok(None) => {
                debug!("No active office record, using fallback");
                self.fallback()
            }
            Err(e) => {
                warn!(error = %e, "Office lookup failed, using fallback");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> ResolvedOffice {
        ResolvedOffice {
            location: self.fallback.clone(),
            origin: OfficeOrigin::Fallback,
        }
    }
}
