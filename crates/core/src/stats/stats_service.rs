use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::stats_calculator::build_report;
use super::stats_model::ImpactReport;
use crate::constants::{NOTES_TABLE, REQUESTS_TABLE};
use crate::errors::Result;
use crate::materials::StudyMaterial;
use crate::query::{decode_rows, DataClient, SelectQuery};
use crate::requests::MaterialRequest;

#[async_trait]
pub trait StatsServiceTrait: Send + Sync {
    /// Reads every material and request and aggregates them.
    async fn impact_report(&self) -> Result<ImpactReport>;
}

pub struct StatsService {
    client: Arc<dyn DataClient>,
}

impl StatsService {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatsServiceTrait for StatsService {
    async fn impact_report(&self) -> Result<ImpactReport> {
        let materials: Vec<StudyMaterial> = decode_rows(
            self.client
                .select(&SelectQuery::new(NOTES_TABLE))
                .await?,
        )?;
        let requests: Vec<MaterialRequest> = decode_rows(
            self.client
                .select(&SelectQuery::new(REQUESTS_TABLE))
                .await?,
        )?;
        debug!(
            "Building impact report from {} materials and {} requests",
            materials.len(),
            requests.len()
        );
        Ok(build_report(&materials, &requests))
    }
}
