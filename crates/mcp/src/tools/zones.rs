// Zone listing tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use waktusolat_core::SolatClient;

/// Tool listing JAKIM zone codes with state and district labels.
pub struct ListZonesTool {
    client: Arc<SolatClient>,
}

impl ListZonesTool {
    pub fn new(client: Arc<SolatClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ListZonesArgs {
    #[serde(default)]
    state: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ListZonesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_zones".to_string(),
            description: "List JAKIM prayer zone codes with area descriptions. \
                          Optionally filter by state code (e.g. SGR, JHR, WLY)."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "state": json_schema_string("State code to filter by, e.g. SGR")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ListZonesArgs =
            serde_json::from_value(arguments).context("Invalid arguments for list_zones")?;

        let zones = match self.client.get_zones(args.state.as_deref()).await {
            Ok(zones) => zones,
            Err(e) => return Ok(CallToolResult::error(e.to_string())),
        };
        if zones.is_empty() {
            return Ok(CallToolResult::error("no zones found"));
        }

        let mut seen = HashSet::new();
        let mut lines = vec![
            "Zone   | State              | Area".to_string(),
            "-".repeat(60),
        ];
        for zone in &zones {
            // Upstream occasionally repeats codes across shapes; keep one.
            if seen.insert(zone.code.as_str()) {
                lines.push(format!(
                    "{:6} | {:18} | {}",
                    zone.code, zone.negeri, zone.daerah
                ));
            }
        }
        Ok(CallToolResult::text(lines.join("\n")))
    }
}
