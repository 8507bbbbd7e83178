pub mod prayer;
pub mod zones;
mod registry;

use std::sync::Arc;
use waktusolat_core::SolatClient;

pub use prayer::{NextPrayerTool, PrayerTimesMonthTool, PrayerTimesTodayTool};
pub use registry::{json_schema_integer, json_schema_object, json_schema_string, Tool, ToolRegistry};
pub use zones::ListZonesTool;

/// Registry with the full prayer-time tool set, shared by both transports.
pub fn default_registry(client: Arc<SolatClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(PrayerTimesTodayTool::new(client.clone())));
    registry.register(Arc::new(PrayerTimesMonthTool::new(client.clone())));
    registry.register(Arc::new(NextPrayerTool::new(client.clone())));
    registry.register(Arc::new(ListZonesTool::new(client)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_exposes_four_tools() {
        let client = Arc::new(SolatClient::new().unwrap());
        let registry = default_registry(client);
        let names: Vec<_> = registry
            .list_schemas()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "get_next_prayer",
                "get_prayer_times_month",
                "get_prayer_times_today",
                "list_zones",
            ]
        );
        assert!(registry.contains("list_zones"));
        assert!(!registry.contains("delete_everything"));
    }
}
