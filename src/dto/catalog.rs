use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizationOptionsQuery {
    pub service_id: Option<String>,
}

/// `customization_ids` is a comma separated id list, e.g. `1,2`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingOptionsQuery {
    pub service_id: Option<String>,
    pub customization_ids: Option<String>,
}

impl PricingOptionsQuery {
    pub fn ids(&self) -> Vec<i32> {
        self.customization_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_skip_blank_and_garbage() {
        let query = PricingOptionsQuery {
            service_id: Some("1".into()),
            customization_ids: Some("1, 2,,x,3".into()),
        };
        assert_eq!(query.ids(), vec![1, 2, 3]);
        assert!(PricingOptionsQuery::default().ids().is_empty());
    }
}
