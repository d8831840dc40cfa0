//! Model registry
//!
//! Maps model names to simulation capabilities. Lookups fail fast: an
//! unknown name is always a `ModelNotFound` error, never a silent skip.

use std::collections::HashMap;
use std::sync::Arc;

use super::model::{ControlKind, FnModel, ModelFn, ModelInfo, SimulationModel};
use super::reference::{Doubler, Passthrough, VanDerPol, Vca, VcaCore};
use crate::error::{CompareError, Result};

/// Damping values of the default Van der Pol family
pub const VDP_MU_VALUES: &[f64] = &[0.1, 0.5, 3.0, 8.53];

/// Name of the default Van der Pol model with damping `mu`
pub fn vdp_model_name(mu: f64) -> String {
    format!("vdp_mu={mu}")
}

/// Registry of available simulation models
pub struct ModelRegistry {
    models: HashMap<String, Arc<dyn SimulationModel>>,
}

impl ModelRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Create registry with the stub and reference circuit models
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(Arc::new(Passthrough::new()));
        registry.register(Arc::new(Doubler::new()));
        registry.register(Arc::new(Vca::new("vca_ota", VcaCore::Ota)));
        registry.register(Arc::new(Vca::new("vca_transistor", VcaCore::Transistor)));
        for &mu in VDP_MU_VALUES {
            registry.register(Arc::new(VanDerPol::new(&vdp_model_name(mu), mu)));
        }

        registry
    }

    /// Register a model, replacing any model with the same ID
    pub fn register(&mut self, model: Arc<dyn SimulationModel>) {
        let id = model.id().to_string();
        if self.models.insert(id.clone(), model).is_some() {
            log::debug!("Replaced registered model '{}'", id);
        }
    }

    /// Register a plain function under `id`
    pub fn register_fn(&mut self, id: &str, description: &str, func: ModelFn) {
        let info = ModelInfo::new(id, description, ControlKind::Gain);
        self.register(Arc::new(FnModel::new(info, func)));
    }

    /// Get a model by ID
    pub fn get(&self, id: &str) -> Result<Arc<dyn SimulationModel>> {
        self.models
            .get(id)
            .cloned()
            .ok_or_else(|| CompareError::ModelNotFound {
                model: id.to_string(),
            })
    }

    /// Resolve every name, in order, failing on the first unknown one
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<dyn SimulationModel>>> {
        names.iter().map(|name| self.get(name.as_ref())).collect()
    }

    /// Get model info by ID
    pub fn get_info(&self, id: &str) -> Option<&ModelInfo> {
        self.models.get(id).map(|m| m.info())
    }

    /// List all registered model IDs, sorted
    pub fn list_models(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.models.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// List all model info, sorted by ID
    pub fn list_model_info(&self) -> Vec<&ModelInfo> {
        let mut infos: Vec<&ModelInfo> = self.models.values().map(|m| m.info()).collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// Check if a model is registered
    pub fn has_model(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = ModelRegistry::with_defaults();

        assert!(registry.has_model("passthrough"));
        assert!(registry.has_model("doubler"));
        assert!(registry.has_model("vca_ota"));
        assert!(registry.has_model("vca_transistor"));
        assert!(registry.has_model("vdp_mu=0.5"));
        assert!(registry.has_model("vdp_mu=8.53"));
    }

    #[test]
    fn test_get_model() {
        let registry = ModelRegistry::with_defaults();

        assert!(registry.get("vca_ota").is_ok());
        assert!(matches!(
            registry.get("vca_OTA_x4_cheby7"),
            Err(CompareError::ModelNotFound { model }) if model == "vca_OTA_x4_cheby7"
        ));
    }

    #[test]
    fn test_resolve_preserves_order() {
        let registry = ModelRegistry::with_defaults();
        let models = registry.resolve(&["doubler", "passthrough"]).unwrap();
        let ids: Vec<&str> = models.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["doubler", "passthrough"]);
    }

    #[test]
    fn test_resolve_fails_on_any_unknown() {
        let registry = ModelRegistry::with_defaults();
        assert!(registry.resolve(&["passthrough", "nope", "doubler"]).is_err());
    }

    #[test]
    fn test_register_fn() {
        fn silence(input: &[f64], _control: &[f64], _fs: f64) -> Vec<f64> {
            vec![0.0; input.len()]
        }

        let mut registry = ModelRegistry::new();
        assert!(registry.is_empty());
        registry.register_fn("silence", "Outputs zeros", silence);
        assert_eq!(registry.list_models(), vec!["silence"]);
        assert_eq!(
            registry.get_info("silence").map(|i| i.description.as_str()),
            Some("Outputs zeros")
        );
    }

    #[test]
    fn test_list_models_sorted() {
        let registry = ModelRegistry::with_defaults();
        let models = registry.list_models();
        let mut sorted = models.clone();
        sorted.sort();
        assert_eq!(models, sorted);
        assert_eq!(models.len(), registry.len());
    }
}
