use std::collections::HashSet;
use std::sync::Arc;

use crate::adapters::{EsriAdapter, GisgraphyAdapter, NominatimAdapter, OpenCageAdapter};
use crate::config::GeocoderConfig;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::provider::{Provider, ProviderDescriptor};
use crate::{ProviderId, ValidationError};

/// Immutable, ordered set of configured providers.
///
/// Built once and shared read-only by every dispatch.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl ProviderRegistry {
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateProvider`] if two providers share
    /// an id.
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(providers.len());
        for provider in &providers {
            if !seen.insert(provider.id()) {
                return Err(ValidationError::DuplicateProvider {
                    id: provider.id().as_str().to_owned(),
                });
            }
        }

        Ok(Self { providers })
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Provider>> {
        self.providers.iter()
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|provider| provider.id()).collect()
    }

    pub fn get(&self, id: ProviderId) -> Option<&Arc<dyn Provider>> {
        self.providers.iter().find(|provider| provider.id() == id)
    }

    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers
            .iter()
            .map(|provider| provider.descriptor().clone())
            .collect()
    }

    /// Registry-ordered subset whose ids appear in `ids`.
    ///
    /// Unknown or repeated ids are ignored; the registry itself is untouched.
    pub fn active(&self, ids: &[ProviderId]) -> Vec<Arc<dyn Provider>> {
        for id in ids {
            if self.get(*id).is_none() {
                tracing::warn!(provider = %id, "requested provider is not registered");
            }
        }

        self.providers
            .iter()
            .filter(|provider| ids.contains(&provider.id()))
            .cloned()
            .collect()
    }
}

/// Builder for a [`ProviderRegistry`] of the built-in adapters.
///
/// # Example
///
/// ```rust,ignore
/// use yonder_core::{GeocoderConfig, RegistryBuilder};
///
/// let registry = RegistryBuilder::new(GeocoderConfig::from_env())
///     .with_gisgraphy_enabled(false)
///     .build()?;
/// ```
pub struct RegistryBuilder {
    config: GeocoderConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    enable_opencage: bool,
    enable_nominatim: bool,
    enable_esri: bool,
    enable_gisgraphy: bool,
}

impl RegistryBuilder {
    pub fn new(config: GeocoderConfig) -> Self {
        Self {
            config,
            http_client: None,
            enable_opencage: true,
            enable_nominatim: true,
            enable_esri: true,
            enable_gisgraphy: true,
        }
    }

    /// Inject the transport. Defaults to [`ReqwestHttpClient`].
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_opencage_enabled(mut self, enabled: bool) -> Self {
        self.enable_opencage = enabled;
        self
    }

    pub fn with_nominatim_enabled(mut self, enabled: bool) -> Self {
        self.enable_nominatim = enabled;
        self
    }

    pub fn with_esri_enabled(mut self, enabled: bool) -> Self {
        self.enable_esri = enabled;
        self
    }

    pub fn with_gisgraphy_enabled(mut self, enabled: bool) -> Self {
        self.enable_gisgraphy = enabled;
        self
    }

    pub fn build(self) -> Result<ProviderRegistry, ValidationError> {
        let http_client: Arc<dyn HttpClient> = match self.http_client {
            Some(http_client) => http_client,
            None => Arc::new(ReqwestHttpClient::new()),
        };
        let timeout_ms = self.config.timeout_ms;
        let mut providers: Vec<Arc<dyn Provider>> = Vec::with_capacity(4);

        if self.enable_opencage {
            if self.config.opencage.api_key.is_none() {
                tracing::warn!("opencage api key is not set; lookups will be rejected upstream");
            }
            providers.push(Arc::new(
                OpenCageAdapter::new(http_client.clone(), self.config.opencage)
                    .with_timeout_ms(timeout_ms),
            ));
        }

        if self.enable_nominatim {
            providers.push(Arc::new(
                NominatimAdapter::new(http_client.clone(), self.config.nominatim)
                    .with_timeout_ms(timeout_ms),
            ));
        }

        if self.enable_esri {
            providers.push(Arc::new(
                EsriAdapter::new(http_client.clone(), self.config.esri).with_timeout_ms(timeout_ms),
            ));
        }

        if self.enable_gisgraphy {
            providers.push(Arc::new(
                GisgraphyAdapter::new(http_client, self.config.gisgraphy)
                    .with_timeout_ms(timeout_ms),
            ));
        }

        ProviderRegistry::new(providers)
    }
}
