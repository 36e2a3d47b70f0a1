use np_core::{Error, Result};
use url::Url;

use super::spain::{
    AbcAdapter, ElDiarioAdapter, ElEspanolAdapter, ElMundoAdapter, ElPaisAdapter, LaRazonAdapter,
    LaVanguardiaAdapter, PublicoAdapter, VeinteMinutosAdapter,
};
use super::{SiteAdapter, SourceMetadata};

pub type AdapterFactory = Box<dyn Fn() -> Box<dyn SiteAdapter> + Send + Sync>;

pub struct RegisteredSource {
    pub metadata: SourceMetadata,
    factory: AdapterFactory,
}

impl RegisteredSource {
    pub fn host(&self) -> &'static str {
        self.metadata.host
    }

    /// Fresh adapter instance.
    pub fn adapter(&self) -> Box<dyn SiteAdapter> {
        (self.factory)()
    }
}

impl std::fmt::Debug for RegisteredSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSource")
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Ordered table of sources keyed by canonical host.
#[derive(Debug)]
pub struct SourceRegistry {
    sources: Vec<RegisteredSource>,
}

impl SourceRegistry {
    pub fn empty() -> Self {
        Self { sources: Vec::new() }
    }

    /// Adds a source; its metadata is read once from a freshly built adapter.
    pub fn register<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn SiteAdapter> + Send + Sync + 'static,
    {
        let metadata = factory().source_metadata();
        self.sources.push(RegisteredSource {
            metadata,
            factory: Box::new(factory),
        });
        self
    }

    pub fn with<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn SiteAdapter> + Send + Sync + 'static,
    {
        self.register(factory);
        self
    }

    pub fn sources(&self) -> impl Iterator<Item = &RegisteredSource> {
        self.sources.iter()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.host().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Source whose host equals the URL host or is a dot-suffix of it,
    /// longest match first.
    pub fn find_by_host(&self, host: &str) -> Option<&RegisteredSource> {
        let host = host.trim_end_matches('.').to_lowercase();
        self.sources
            .iter()
            .filter(|source| {
                let candidate = source.host();
                host == candidate || host.ends_with(&format!(".{}", candidate))
            })
            .max_by_key(|source| source.host().len())
    }

    pub fn resolve(&self, url: &str) -> Result<&RegisteredSource> {
        let parsed = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("{}: missing host", url)))?;
        self.find_by_host(host).ok_or_else(|| Error::UnsupportedSource {
            host: host.to_lowercase(),
            supported: self.hosts(),
        })
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::spain()
    }
}

impl SourceRegistry {
    /// The Spanish national outlets, in batch order.
    pub fn spain() -> Self {
        Self::empty()
            .with(|| Box::new(AbcAdapter))
            .with(|| Box::new(ElMundoAdapter))
            .with(|| Box::new(ElDiarioAdapter))
            .with(|| Box::new(ElPaisAdapter))
            .with(|| Box::new(LaRazonAdapter))
            .with(|| Box::new(PublicoAdapter))
            .with(|| Box::new(LaVanguardiaAdapter))
            .with(|| Box::new(ElEspanolAdapter))
            .with(|| Box::new(VeinteMinutosAdapter))
    }
}
