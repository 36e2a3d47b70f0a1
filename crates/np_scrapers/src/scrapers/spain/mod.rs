//! Spanish national outlets.

pub mod abc;
pub mod eldiario;
pub mod elespanol;
pub mod elmundo;
pub mod elpais;
pub mod larazon;
pub mod lavanguardia;
pub mod publico;
pub mod veinteminutos;

pub use abc::AbcAdapter;
pub use eldiario::ElDiarioAdapter;
pub use elespanol::ElEspanolAdapter;
pub use elmundo::ElMundoAdapter;
pub use elpais::ElPaisAdapter;
pub use larazon::LaRazonAdapter;
pub use lavanguardia::LaVanguardiaAdapter;
pub use publico::PublicoAdapter;
pub use veinteminutos::VeinteMinutosAdapter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::SiteAdapter;
    use url::Url;

    #[test]
    fn test_landing_urls_match_hosts() {
        let adapters: Vec<Box<dyn SiteAdapter>> = vec![
            Box::new(AbcAdapter),
            Box::new(ElMundoAdapter),
            Box::new(ElDiarioAdapter),
            Box::new(ElPaisAdapter),
            Box::new(LaRazonAdapter),
            Box::new(PublicoAdapter),
            Box::new(LaVanguardiaAdapter),
            Box::new(ElEspanolAdapter),
            Box::new(VeinteMinutosAdapter),
        ];
        for adapter in adapters {
            let meta = adapter.source_metadata();
            let landing = Url::parse(meta.landing_url).unwrap();
            let host = landing.host_str().unwrap();
            assert!(host == meta.host || host.ends_with(&format!(".{}", meta.host)), "{}", meta.name);
        }
    }
}
