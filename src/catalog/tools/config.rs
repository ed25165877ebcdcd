use std::path::PathBuf;
use std::time::Duration;

/// Menu document listing every root category block.
pub const DEFAULT_ROOT_URL: &str =
    "https://static-basket-01.wbbasket.ru/vol0/data/main-menu-by-ru-v3.json";
/// Host serving the per-shard filter listings.
pub const DEFAULT_FILTER_BASE: &str = "https://catalog.wb.ru";
/// Name of the filter group whose items become extra category rows.
pub const DEFAULT_FACET: &str = "Категория";
pub const DEFAULT_OUTPUT: &str = "wildberries_categories.xlsx";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed parameters of a filter listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEndpoint {
    pub base_url: String,
    pub currency: String,
    pub destination: String,
    pub hide_dtype: String,
    pub lang: String,
    pub spp: String,
}

impl Default for FilterEndpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FILTER_BASE.to_string(),
            currency: "rub".to_string(),
            destination: "-59202".to_string(),
            hide_dtype: "13".to_string(),
            lang: "ru".to_string(),
            spp: "30".to_string(),
        }
    }
}

impl FilterEndpoint {
    /// Builds the filter listing URL. `shard` and `query` are embedded as-is;
    /// the query is already an encoded `key=value&...` fragment.
    pub fn url(&self, shard: &str, query: &str) -> String {
        format!(
            "{base}/catalog/{shard}/v8/filters?ab_testing=false&appType=1&{query}&curr={curr}&dest={dest}&hide_dtype={hide}&lang={lang}&spp={spp}",
            base = self.base_url.trim_end_matches('/'),
            curr = self.currency,
            dest = self.destination,
            hide = self.hide_dtype,
            lang = self.lang,
            spp = self.spp,
        )
    }
}

/// Settings for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub root_url: String,
    pub filters: FilterEndpoint,
    pub facet: String,
    pub timeout: Duration,
    pub output: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            filters: FilterEndpoint::default(),
            facet: DEFAULT_FACET.to_string(),
            timeout: DEFAULT_TIMEOUT,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}
