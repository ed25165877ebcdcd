use tracing::{info, instrument};

use crate::catalog::tools::error::Result;
use crate::catalog::tools::io::http::{BlockingCatalogClient, CatalogClient};
use crate::catalog::tools::model::CategoryNode;

/// Decodes the menu document into its root blocks.
pub fn parse_roots(body: &str) -> Result<Vec<CategoryNode>> {
    Ok(serde_json::from_str(body)?)
}

/// Downloads the menu document. Any failure here aborts the run.
#[instrument(level = "info", skip(client))]
pub async fn load_roots<C>(client: &C, url: &str) -> Result<Vec<CategoryNode>>
where
    C: CatalogClient + ?Sized,
{
    let body = client.get_text(url).await?;
    let roots = parse_roots(&body)?;
    info!(root_count = roots.len(), "loaded menu document");
    Ok(roots)
}

/// Blocking counterpart of [`load_roots`].
#[instrument(level = "info", skip(client))]
pub fn load_roots_blocking<C>(client: &C, url: &str) -> Result<Vec<CategoryNode>>
where
    C: BlockingCatalogClient + ?Sized,
{
    let body = client.get_text(url)?;
    let roots = parse_roots(&body)?;
    info!(root_count = roots.len(), "loaded menu document");
    Ok(roots)
}
