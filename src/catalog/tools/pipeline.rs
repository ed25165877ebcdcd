use std::path::Path;

use tracing::{debug, info, instrument};

use crate::catalog::tools::config::CatalogConfig;
use crate::catalog::tools::enrich::{enrich_all, fetch_filter_categories_blocking};
use crate::catalog::tools::error::Result;
use crate::catalog::tools::flatten::{TraversalPolicy, flatten_tree};
use crate::catalog::tools::io::excel_write;
use crate::catalog::tools::io::http::{BlockingCatalogClient, CatalogClient};
use crate::catalog::tools::model::{CategoryNode, CategoryRecord, TaxonomyExport};
use crate::catalog::tools::roots::{load_roots, load_roots_blocking};
use crate::catalog::tools::workbook::build_workbook;

/// Flattens every root block with the given policy. Roots are walked one at
/// a time; when the policy executes enrichment, the lookups of a root are
/// launched together and joined before moving on to the next root.
pub async fn collect_taxonomy<C>(
    client: &C,
    config: &CatalogConfig,
    roots: &[CategoryNode],
    policy: &TraversalPolicy,
) -> TaxonomyExport
where
    C: CatalogClient + ?Sized,
{
    let mut export = TaxonomyExport::default();

    for root in roots {
        let flattened = flatten_tree(root, policy);
        let mut records = flattened.records;

        if policy.executes_enrichment() && !flattened.enrichments.is_empty() {
            let extra = enrich_all(
                client,
                &config.filters,
                &config.facet,
                &flattened.enrichments,
            )
            .await;
            debug!(
                root = %root.name,
                lookups = flattened.enrichments.len(),
                rows = extra.len(),
                "filter lookups joined"
            );
            records.extend(extra);
        }

        export.push(root.name.clone(), records);
    }

    export
}

/// Blocking counterpart of [`collect_taxonomy`]. Lookups run one after
/// another, in visiting order.
pub fn collect_taxonomy_blocking<C>(
    client: &C,
    config: &CatalogConfig,
    roots: &[CategoryNode],
    policy: &TraversalPolicy,
) -> TaxonomyExport
where
    C: BlockingCatalogClient + ?Sized,
{
    let mut export = TaxonomyExport::default();

    for root in roots {
        let flattened = flatten_tree(root, policy);
        let mut records = flattened.records;

        if policy.executes_enrichment() {
            let extra: Vec<CategoryRecord> = flattened
                .enrichments
                .iter()
                .flat_map(|request| {
                    fetch_filter_categories_blocking(client, &config.filters, &config.facet, request)
                })
                .collect();
            records.extend(extra);
        } else if !flattened.enrichments.is_empty() {
            debug!(
                root = %root.name,
                skipped = flattened.enrichments.len(),
                "filter lookups not executed by this policy"
            );
        }

        export.push(root.name.clone(), records);
    }

    export
}

/// Async exporter: loads the menu and flattens it with
/// [`TraversalPolicy::concurrent`].
#[instrument(level = "info", skip_all, fields(root_url = %config.root_url))]
pub async fn run_concurrent<C>(client: &C, config: &CatalogConfig) -> Result<TaxonomyExport>
where
    C: CatalogClient + ?Sized,
{
    let roots = load_roots(client, &config.root_url).await?;
    let export =
        collect_taxonomy(client, config, &roots, &TraversalPolicy::concurrent()).await;
    info!(
        groups = export.groups.len(),
        records = export.record_count(),
        "taxonomy flattened"
    );
    Ok(export)
}

/// Blocking exporter: loads the menu and flattens it with
/// [`TraversalPolicy::sequential`].
#[instrument(level = "info", skip_all, fields(root_url = %config.root_url))]
pub fn run_sequential<C>(client: &C, config: &CatalogConfig) -> Result<TaxonomyExport>
where
    C: BlockingCatalogClient + ?Sized,
{
    let roots = load_roots_blocking(client, &config.root_url)?;
    let export = collect_taxonomy_blocking(client, config, &roots, &TraversalPolicy::sequential());
    info!(
        groups = export.groups.len(),
        records = export.record_count(),
        "taxonomy flattened"
    );
    Ok(export)
}

/// Writes one sheet per root group to `output`.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn write_export(taxonomy: &TaxonomyExport, output: &Path) -> Result<()> {
    let workbook = build_workbook(taxonomy);
    debug!(sheet_count = workbook.tables.len(), "workbook constructed");
    excel_write::write_workbook(output, &workbook)
}
