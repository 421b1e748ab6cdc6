//! Build driver: reads the records, resolves them and writes the site.

use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::GeneratorConfig;
use crate::error::{BuildError, BuildResult};
use crate::hierarchy::HierarchyResolver;
use crate::ingest::Ingestor;
use crate::naming::resolve_names;
use crate::partition::{Page, PagePartitioner};
use crate::theme::Theme;

#[derive(Debug, Clone)]
pub struct BuildStats {
    pub files_read: usize,
    pub entities: usize,
    /// Entities attached to a fallback parent after the ownership walk.
    pub orphans: usize,
    pub pages_written: usize,
    pub inline_blocks: usize,
    pub build_time: Duration,
}

pub struct DocBuilder {
    config: GeneratorConfig,
    input_dir: PathBuf,
    output_dir: PathBuf,
    theme: Theme,
}

impl DocBuilder {
    pub fn new(config: GeneratorConfig, input_dir: PathBuf, output_dir: PathBuf) -> Self {
        let theme = Theme::from_config(&config);
        Self {
            config,
            input_dir,
            output_dir,
            theme,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Reads every record, resolves the hierarchy and names, then writes one
    /// file per page. Nothing is written unless all input was read.
    pub fn build(&self) -> Result<BuildStats> {
        let start_time = Instant::now();
        info!("Starting build from {}", self.input_dir.display());

        let mut ingestor = Ingestor::new();
        ingestor
            .read_directory(&self.input_dir)
            .with_context(|| format!("Failed to read input directory: {}", self.input_dir.display()))?;
        let files_read = ingestor.files_read();
        let mut store = ingestor.finish();

        let hierarchy = HierarchyResolver::new().resolve(&mut store);
        debug!(
            "Hierarchy resolved: {} claimed, {} orphans, {} namespace fallbacks",
            hierarchy.claimed, hierarchy.orphans, hierarchy.namespace_fallbacks
        );
        resolve_names(&mut store);

        let mut partitioner = PagePartitioner::new(&store, &self.config);
        let pages = partitioner.partition();
        let inline_blocks = partitioner.inline_blocks();
        info!("Partitioned {} pages", pages.len());

        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.output_dir.display())
        })?;
        self.write_pages(&pages)
            .context("Failed to write output pages")?;

        let stats = BuildStats {
            files_read,
            entities: store.len() - 1,
            orphans: hierarchy.orphans,
            pages_written: pages.len(),
            inline_blocks,
            build_time: start_time.elapsed(),
        };
        info!(
            "Build completed in {:?}: {} pages from {} entities",
            stats.build_time, stats.pages_written, stats.entities
        );
        Ok(stats)
    }

    /// Writes pages in parallel; the store is no longer needed at this point.
    fn write_pages(&self, pages: &[Page]) -> BuildResult<()> {
        pages.par_iter().try_for_each(|page| {
            let path = self.output_dir.join(&page.url);
            std::fs::write(&path, self.theme.render_page(page))
                .map_err(|e| BuildError::io(&path, e))
        })
    }
}
