// src/runner.rs
use std::path::{Path, PathBuf};

use crate::catalog::CatalogFile;
use crate::config::consts::XCODE_ROOT;
use crate::config::knowledge::KnowledgeBase;
use crate::config::options::{Family, FamilyOptions};
use crate::core::net::{self, RetryPolicy};
use crate::error::{Error, Result};
use crate::progress::{NullProgress, Progress};
use crate::resolve::audit::{audit, AuditReport};
use crate::resolve::merge::Merger;
use crate::specs::device_traits::{self, LookupRow};
use crate::specs::{release_dates, wiki};

/// Where one family run reads from and writes to.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub options: FamilyOptions,
    pub xcode_root: PathBuf,
    pub out_path: PathBuf,
    /// Knowledge base file; the built-in table when `None`.
    pub knowledge: Option<PathBuf>,
    pub retry: RetryPolicy,
}

impl RunConfig {
    pub fn for_family(family: Family) -> Self {
        let options = family.options();
        Self {
            out_path: options.out_path(),
            options,
            xcode_root: PathBuf::from(XCODE_ROOT),
            knowledge: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn knowledge_base(&self) -> Result<KnowledgeBase> {
        match &self.knowledge {
            Some(p) => KnowledgeBase::from_path(p),
            None => KnowledgeBase::builtin(self.options.family),
        }
    }
}

/// Everything fetched from outside, ready to merge.
#[derive(Clone, Debug, Default)]
pub struct Sources {
    pub wiki_text: String,
    pub rows: Vec<LookupRow>,
    pub release_dates: Option<Vec<(String, String)>>,
    pub xcode_version: String,
}

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub path: PathBuf,
    pub xcode_version: String,
    /// Device count read back from the written file.
    pub records: usize,
    pub audit: AuditReport,
}

/// Merge already-fetched sources into a catalog document and its audit.
pub fn build(
    opts: &FamilyOptions,
    kb: &KnowledgeBase,
    sources: &Sources,
    progress: &mut dyn Progress,
) -> Result<(CatalogFile, AuditReport)> {
    let devices = wiki::Extractor::new(opts)?.parse_devices(&sources.wiki_text);
    progress.log(&format!("Found {} {} models in wiki data", devices.len(), opts.family));

    let mut merger = Merger::new(opts, kb, &devices);
    if let Some(dates) = &sources.release_dates {
        merger = merger.with_release_dates(dates.clone());
    }
    let outcome = merger.merge(&sources.rows, progress);
    if outcome.from_overrides {
        progress.log(&format!("Generated {} {} models from overrides", outcome.catalog.len(), opts.family));
    }

    let report = audit(&outcome.catalog, &outcome.dropped);
    report.report(progress);

    Ok((CatalogFile::now(&sources.xcode_version, outcome.catalog), report))
}

fn gather(cfg: &RunConfig, progress: &mut dyn Progress) -> Result<Sources> {
    let opts = &cfg.options;

    let installs = device_traits::discover(&cfg.xcode_root);
    if !installs.is_empty() {
        progress.log("Available Xcode databases:");
        for (i, x) in installs.iter().enumerate() {
            progress.log(&format!("{}. {} ({})", i + 1, x.label, x.db.display()));
        }
    }
    let install = device_traits::select(&installs)
        .ok_or_else(|| Error::NoLookupSource(cfg.xcode_root.clone()))?;
    progress.log(&format!("Using {} database...", install.label));
    let xcode_version = device_traits::version_label(install);

    let client = net::client()?;

    let release_dates = match opts.release_dates_page {
        Some(page) => {
            progress.log(&format!("Fetching {} release dates from Wikipedia...", opts.family));
            match release_dates::fetch(&client, page, &cfg.retry) {
                Ok(dates) => Some(dates),
                Err(e) => {
                    logw!("Release dates unavailable: {e}");
                    progress.warn(&format!("release dates unavailable: {e}"));
                    None
                }
            }
        }
        None => None,
    };

    progress.log(&format!("Fetching Apple Wiki data for {}...", opts.family));
    let wiki_text = wiki::fetch(&client, opts, &cfg.retry)?;

    progress.log(&format!("Querying {} for {}...", install.db.display(), opts.family));
    let rows = device_traits::query(&install.db, opts)?;
    if rows.is_empty() {
        progress.warn(&format!("no {} rows in {}", opts.family, install.db.display()));
    }

    Ok(Sources { wiki_text, rows, release_dates, xcode_version })
}

/// Write `file` to `path` and read it back; returns the device count found.
pub fn write_and_verify(file: &CatalogFile, path: &Path) -> Result<usize> {
    file.write(path)?;
    let back = CatalogFile::read(path)?;
    Ok(back.total_menu.len())
}

/// Top-level runner for one family.
/// `progress` can be None (no console updates) or Some(&mut impl Progress).
pub fn run(cfg: &RunConfig, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    logf!("Run: begin {}", cfg.options.family);
    let result = gather(cfg, progress).and_then(|sources| {
        let kb = cfg.knowledge_base()?;
        let (file, report) = build(&cfg.options, &kb, &sources, progress)?;
        let records = write_and_verify(&file, &cfg.out_path)?;
        Ok(RunSummary {
            path: cfg.out_path.clone(),
            xcode_version: file.xcode_version,
            records,
            audit: report,
        })
    });
    progress.finish();

    match &result {
        Ok(s) => logf!("Run: {} done, {} records in {}", cfg.options.family, s.records, s.path.display()),
        Err(e) => loge!("Run: {} failed: {e}", cfg.options.family),
    }
    result
}

pub fn run_family(family: Family, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    run(&RunConfig::for_family(family), progress)
}
