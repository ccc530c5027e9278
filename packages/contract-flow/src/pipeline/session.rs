//! Analysis session
//!
//! Walks declaration trees file by file:
//!
//! ```text
//! analyze_files ──(rayon, one buffer per file)──▶ run_file
//!     │
//!     ├── visit(decl)         poll, enter scope frame
//!     │    ├── ContractCache::get_or_validate(decl.id, scope revision)
//!     │    │        └── ContractValidator::validate_block
//!     │    └── visit(nested)
//!     └── DiagnosticBuffer::flush_to(reporter)   only once every file completed
//! ```
//!
//! Call sites are evaluated against the cached contracts with
//! `evaluate_call`.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{AnalysisError, Result};
use crate::features::cancellation::CancellableResult;
use crate::features::contracts::{
    CacheStats, ContractCache, Declaration, ScopeChain, ScopeFrame, SourceFile, ValidatedContract,
};
use crate::features::diagnostics::{DiagnosticBuffer, DiagnosticReporter};
use crate::features::effect_evaluation::{ArgumentBindings, CallSite, CallSiteOutcome};
use crate::features::flow_facts::FlowFact;
use crate::shared::models::DeclId;

use super::context::AnalysisContext;

/// Per-file counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: String,
    /// Declarations visited, nested ones included
    pub declarations: usize,
    /// Declarations carrying a contract block
    pub contracts: usize,
    /// Accepted clauses over all contracts
    pub clauses: usize,
    /// Diagnostics handed to the reporter
    pub diagnostics: usize,
}

impl FileSummary {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }
}

pub struct AnalysisSession {
    context: AnalysisContext,
    cache: Arc<ContractCache>,
    reporter: Arc<dyn DiagnosticReporter>,
    pool: Option<rayon::ThreadPool>,
}

impl AnalysisSession {
    pub fn new(context: AnalysisContext, reporter: Arc<dyn DiagnosticReporter>) -> Self {
        let pool = Self::build_pool(&context);
        Self {
            context,
            cache: Arc::new(ContractCache::new()),
            reporter,
            pool,
        }
    }

    /// Share a contract cache between sessions
    pub fn with_cache(mut self, cache: Arc<ContractCache>) -> Self {
        self.cache = cache;
        self
    }

    fn build_pool(context: &AnalysisContext) -> Option<rayon::ThreadPool> {
        let parallel = context.config().parallel();
        if !parallel.enabled || parallel.num_workers == 0 {
            // 0 = auto: the global rayon pool is already sized by CPU count
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(parallel.effective_workers())
            .thread_name(|i| format!("contract-flow-{}", i))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(error = %e, "failed to build analysis thread pool; using the global pool");
                None
            }
        }
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.context
    }

    pub fn cache(&self) -> &ContractCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Validate every contract in `file` and report its diagnostics.
    ///
    /// On cancellation nothing is reported and no partial contract is cached;
    /// the error is `AnalysisError::Cancelled`.
    pub fn analyze_file(&self, file: &SourceFile) -> Result<FileSummary> {
        let (summary, buffer) = self.run_file(file)?;
        buffer.flush_to(self.reporter.as_ref());
        Ok(summary)
    }

    /// Analyze independent files, in parallel when enabled.
    ///
    /// Summaries come back in input order. The first failure (cancellation
    /// included) aborts the batch, and then no diagnostic of any file in it
    /// is reported.
    pub fn analyze_files(&self, files: &[SourceFile]) -> Result<Vec<FileSummary>> {
        info!(files = files.len(), "analyzing files");

        let runs = self.run_files(files)?;

        let mut summaries = Vec::with_capacity(runs.len());
        for (summary, buffer) in runs {
            buffer.flush_to(self.reporter.as_ref());
            summaries.push(summary);
        }
        Ok(summaries)
    }

    fn run_files(&self, files: &[SourceFile]) -> Result<Vec<(FileSummary, DiagnosticBuffer)>> {
        #[cfg(feature = "parallel")]
        {
            if self.context.config().parallel().enabled && files.len() > 1 {
                use rayon::prelude::*;

                let run = || {
                    files
                        .par_iter()
                        .map(|file| self.run_file(file))
                        .collect::<Result<Vec<_>>>()
                };
                return match &self.pool {
                    Some(pool) => pool.install(run),
                    None => run(),
                };
            }
        }

        files.iter().map(|file| self.run_file(file)).collect()
    }

    /// One complete run over `file`; the buffer is not flushed yet
    fn run_file(&self, file: &SourceFile) -> Result<(FileSummary, DiagnosticBuffer)> {
        let span = tracing::debug_span!("analyze_file", path = %file.path);
        let _guard = span.enter();

        check_unique_ids(file)?;

        let mut buffer = if self.context.config().validation().report_warnings {
            DiagnosticBuffer::new()
        } else {
            DiagnosticBuffer::new().without_warnings()
        };
        let mut summary = FileSummary::new(&file.path);
        let mut scope = ScopeChain::new();

        for decl in &file.declarations {
            if let Err(cancelled) = self.visit(&mut scope, decl, 0, &mut buffer, &mut summary) {
                debug!(
                    path = %file.path,
                    discarded = buffer.len(),
                    "analysis cancelled; diagnostics discarded"
                );
                return Err(cancelled.into());
            }
        }

        summary.diagnostics = buffer.len();
        debug!(
            path = %file.path,
            declarations = summary.declarations,
            contracts = summary.contracts,
            diagnostics = summary.diagnostics,
            "file analyzed"
        );
        Ok((summary, buffer))
    }

    /// Published contract of a declaration, if it has been validated
    pub fn contract_for(&self, decl: DeclId) -> Option<Arc<ValidatedContract>> {
        self.cache.get(decl)
    }

    /// Effect of `call` on `pre`, using the callee's cached contract.
    ///
    /// A callee that was never validated is treated as contract-free.
    pub fn evaluate_call(
        &self,
        call: &CallSite,
        bindings: &ArgumentBindings,
        pre: &FlowFact,
    ) -> Result<CallSiteOutcome> {
        let validated = self.cache.get(call.callee);
        let contract = validated.as_ref().map(|v| &v.contract);
        Ok(self.context.evaluator().apply(call, contract, bindings, pre)?)
    }

    /// Drop the cached contract of `decl`
    pub fn invalidate(&self, decl: DeclId) -> bool {
        self.cache.invalidate(decl)
    }

    /// `outer_revision` is the newest revision among the enclosing
    /// declarations. Diagnostics of a nested contract depend on those frames,
    /// so the cache is keyed by the newer of the two.
    fn visit(
        &self,
        scope: &mut ScopeChain,
        decl: &Declaration,
        outer_revision: u64,
        buffer: &mut DiagnosticBuffer,
        summary: &mut FileSummary,
    ) -> CancellableResult<()> {
        self.context.checkpoint().poll()?;
        summary.declarations += 1;
        let revision = decl.revision.max(outer_revision);

        if let Some(block) = &decl.contract {
            let own = scope.entered(decl);
            let validated = self.cache.get_or_validate(decl.id, revision, || {
                let (contract, diagnostics) = self
                    .context
                    .validator()
                    .validate_block(&own, decl, block)?
                    .into_parts();
                Ok(ValidatedContract {
                    contract,
                    diagnostics,
                    revision,
                })
            })?;
            summary.contracts += 1;
            summary.clauses += validated.contract.len();
            buffer.extend(validated.diagnostics.iter().cloned());
        }

        if !decl.nested.is_empty() {
            scope.push(ScopeFrame::of(decl));
            for nested in &decl.nested {
                self.visit(scope, nested, revision, buffer, summary)?;
            }
            scope.pop();
        }
        Ok(())
    }
}

impl std::fmt::Debug for AnalysisSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("context", &self.context)
            .field("cache", &self.cache.stats())
            .field("dedicated_pool", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

/// Declaration ids key the cache, so they must be unique per file
fn check_unique_ids(file: &SourceFile) -> Result<()> {
    fn walk(decl: &Declaration, seen: &mut FxHashSet<DeclId>) -> Result<()> {
        if !seen.insert(decl.id) {
            return Err(AnalysisError::invalid_input(format!(
                "duplicate declaration id {} ('{}')",
                decl.id, decl.name
            )));
        }
        decl.nested.iter().try_for_each(|nested| walk(nested, seen))
    }

    let mut seen = FxHashSet::default();
    file.declarations
        .iter()
        .try_for_each(|decl| walk(decl, &mut seen))
}
