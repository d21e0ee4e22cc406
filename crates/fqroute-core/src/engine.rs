// ── Reconciliation engine ──
//
// Orchestrates one synchronous run end to end:
//
//   version gate → per-group [load → validate → assemble]
//                → state fetch → plan → batched execute
//
// Everything is sequential; the only bounded-latency step is the
// remote list fetch inside the loader (fixed 5s timeout). A run either
// completes or fails as a whole -- there is no mid-run cancellation
// and no rollback of commands the device already accepted.

use tracing::{debug, info, warn};

use fqroute_api::RciClient;
use fqroute_api::types::CommandOutcome;

use crate::cache::{UrlCache, ValidationCache};
use crate::error::{CoreError, Finding, LoadReport};
use crate::model::{GroupSpec, ResolvedGroup, RouterState, validate_groups};
use crate::plan::{self, DeviceCommand};
use crate::source::SourceLoader;
use crate::validate::validate_lines;
use crate::version;

/// Outcome of the domain pipeline (pre-device), kept for diagnostics.
#[derive(Debug, Default)]
pub struct Resolution {
    pub groups: Vec<ResolvedGroup>,
    /// Cross-group conflict warnings (warn-only, never fatal).
    pub warnings: Vec<String>,
    /// Groups skipped because no domains loaded.
    pub skipped: Vec<String>,
    /// Groups excluded for exceeding the per-group limit.
    pub excluded: Vec<Finding>,
    /// Lines rejected by the validator across all sources.
    pub rejected_lines: usize,
}

/// Full report of an apply or delete run.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub commands: Vec<DeviceCommand>,
    /// Per-command device results, submission order. Empty when the
    /// plan was empty (no-op run).
    pub outcomes: Vec<CommandOutcome>,
    pub warnings: Vec<String>,
    pub skipped_groups: Vec<String>,
    pub excluded_groups: Vec<Finding>,
    pub rejected_lines: usize,
}

impl ApplyReport {
    /// `true` when the device already matched the desired state.
    pub fn is_noop(&self) -> bool {
        self.commands.is_empty()
    }
}

/// One engine instance per invocation; owns the process-lifetime
/// validation cache and the on-disk URL cache handle.
pub struct Engine<'a> {
    client: &'a RciClient,
    url_cache: UrlCache,
    validation_cache: ValidationCache,
}

impl<'a> Engine<'a> {
    pub fn new(client: &'a RciClient, url_cache: UrlCache) -> Self {
        Self {
            client,
            url_cache,
            validation_cache: ValidationCache::new(),
        }
    }

    // ── Pipeline ─────────────────────────────────────────────────────

    /// Run the domain pipeline for every group: load sources, validate
    /// lines, assemble deduplicated sets, check cross-group conflicts.
    ///
    /// Configuration errors abort before any I/O. Load errors are
    /// accumulated across all sources and groups, then reported as one
    /// combined failure; limit exclusions alone do not fail the run.
    pub async fn resolve(&mut self, specs: &[GroupSpec]) -> Result<Resolution, CoreError> {
        validate_groups(specs)?;

        let loader = SourceLoader::new(&self.url_cache)?;
        let mut findings = Vec::new();
        let mut resolution = Resolution::default();

        for spec in specs {
            let sources = loader.load_group(spec, &mut findings).await;

            let mut tokens = Vec::new();
            for source in sources {
                let validated = validate_lines(&source.lines, &mut self.validation_cache);
                if validated.rejected > 0 {
                    debug!(
                        group = %spec.name,
                        source = %source.id,
                        rejected = validated.rejected,
                        "invalid lines skipped"
                    );
                }
                resolution.rejected_lines += validated.rejected;
                tokens.extend(validated.tokens);
            }

            let before = findings.len();
            match crate::assemble::assemble_group(
                &spec.name,
                &spec.interface_id,
                tokens,
                &mut findings,
            ) {
                Some(group) => resolution.groups.push(group),
                None if findings.len() > before => {
                    resolution.excluded.extend(findings[before..].iter().cloned());
                }
                None => resolution.skipped.push(spec.name.clone()),
            }
        }

        let report = LoadReport { findings };
        if report.has_load_errors() {
            return Err(CoreError::LoadFailed { report });
        }

        resolution.warnings = crate::assemble::cross_group_warnings(&resolution.groups);
        for warning in &resolution.warnings {
            warn!("{warning}");
        }

        Ok(resolution)
    }

    // ── Device state ─────────────────────────────────────────────────

    /// Two fresh, uncached reads per run. Failure is fatal -- the run
    /// aborts before any write.
    async fn fetch_state(&self) -> Result<RouterState, CoreError> {
        let groups = self
            .client
            .show_object_groups()
            .await
            .map_err(state_fetch_error)?;
        let routes = self
            .client
            .show_dns_proxy_routes()
            .await
            .map_err(state_fetch_error)?;

        Ok(RouterState {
            groups: groups
                .into_iter()
                .map(|g| (g.name, g.include.into_iter().collect()))
                .collect(),
            routes: routes.into_iter().map(|r| (r.object_group, r.interface)).collect(),
        })
    }

    // ── Apply ────────────────────────────────────────────────────────

    /// Dry run: full pipeline and diff, no device write.
    pub async fn plan(&mut self, specs: &[GroupSpec]) -> Result<ApplyReport, CoreError> {
        let (commands, resolution) = self.prepare(specs).await?;
        Ok(report_without_outcomes(commands, resolution))
    }

    /// Reconcile the device to the desired groups.
    pub async fn apply(&mut self, specs: &[GroupSpec]) -> Result<ApplyReport, CoreError> {
        let (commands, resolution) = self.prepare(specs).await?;

        if commands.is_empty() {
            info!("device already converged, nothing to apply");
            return Ok(report_without_outcomes(commands, resolution));
        }

        let outcomes = self.execute(&commands).await?;
        let mut report = report_without_outcomes(commands, resolution);
        report.outcomes = outcomes;
        Ok(report)
    }

    /// Remove the named groups (and their routes) from the device.
    /// Skips the domain pipeline entirely.
    pub async fn delete(&self, names: &[String]) -> Result<ApplyReport, CoreError> {
        version::check(self.client.cached_firmware())?;

        let state = self.fetch_state().await?;
        let commands = plan::plan_delete(names, &state);

        if commands.is_empty() {
            info!("no matching groups on device, nothing to delete");
            return Ok(ApplyReport::default());
        }

        let outcomes = self.execute(&commands).await?;
        Ok(ApplyReport {
            commands,
            outcomes,
            ..ApplyReport::default()
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn prepare(
        &mut self,
        specs: &[GroupSpec],
    ) -> Result<(Vec<DeviceCommand>, Resolution), CoreError> {
        // Gate before any device I/O or source loading.
        version::check(self.client.cached_firmware())?;

        let resolution = self.resolve(specs).await?;
        let state = self.fetch_state().await?;
        let commands = plan::plan(&resolution.groups, &state);

        debug!(
            groups = resolution.groups.len(),
            commands = commands.len(),
            "plan computed"
        );
        Ok((commands, resolution))
    }

    /// Submit the batch and surface per-command failures.
    ///
    /// The device has no multi-command transaction: commands accepted
    /// before a failure stay applied, so the error carries the full
    /// per-command report.
    async fn execute(&self, commands: &[DeviceCommand]) -> Result<Vec<CommandOutcome>, CoreError> {
        let rendered = plan::render_batch(commands);
        let outcomes = self.client.execute(&rendered).await?;

        if outcomes.len() != rendered.len() {
            return Err(CoreError::Api {
                message: format!(
                    "device returned {} result(s) for {} command(s)",
                    outcomes.len(),
                    rendered.len()
                ),
            });
        }

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        if failed > 0 {
            return Err(CoreError::PartialApply {
                failed,
                total: outcomes.len(),
                commands: rendered,
                outcomes,
            });
        }

        info!(commands = rendered.len(), "batch applied");
        Ok(outcomes)
    }
}

fn state_fetch_error(err: fqroute_api::Error) -> CoreError {
    CoreError::StateFetch {
        message: err.to_string(),
    }
}

fn report_without_outcomes(commands: Vec<DeviceCommand>, resolution: Resolution) -> ApplyReport {
    ApplyReport {
        commands,
        outcomes: Vec::new(),
        warnings: resolution.warnings,
        skipped_groups: resolution.skipped,
        excluded_groups: resolution.excluded,
        rejected_lines: resolution.rejected_lines,
    }
}
