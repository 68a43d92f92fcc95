use crate::codegen::ArtifactSource;
use crate::codegen::CodeEmitter;
use crate::codegen::CodeGenerator;
use crate::codegen::GeneratedArtifact;
use crate::config::CompilerConfig;
use crate::content_hash::ContentHash;
use crate::context::CompilationContext;
use crate::context::CompilationContextBuilder;
use crate::context::ValidatedContext;
use crate::context::ValidationError;
use crate::dependency_graph::DependencyGraph;
use crate::document_store::DocumentStore;
use crate::file_reader;
use crate::fs::CodegenFilesystem;
use crate::fs::SourceControl;
use crate::fs::StagedFilesystem;
use crate::ir::Definition;
use crate::ir::DefinitionKind;
use crate::manifest::ArtifactManifest;
use crate::manifest::ManifestEntry;
use crate::runner::ErrorOrigin;
use crate::runner::FileChange;
use crate::runner::FileChangeKind;
use crate::runner::RunError;
use crate::runner::RunReport;
use crate::runner::source_discovery;
use crate::schema::Schema;
use crate::transform::TransformPipeline;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type Result<T> = std::result::Result<T, RunError>;

/// The schema a run compiles against, and which of its types differ from the
/// previous run's.
struct RunSchema {
    schema: Arc<Schema>,
    changed_types: BTreeSet<String>,
    reloaded: bool,
    load_failed: bool,
}

/// What a definition's own artifact depends on: its structure and the file
/// it is declared in.
#[derive(Clone, Debug, PartialEq)]
struct DefinitionKey {
    source_hash: ContentHash,
    file: Option<PathBuf>,
}
impl DefinitionKey {
    fn of(definition: &Definition) -> Self {
        Self {
            source_hash: definition.source_hash().clone(),
            file: definition.location().file.clone(),
        }
    }
}

/// Drives a codegen run end to end: discovery, parsing, validation, the
/// transform pipeline, generation, and a staged, atomic write of the
/// resulting artifacts.
///
/// State carried between runs (parsed documents, the dependency graph,
/// definition keys, which definitions failed) only advances once a run has
/// committed. A run that fails or is cancelled leaves the runner as if it
/// never happened.
#[derive(Debug)]
pub struct CodegenRunner {
    config: CompilerConfig,
    store: DocumentStore,
    schema: Arc<Schema>,
    schema_stale: bool,
    graph: DependencyGraph,
    definition_keys: BTreeMap<String, DefinitionKey>,
    failed: BTreeSet<String>,
    has_committed: bool,
    generator: CodeGenerator,
    pipeline: TransformPipeline,
    source_control: Option<Arc<dyn SourceControl>>,
}
impl CodegenRunner {
    pub fn new(config: CompilerConfig) -> Self {
        let generator = CodeGenerator::new(config.emitter(), config.artifact_output());
        Self {
            store: DocumentStore::new(config.parser_plugins()),
            schema: Arc::new(Schema::empty()),
            schema_stale: true,
            graph: DependencyGraph::default(),
            definition_keys: BTreeMap::new(),
            failed: BTreeSet::new(),
            has_committed: false,
            generator,
            pipeline: TransformPipeline::new(),
            source_control: None,
            config,
        }
    }

    pub fn with_code_emitter(mut self, emitter: Arc<dyn CodeEmitter>) -> Self {
        self.generator = CodeGenerator::new(emitter, self.config.artifact_output());
        self
    }

    pub fn with_source_control(mut self, source_control: Arc<dyn SourceControl>) -> Self {
        self.source_control = Some(source_control);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Definitions that failed in the last committed run.
    pub fn failed_definitions(&self) -> &BTreeSet<String> {
        &self.failed
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Rescans the whole source tree and recompiles every definition.
    pub fn run_full(&mut self, cancel: &CancellationToken) -> Result<RunReport> {
        tracing::info!("Starting full codegen run...");
        let mut report = RunReport::default();
        let run_schema = self.load_schema(true, &mut report);

        let (paths, walk_errors) = source_discovery::discover_source_paths(&self.config);
        for err in walk_errors {
            let origin = err.path()
                .map(|path| ErrorOrigin::Path(path.to_path_buf()))
                .unwrap_or_else(|| ErrorOrigin::Path(self.config.src_dir()));
            report.push_error(origin, err);
        }

        let discovered: BTreeSet<&Path> = paths.iter().map(PathBuf::as_path).collect();
        let vanished: Vec<PathBuf> = self.store.paths()
            .filter(|path| !discovered.contains(path))
            .map(Path::to_path_buf)
            .collect();

        let mut sources = Vec::with_capacity(paths.len());
        for path in &paths {
            match file_reader::read_content(path) {
                Ok(text) => sources.push((path.clone(), text)),
                Err(err) => report.push_error(ErrorOrigin::Path(path.clone()), err),
            }
        }

        let mut store = self.store_snapshot();
        for path in vanished {
            store.remove(&path);
        }
        store.parse_all(sources);

        self.compile(store, run_schema, false, report, cancel)
    }

    /// Applies `changes` to the previous run's state and recompiles only the
    /// definitions they can affect. Falls back to [`run_full`](Self::run_full)
    /// until a first run has committed.
    pub fn run_incremental(
        &mut self,
        changes: &[FileChange],
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        if !self.has_committed {
            return self.run_full(cancel);
        }
        tracing::info!("Starting incremental codegen run ({} file changes)...", changes.len());

        // The last change recorded for a path wins.
        let mut latest: BTreeMap<&Path, FileChangeKind> = BTreeMap::new();
        for change in changes {
            latest.insert(change.path.as_path(), change.kind);
        }

        let schema_paths = self.config.schema_paths();
        let schema_changed = latest.keys()
            .any(|path| schema_paths.iter().any(|schema| schema.as_path() == *path));

        let mut report = RunReport::default();
        let run_schema = self.load_schema(schema_changed, &mut report);

        let src_dir = self.config.src_dir();
        let mut store = self.store_snapshot();
        let mut sources = vec![];
        for (path, kind) in latest {
            if !path.starts_with(&src_dir) || self.config.is_excluded(path) {
                tracing::trace!("Ignoring change to {path:?}.");
                continue;
            }

            // A removed path may have been a directory, so forget everything
            // beneath it.
            if kind == FileChangeKind::Removed {
                let removed = store.remove_under(path);
                tracing::trace!("Forgot {} documents under {path:?}.", removed.len());
                continue;
            }

            if path.is_dir() {
                if path != src_dir.as_path()
                    && path.file_name().is_some_and(|name| self.config.is_excluded_dir_name(name)) {
                    tracing::trace!("Ignoring change to excluded directory {path:?}.");
                    continue;
                }
                let (paths, walk_errors) = source_discovery::discover_source_paths_in(&self.config, path);
                for err in walk_errors {
                    let origin = ErrorOrigin::Path(err.path().unwrap_or(path).to_path_buf());
                    report.push_error(origin, err);
                }
                for path in paths {
                    match file_reader::read_content(&path) {
                        Ok(text) => sources.push((path, text)),
                        Err(err) => report.push_error(ErrorOrigin::Path(path), err),
                    }
                }
                continue;
            }

            if !self.config.is_source_path(path) {
                tracing::trace!("Ignoring change to {path:?}.");
                continue;
            }
            match file_reader::read_content(path) {
                Ok(text) => sources.push((path.to_path_buf(), text)),
                Err(_) if !path.exists() => {
                    tracing::debug!("{path:?} vanished before it could be read.");
                    store.remove(path);
                },
                Err(err) => report.push_error(ErrorOrigin::Path(path.to_path_buf()), err),
            }
        }
        store.parse_all(sources);

        self.compile(store, run_schema, true, report, cancel)
    }

    /// A copy of the document cache for one run to work on. Cached
    /// definitions are shared, so this only clones the index.
    fn store_snapshot(&self) -> DocumentStore {
        self.store.clone()
    }

    fn load_schema(&self, reload: bool, report: &mut RunReport) -> RunSchema {
        if !reload && !self.schema_stale {
            return RunSchema {
                schema: self.schema.clone(),
                changed_types: BTreeSet::new(),
                reloaded: false,
                load_failed: false,
            };
        }

        let schema_paths = self.config.schema_paths();
        tracing::debug!("Loading schema from {} files.", schema_paths.len());
        match Schema::from_files(&schema_paths) {
            Ok(schema) => {
                let changed_types = self.schema.changed_types(&schema);
                if !changed_types.is_empty() {
                    tracing::debug!("Schema types changed: {changed_types:?}");
                }
                RunSchema {
                    schema: Arc::new(schema),
                    changed_types,
                    reloaded: true,
                    load_failed: false,
                }
            },
            Err(errors) => {
                tracing::warn!("Failed to load the schema; keeping the previous one.");
                for err in errors {
                    report.push_error(ErrorOrigin::Schema, err);
                }
                RunSchema {
                    schema: self.schema.clone(),
                    changed_types: BTreeSet::new(),
                    reloaded: false,
                    load_failed: true,
                }
            },
        }
    }

    fn compile(
        &mut self,
        store: DocumentStore,
        run_schema: RunSchema,
        incremental: bool,
        mut report: RunReport,
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        if cancel.is_cancelled() {
            return Err(RunError::Cancelled);
        }

        for err in store.errors() {
            report.push_error(ErrorOrigin::Path(err.path().to_path_buf()), err.clone());
        }

        // Duplicated names never compile, so which one is tracked here only
        // matters for change detection.
        let mut current: IndexMap<&str, &Arc<Definition>> = IndexMap::new();
        for definition in store.definitions() {
            current.entry(definition.name()).or_insert(definition);
        }
        let keys: BTreeMap<String, DefinitionKey> = current.iter()
            .map(|(name, definition)| (name.to_string(), DefinitionKey::of(definition)))
            .collect();
        let mut changed: BTreeSet<String> = keys.iter()
            .filter(|(name, key)| self.definition_keys.get(*name) != Some(*key))
            .map(|(name, _)| name.clone())
            .collect();
        changed.extend(
            self.definition_keys.keys().filter(|name| !keys.contains_key(*name)).cloned(),
        );

        // Definitions still declared somewhere, including by documents that
        // currently fail to parse. Their artifacts are kept until they
        // compile again.
        let mut live: BTreeSet<String> = keys.keys().cloned().collect();
        live.extend(store.unparsed_definition_names().map(String::from));
        tracing::debug!("{} definitions changed since the last run.", changed.len());

        let schema = &run_schema.schema;
        let graph = if incremental && run_schema.changed_types.is_empty() {
            self.graph.update_with(schema, &changed, |name| current.get(name).copied())
        } else {
            DependencyGraph::from_definitions(current.values().copied(), schema)
        };

        let mut builder = CompilationContextBuilder::new(schema.clone());
        builder.add_definitions(store.definitions().cloned());
        let ValidatedContext { context, errors } = builder.build();

        let mut failed_now = BTreeSet::new();
        for err in errors {
            failed_now.insert(err.definition_name().to_string());
            report.push_error(ErrorOrigin::Definition(err.definition_name().to_string()), err);
        }

        let context = self.exclude_cycles(context, &graph, &mut failed_now, &mut report);

        let mut dirty: BTreeSet<String> = if incremental {
            let mut dirty = changed.clone();
            dirty.extend(graph.affected_operations(&changed));
            dirty.extend(graph.affected_by_schema_types(&run_schema.changed_types));
            dirty.extend(self.failed.iter().cloned());
            dirty
        } else {
            context.documents().map(|definition| definition.name().to_string()).collect()
        };
        dirty.retain(|name| context.contains(name));
        tracing::debug!("Compiling {} definitions.", dirty.len());

        let restricted = context.restrict_to(dirty.iter().map(String::as_str));
        if cancel.is_cancelled() {
            return Err(RunError::Cancelled);
        }

        let output = restricted.apply_transforms(&self.pipeline);
        for err in output.errors {
            let name = err.error.definition().to_string();
            failed_now.insert(name.clone());
            report.push_error(ErrorOrigin::Definition(name), err);
        }
        if cancel.is_cancelled() {
            return Err(RunError::Cancelled);
        }

        let mut succeeded = BTreeSet::new();
        let mut artifacts = vec![];
        for definition in restricted.topological_order() {
            let name = definition.name();
            if !dirty.contains(name) {
                continue;
            }

            let reader = output.reader.get(name).ok().map(Arc::as_ref);
            let normalization = output.normalization.get(name).ok().map(Arc::as_ref);
            let source = match (definition.kind(), reader, normalization) {
                (DefinitionKind::Fragment, Some(reader), _) =>
                    ArtifactSource::Fragment { reader },
                (DefinitionKind::Operation { .. }, Some(reader), Some(normalization)) =>
                    ArtifactSource::Request { reader, normalization },
                // Already reported by the pipeline.
                _ => continue,
            };

            match self.generator.generate(&source) {
                Ok(artifact) => {
                    succeeded.insert(name.to_string());
                    artifacts.push(artifact);
                },
                Err(err) => {
                    failed_now.insert(name.to_string());
                    report.push_error(ErrorOrigin::Definition(name.to_string()), err);
                },
            }
        }
        for split in output.normalization.documents() {
            if !matches!(split.kind(), DefinitionKind::SplitOperation { .. }) {
                continue;
            }
            match self.generator.generate(&ArtifactSource::SplitOperation {
                normalization: split.as_ref(),
            }) {
                Ok(mut artifact) => {
                    artifact.owners.retain(|owner| succeeded.contains(owner));
                    if !artifact.owners.is_empty() {
                        artifacts.push(artifact);
                    }
                },
                Err(err) => {
                    report.push_error(ErrorOrigin::Definition(split.name().to_string()), err);
                },
            }
        }

        let fs = StagedFilesystem::new();
        self.stage_artifacts(&fs, artifacts, &succeeded, &dirty, &live, &mut report)?;
        report.compiled = dirty;

        if cancel.is_cancelled() {
            tracing::info!("Run cancelled; discarding {} staged changes.", report.staged_changes);
            return Err(RunError::Cancelled);
        }
        fs.commit(self.source_control.as_deref())?;
        report.set_committed(fs.added_removed_files());

        drop(current);
        if run_schema.reloaded {
            self.schema = run_schema.schema;
            self.schema_stale = false;
        } else if run_schema.load_failed {
            self.schema_stale = true;
        }
        self.store = store;
        self.graph = graph;
        self.definition_keys = keys;
        self.failed = failed_now;
        self.has_committed = true;

        tracing::info!(
            "Codegen run committed: {} created, {} updated, {} deleted, {} errors.",
            report.created.len(),
            report.updated.len(),
            report.deleted.len(),
            report.error_count(),
        );
        Ok(report)
    }

    /// Reports every fragment cycle and removes its members, and everything
    /// that reaches them, from `context`.
    fn exclude_cycles(
        &self,
        context: CompilationContext,
        graph: &DependencyGraph,
        failed: &mut BTreeSet<String>,
        report: &mut RunReport,
    ) -> CompilationContext {
        let cycles = graph.cycles();
        if cycles.is_empty() {
            return context;
        }

        let members: BTreeSet<&str> = cycles.iter()
            .flat_map(|cycle| cycle.members().iter().map(String::as_str))
            .collect();
        let mut excluded = BTreeSet::new();
        for cycle in &cycles {
            for name in graph.reaching(cycle.members().iter().map(String::as_str)) {
                if !members.contains(name.as_str()) && !excluded.contains(&name) {
                    report.push_error(
                        ErrorOrigin::Definition(name.clone()),
                        ValidationError::InvalidDependency {
                            definition: name.clone(),
                            dependency: cycle.first_member().to_string(),
                        },
                    );
                }
                excluded.insert(name);
            }
        }
        for cycle in cycles {
            report.push_error(
                ErrorOrigin::Definition(cycle.first_member().to_string()),
                ValidationError::from(cycle),
            );
        }

        failed.extend(excluded.iter().cloned());
        context.without_definitions(&excluded)
    }

    /// Stages writes for new or changed artifacts, deletions for artifacts
    /// nothing produces anymore, and the updated manifest.
    fn stage_artifacts(
        &self,
        fs: &dyn CodegenFilesystem,
        artifacts: Vec<GeneratedArtifact>,
        succeeded: &BTreeSet<String>,
        compiled: &BTreeSet<String>,
        live: &BTreeSet<String>,
        report: &mut RunReport,
    ) -> Result<()> {
        let manifest_path = self.config.manifest_path();
        let previous = ArtifactManifest::load(fs, &manifest_path);
        let mut manifest = previous.clone();

        let mut produced = BTreeSet::new();
        for artifact in artifacts {
            let relative = self.relative_path(&artifact.path);
            let previous_entry = previous.get(&relative);

            // Owners that were not recompiled this run still claim the
            // artifact.
            let mut owners = artifact.owners;
            if let Some(entry) = previous_entry {
                owners.extend(
                    entry.owners.iter()
                        .filter(|owner| live.contains(*owner) && !compiled.contains(*owner))
                        .cloned(),
                );
            }

            let exists = fs.exists(&artifact.path)?;
            let unchanged = exists
                && previous_entry.is_some_and(|entry| entry.content_hash == artifact.content_hash);
            if unchanged {
                tracing::trace!("Artifact {:?} is unchanged.", artifact.path);
                report.unchanged.push(artifact.path);
            } else {
                fs.write_file(&artifact.path, &artifact.content)?;
                report.staged_changes += 1;
                if exists {
                    report.updated.push(artifact.path);
                } else {
                    report.created.push(artifact.path);
                }
            }

            manifest.insert(relative.clone(), ManifestEntry {
                content_hash: artifact.content_hash,
                owners,
            });
            produced.insert(relative);
        }

        for (relative, entry) in previous.entries() {
            if produced.contains(relative) {
                continue;
            }

            // Keep the artifact while any owner that still exists has not
            // been successfully recompiled.
            let remaining: BTreeSet<String> = entry.owners.iter()
                .filter(|owner| live.contains(*owner) && !succeeded.contains(*owner))
                .cloned()
                .collect();
            if !remaining.is_empty() {
                if remaining != entry.owners {
                    manifest.insert(relative.to_path_buf(), ManifestEntry {
                        content_hash: entry.content_hash.clone(),
                        owners: remaining,
                    });
                }
                continue;
            }

            manifest.remove(relative);
            let path = self.config.root.join(relative);
            if fs.exists(&path)? {
                fs.unlink(&path)?;
                report.staged_changes += 1;
                report.deleted.push(path);
            }
        }

        if manifest != previous || !fs.exists(&manifest_path)? {
            match manifest.to_json() {
                Ok(json) => {
                    fs.write_file(&manifest_path, &json)?;
                    report.staged_changes += 1;
                },
                Err(err) => tracing::error!("Failed to serialize the artifact manifest: {err}"),
            }
        }
        Ok(())
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.config.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
