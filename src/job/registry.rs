//! Job Registry
//!
//! Loads and caches job templates from TOML files under `data/jobs`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{DataError, JobError};

use super::api::{SkillService, WordDictionary};
use super::definition::{JobTemplate, RawJobFile};
use super::state::Job;

/// Registry for all job templates
#[derive(Default)]
pub struct JobRegistry {
    templates: HashMap<String, Arc<JobTemplate>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every job file below `data_dir/jobs`.
    ///
    /// A broken file is logged and skipped; the rest still load.
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<usize, DataError> {
        let jobs_dir = data_dir.join("jobs");
        info!("Loading jobs from {:?}", jobs_dir);

        if !jobs_dir.exists() {
            warn!("Jobs directory does not exist: {:?}", jobs_dir);
            return Ok(0);
        }

        let mut paths = Vec::new();
        collect_toml_files(&jobs_dir, &mut paths)?;
        paths.sort();

        let mut count = 0;
        for path in paths {
            match self.load_job_file(&path) {
                Ok(()) => count += 1,
                Err(e) => warn!("Failed to load job {:?}: {}", path, e),
            }
        }

        info!("Loaded {} job templates", count);
        Ok(count)
    }

    fn load_job_file(&mut self, path: &Path) -> Result<(), DataError> {
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: RawJobFile = toml::from_str(&content).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let template = JobTemplate::from_raw(&raw.job)?;
        info!(
            "Loaded job: {} ({}){}",
            template.name,
            template.id,
            if template.is_looping() { " [looping]" } else { "" }
        );
        self.insert(template);
        Ok(())
    }

    /// Add or replace a template
    pub fn insert(&mut self, template: JobTemplate) {
        if self.templates.contains_key(&template.id) {
            warn!("Duplicate job ID '{}', overwriting", template.id);
        }
        self.templates.insert(template.id.clone(), Arc::new(template));
    }

    pub fn get(&self, id: &str) -> Option<Arc<JobTemplate>> {
        self.templates.get(id).cloned()
    }

    /// All template IDs, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Build a validated job for `owner` from a template
    pub fn instantiate(
        &self,
        id: &str,
        owner: &str,
        words: &dyn WordDictionary,
        skills: &dyn SkillService,
    ) -> Result<Job, JobError> {
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| JobError::UnknownTemplate(id.to_string()))?;

        let job = template.instantiate(owner, words)?;
        job.validate(skills)?;
        Ok(job)
    }
}

fn collect_toml_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), DataError> {
    let read_err = |source: std::io::Error| DataError::Read {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();

        if path.is_dir() {
            collect_toml_files(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }

    Ok(())
}
