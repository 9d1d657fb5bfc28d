//! Context-name candidates for interactive shell completion.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::debug;
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher};
use serde::{Deserialize, Serialize};

use crate::kube_dir;
use crate::kubeconfig::KubeConfig;

/// Kubeconfig files named by a `KUBECONFIG`-style search path, in order and
/// without repeats. Falls back to `~/.kube/config` when the path is unset or
/// empty.
pub fn kubeconfig_paths(search_path: Option<&OsStr>) -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    let paths: Vec<PathBuf> = search_path
        .map(|sp| std::env::split_paths(sp).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.as_os_str().is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect();

    if paths.is_empty() {
        return kube_dir().map(|dir| dir.join("config")).into_iter().collect();
    }
    paths
}

/// Every context declared across `paths`, sorted and de-duplicated. Files
/// that are missing or fail to parse contribute nothing.
pub fn context_names<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            continue;
        }
        match KubeConfig::read_from(path) {
            Ok(kc) => names.extend(kc.context_names().map(str::to_owned)),
            Err(e) => debug!("skipping {}: {e:#}", path.display()),
        }
    }
    names.into_iter().collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchAlgorithm {
    Prefix,
    Fuzzy,
}

/// Candidates plus the matching the shell is expected to apply to them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Completions {
    pub algorithm: MatchAlgorithm,
    pub candidates: Vec<String>,
}

impl Completions {
    pub fn for_contexts<P: AsRef<Path>>(
        paths: &[P],
        query: Option<&str>,
        algorithm: MatchAlgorithm,
    ) -> Self {
        let names = context_names(paths);
        let candidates = match (query, algorithm) {
            (Some(q), MatchAlgorithm::Fuzzy) => fuzzy_filter(names, q),
            (Some(q), MatchAlgorithm::Prefix) => {
                names.into_iter().filter(|n| n.starts_with(q)).collect()
            }
            (None, _) => names,
        };
        Self {
            algorithm,
            candidates,
        }
    }
}

/// Keeps names matching `query`, best matches first. Equal scores keep
/// their input order.
pub fn fuzzy_filter(names: Vec<String>, query: &str) -> Vec<String> {
    if query.trim().is_empty() {
        return names;
    }
    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
    pattern
        .match_list(names, &mut matcher)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}
