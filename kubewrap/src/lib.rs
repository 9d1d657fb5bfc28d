pub mod completion;
pub mod duration;
pub mod error;
pub mod get;
pub mod kubeconfig;
pub mod runner;
pub mod session;
pub mod table;
pub mod wrapper;

use std::path::PathBuf;

pub use completion::{context_names, kubeconfig_paths, Completions, MatchAlgorithm};
pub use error::{Error, Result};
pub use get::{GetOutcome, GetPlan, GetRequest};
pub use runner::{CommandRunner, KubectlRunner, Output};
pub use session::{Invocation, Session, SessionSnapshot, Shell};
pub use table::{Cell, Reinterpreted, ResourceTable, TableError};
pub use wrapper::{ClearOptions, KubeconfigInfo, Kubectl};

/// Environment variable holding the session's current context.
pub const CONTEXT_VAR: &str = "KUBE_CONTEXT";
/// Environment variable holding the session's current namespace.
pub const NAMESPACE_VAR: &str = "KUBE_NAMESPACE";
/// Search path of kubeconfig files.
pub const KUBECONFIG_VAR: &str = "KUBECONFIG";

pub fn kube_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kube"))
}
