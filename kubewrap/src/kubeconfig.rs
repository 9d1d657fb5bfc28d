use std::{fs, path::Path};

use anyhow::Context as _;
use serde::*;

// region: Context
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ContextSpec {
    pub cluster: Option<String>,
    pub user: Option<String>,
    pub namespace: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Context {
    pub name: String,
    pub context: Option<ContextSpec>,
}
// endregion

// region: Common
/// kubectl writes `contexts: null` for a config without contexts.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The parts of a kubeconfig file this crate looks at. Everything else
/// (clusters, users, preferences) is ignored so that any valid file parses.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct KubeConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub contexts: Vec<Context>,
}

impl KubeConfig {
    pub fn read_from(path: impl AsRef<Path>) -> anyhow::Result<KubeConfig> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Opening kube config {}", path.display()))?;
        if data.trim().is_empty() {
            return Ok(KubeConfig::default());
        }
        serde_yaml::from_str(&data)
            .with_context(|| format!("Parsing kube config {}", path.display()))
    }

    pub fn context_names(&self) -> impl Iterator<Item = &str> {
        self.contexts.iter().map(|ctx| ctx.name.as_str())
    }
}
// endregion

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: prod
preferences: {}
clusters:
  - name: prod-cluster
    cluster:
      server: https://prod.example.com
contexts:
  - name: prod
    context:
      cluster: prod-cluster
      user: admin
      namespace: web
  - name: staging
    context:
      cluster: staging-cluster
      user: admin
users:
  - name: admin
    user:
      token: secret
"#;

    #[test]
    fn reads_contexts_and_ignores_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let kc = KubeConfig::read_from(file.path()).unwrap();
        assert_eq!(kc.context_names().collect::<Vec<_>>(), ["prod", "staging"]);
        let prod = kc.contexts[0].context.as_ref().unwrap();
        assert_eq!(prod.namespace.as_deref(), Some("web"));
        assert_eq!(kc.contexts[1].context.as_ref().unwrap().namespace, None);
    }

    #[test]
    fn empty_file_has_no_contexts() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let kc = KubeConfig::read_from(file.path()).unwrap();
        assert!(kc.contexts.is_empty());
    }

    #[test]
    fn null_contexts_are_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"apiVersion: v1\nkind: Config\ncontexts: null\ncurrent-context: \"\"\n")
            .unwrap();
        let kc = KubeConfig::read_from(file.path()).unwrap();
        assert!(kc.contexts.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KubeConfig::read_from(dir.path().join("config")).unwrap_err();
        assert!(err.to_string().contains("Opening kube config"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"contexts: [unterminated").unwrap();
        let err = KubeConfig::read_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Parsing kube config"));
    }
}
