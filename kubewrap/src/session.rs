//! Per-shell context and namespace.
//!
//! A [`Session`] is the pair of values a terminal session carries between
//! kubectl calls. It is seeded from `KUBE_CONTEXT` / `KUBE_NAMESPACE` and
//! handed back to the shell as `export` statements, so nothing in kubectl's
//! own config is touched.

use serde::{Deserialize, Serialize};

use crate::{CONTEXT_VAR, NAMESPACE_VAR};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    context: Option<String>,
    namespace: Option<String>,
}

/// The visible state of a session after a switch or clear.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub context: Option<String>,
    pub namespace: Option<String>,
}

/// A single forwarded call with context and namespace already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub args: Vec<String>,
}

impl Invocation {
    /// Arguments handed to kubectl. Both flags are always present; an absent
    /// value is passed as empty, which kubectl treats as unset.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(format!("--context={}", self.context.as_deref().unwrap_or("")));
        argv.push(format!(
            "--namespace={}",
            self.namespace.as_deref().unwrap_or("")
        ));
        argv.extend(self.args.iter().cloned());
        argv
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// sh, bash, zsh and friends.
    Posix,
    Fish,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            context: non_empty(lookup(CONTEXT_VAR)),
            namespace: non_empty(lookup(NAMESPACE_VAR)),
        }
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = Some(context.into());
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = Some(namespace.into());
    }

    pub fn clear_context(&mut self) {
        self.context = None;
    }

    pub fn clear_namespace(&mut self) {
        self.namespace = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            context: self.context.clone(),
            namespace: self.namespace.clone(),
        }
    }

    /// Explicit values win over the session; absent values stay absent.
    pub fn resolve(
        &self,
        context: Option<&str>,
        namespace: Option<&str>,
        args: Vec<String>,
    ) -> Invocation {
        Invocation {
            context: context.or(self.context()).map(str::to_owned),
            namespace: namespace.or(self.namespace()).map(str::to_owned),
            args,
        }
    }

    /// Shell statements that carry this session into the calling shell.
    pub fn exports(&self, shell: Shell) -> String {
        let vars = [
            (CONTEXT_VAR, &self.context),
            (NAMESPACE_VAR, &self.namespace),
        ];
        vars.into_iter()
            .map(|(name, value)| match (shell, value) {
                (Shell::Posix, Some(v)) => format!("export {name}={}\n", quote(v)),
                (Shell::Posix, None) => format!("unset {name}\n"),
                (Shell::Fish, Some(v)) => format!("set -gx {name} {}\n", quote(v)),
                (Shell::Fish, None) => format!("set -e {name}\n"),
            })
            .collect()
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
