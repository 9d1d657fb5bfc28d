use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::get::{GetOutcome, GetPlan, GetRequest};
use crate::runner::{CommandRunner, Output};
use crate::session::{Session, SessionSnapshot};
use crate::table::{reinterpret, Reinterpreted};

/// Context and namespace as persisted in kubectl's own config.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KubeconfigInfo {
    pub context: String,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOptions {
    /// Keep the session context.
    pub no_context: bool,
    /// Keep the session namespace.
    pub no_namespace: bool,
    /// Also drop kubectl's persisted current-context and the namespaces
    /// recorded for it.
    pub kubeconfig: bool,
}

fn args<const N: usize>(list: [&str; N]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn non_empty(out: &Output) -> Option<String> {
    let text = out.stdout.trim();
    (out.is_success() && !text.is_empty()).then(|| text.to_string())
}

/// kubectl, seen through a [`Session`].
pub struct Kubectl<R> {
    runner: R,
}

impl<R: CommandRunner> Kubectl<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Forward `args` with the session applied; kubectl owns the terminal.
    pub fn wrap(
        &self,
        session: &Session,
        context: Option<&str>,
        namespace: Option<&str>,
        args: Vec<String>,
    ) -> Result<i32> {
        let invocation = session.resolve(context, namespace, args);
        self.runner.stream(&invocation.argv())
    }

    pub fn get(&self, session: &Session, request: &GetRequest) -> Result<GetOutcome> {
        let plan = request.plan();
        debug!("get plan: {plan:?}");
        let invocation = session.resolve(
            request.context.as_deref(),
            request.namespace.as_deref(),
            request.forwarded_args(plan),
        );
        let argv = invocation.argv();

        if plan == GetPlan::Watch {
            return Ok(GetOutcome::Streamed(self.runner.stream(&argv)?));
        }

        let Output {
            stdout,
            stderr,
            code,
        } = self.runner.run(&argv)?;
        if plan != GetPlan::List || code != 0 {
            return Ok(GetOutcome::Raw {
                stdout,
                stderr,
                code,
            });
        }

        Ok(match reinterpret(stdout) {
            Reinterpreted::Table(table) => GetOutcome::Table { table, stderr },
            Reinterpreted::Raw(stdout) => GetOutcome::Raw {
                stdout,
                stderr,
                code,
            },
        })
    }

    pub fn switch(
        &self,
        session: &mut Session,
        context: &str,
        namespace: Option<&str>,
    ) -> SessionSnapshot {
        session.set_context(context);
        if let Some(namespace) = namespace {
            session.set_namespace(namespace);
        }
        session.snapshot()
    }

    pub fn namespace(&self, session: &mut Session, namespace: &str) -> String {
        session.set_namespace(namespace);
        namespace.to_string()
    }

    pub fn clear(&self, session: &mut Session, options: ClearOptions) -> SessionSnapshot {
        if options.kubeconfig {
            self.clear_kubeconfig(session.context());
        }
        if !options.no_context {
            session.clear_context();
        }
        if !options.no_namespace {
            session.clear_namespace();
        }
        session.snapshot()
    }

    /// Best effort: every failure is logged and otherwise ignored.
    fn clear_kubeconfig(&self, session_context: Option<&str>) {
        let mut contexts: Vec<String> = session_context.map(str::to_owned).into_iter().collect();
        if let Some(current) = self.current_context() {
            if !contexts.contains(&current) {
                contexts.push(current);
            }
        }

        for context in &contexts {
            self.best_effort(vec![
                "config".to_string(),
                "unset".to_string(),
                format!("contexts.{context}.namespace"),
            ]);
        }
        self.best_effort(args(["config", "unset", "current-context"]));
    }

    fn best_effort(&self, args: Vec<String>) {
        match self.runner.run(&args) {
            Ok(out) if out.is_success() => debug!("kubectl {} ok", args.join(" ")),
            Ok(out) => warn!("ignoring failed kubectl {}: {}", args.join(" "), out.stderr.trim()),
            Err(e) => warn!("ignoring failed kubectl {}: {e}", args.join(" ")),
        }
    }

    fn current_context(&self) -> Option<String> {
        match self.runner.run(&args(["config", "current-context"])) {
            Ok(out) => non_empty(&out),
            Err(e) => {
                debug!("no current context: {e}");
                None
            }
        }
    }

    /// kubectl's persisted current-context and its namespace, independent of
    /// the session. `None` when no context is persisted.
    pub fn kubeconfig_info(&self) -> Result<Option<KubeconfigInfo>> {
        let out = self.runner.run(&args(["config", "current-context"]))?;
        let Some(context) = non_empty(&out) else {
            return Ok(None);
        };
        let out = self.runner.run(&args([
            "config",
            "view",
            "--minify",
            "--output=jsonpath={..namespace}",
        ]))?;
        Ok(Some(KubeconfigInfo {
            context,
            namespace: non_empty(&out),
        }))
    }
}
