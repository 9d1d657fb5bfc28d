//! Planning for `kubectl get`.
//!
//! Listings are captured and turned into tables; everything whose shape the
//! wrapper cannot vouch for (watch streams, explicit output formats, a single
//! named resource) goes to the terminal as kubectl printed it.

use crate::table::ResourceTable;

/// Output format that still yields the default column layout.
pub const WIDE: &str = "wide";
/// Output format used for a single named resource.
pub const SINGLE_RESOURCE_FORMAT: &str = "yaml";

/// kubectl `get` flags whose value may follow as a separate token.
const VALUE_FLAGS: &[&str] = &[
    "-l",
    "--selector",
    "-L",
    "--label-columns",
    "--field-selector",
    "--sort-by",
    "-f",
    "--filename",
    "-k",
    "--kustomize",
    "--chunk-size",
    "--template",
    "--subresource",
    "--raw",
    "--cluster",
    "--user",
    "--kubeconfig",
    "-s",
    "--server",
    "--request-timeout",
    "--as",
    "--as-group",
    "--token",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetRequest {
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub output: Option<String>,
    pub watch: bool,
    pub no_parse: bool,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetPlan {
    /// Attach kubectl to the terminal; output is never captured.
    Watch,
    /// Capture and return unchanged.
    Passthrough,
    /// One named resource: capture and return unchanged, YAML by default.
    Single,
    /// Capture and reinterpret as a table.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    /// kubectl wrote straight to the terminal and exited with this code.
    Streamed(i32),
    Raw { stdout: String, stderr: String, code: i32 },
    Table { table: ResourceTable, stderr: String },
}

impl GetOutcome {
    pub fn code(&self) -> i32 {
        match self {
            GetOutcome::Streamed(code) | GetOutcome::Raw { code, .. } => *code,
            GetOutcome::Table { .. } => 0,
        }
    }
}

fn is_output_flag(arg: &str) -> bool {
    arg.starts_with("-o") || arg == "--output" || arg.starts_with("--output=")
}

fn is_watch_only(arg: &str) -> bool {
    matches!(arg, "--watch-only" | "--watch-only=true")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Context,
    Namespace,
    Output,
}

const OWN_VALUE_FLAGS: [(Slot, Option<&str>, &str); 3] = [
    (Slot::Context, None, "--context"),
    (Slot::Namespace, Some("-n"), "--namespace"),
    (Slot::Output, Some("-o"), "--output"),
];

/// Recognizes `--long`, `--long=v`, `-s`, `-sv` and `-s=v`. The value is
/// `None` when it is the next token.
fn own_value_flag(arg: &str) -> Option<(Slot, Option<&str>)> {
    for (slot, short, long) in OWN_VALUE_FLAGS {
        if arg == long || Some(arg) == short {
            return Some((slot, None));
        }
        if let Some(value) = arg.strip_prefix(long).and_then(|v| v.strip_prefix('=')) {
            return Some((slot, Some(value)));
        }
        if let Some(value) = short.and_then(|s| arg.strip_prefix(s)) {
            return Some((slot, Some(value.strip_prefix('=').unwrap_or(value))));
        }
    }
    None
}

/// `-w`, `--watch` and their `=true`/`=false` forms.
fn own_watch_flag(arg: &str) -> Option<bool> {
    match arg {
        "-w" | "--watch" => Some(true),
        _ => {
            let value = arg
                .strip_prefix("--watch=")
                .or_else(|| arg.strip_prefix("-w="))?;
            value.parse().ok()
        }
    }
}

impl GetRequest {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Moves the wrapper's own flags out of `args` into their fields. They
    /// may follow the resource type, where the command line leaves them
    /// unparsed. Later occurrences win; nothing after `--` is touched.
    pub fn absorb_inline_flags(mut self) -> Self {
        let mut rest = Vec::with_capacity(self.args.len());
        let mut args = std::mem::take(&mut self.args).into_iter();
        while let Some(arg) = args.next() {
            if arg == "--" {
                rest.push(arg);
                rest.extend(args.by_ref());
                break;
            }
            if arg == "--no-parse" {
                self.no_parse = true;
                continue;
            }
            if let Some(watch) = own_watch_flag(&arg) {
                self.watch = watch;
                continue;
            }
            let Some((slot, inline)) = own_value_flag(&arg) else {
                rest.push(arg);
                continue;
            };
            let value = match inline {
                Some(value) => value.to_string(),
                None => match args.next() {
                    Some(value) => value,
                    // Dangling flag: let kubectl report it.
                    None => {
                        rest.push(arg);
                        break;
                    }
                },
            };
            match slot {
                Slot::Context => self.context = Some(value),
                Slot::Namespace => self.namespace = Some(value),
                Slot::Output => self.output = Some(value),
            }
        }
        self.args = rest;
        self
    }

    /// Resource type and name tokens: everything that is neither a flag nor
    /// the separate value of a known value-taking flag.
    pub fn positional_count(&self) -> usize {
        let mut count = 0;
        let mut args = self.args.iter();
        while let Some(arg) = args.next() {
            if arg == "--" {
                count += args.count();
                break;
            }
            if VALUE_FLAGS.contains(&arg.as_str()) {
                args.next();
            } else if !arg.starts_with('-') {
                count += 1;
            }
        }
        count
    }

    pub fn plan(&self) -> GetPlan {
        if self.watch || self.args.iter().any(|a| is_watch_only(a)) {
            return GetPlan::Watch;
        }
        if self.no_parse || self.output.as_deref().is_some_and(|o| o != WIDE) {
            return GetPlan::Passthrough;
        }
        // Output flags still in `args` had no value; leave them to kubectl.
        if self.args.iter().any(|a| is_output_flag(a)) {
            return GetPlan::Passthrough;
        }
        if self.positional_count() == 2 {
            GetPlan::Single
        } else {
            GetPlan::List
        }
    }

    /// Output format forwarded to kubectl under `plan`.
    pub fn effective_output(&self, plan: GetPlan) -> Option<&str> {
        match (plan, self.output.as_deref()) {
            (GetPlan::Single, None) => Some(SINGLE_RESOURCE_FORMAT),
            (_, output) => output,
        }
    }

    /// Arguments after the context and namespace flags.
    pub fn forwarded_args(&self, plan: GetPlan) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 3);
        args.push("get".to_string());
        args.extend(self.args.iter().cloned());
        if let Some(output) = self.effective_output(plan) {
            args.push(format!("--output={output}"));
        }
        if self.watch {
            args.push("--watch".to_string());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_output(args: &[&str], output: &str) -> GetRequest {
        GetRequest {
            output: Some(output.to_string()),
            ..GetRequest::new(args.iter().copied())
        }
    }

    #[test]
    fn two_positionals_get_one_resource_as_yaml() {
        let req = GetRequest::new(["pod", "web-0"]);
        assert_eq!(req.plan(), GetPlan::Single);
        assert_eq!(
            req.forwarded_args(GetPlan::Single),
            ["get", "pod", "web-0", "--output=yaml"]
        );
    }

    #[test]
    fn single_resource_keeps_explicit_wide() {
        let req = with_output(&["pod", "web-0"], "wide");
        assert_eq!(req.plan(), GetPlan::Single);
        assert_eq!(req.effective_output(GetPlan::Single), Some("wide"));
    }

    #[test]
    fn other_positional_counts_are_listings() {
        let cases: [&[&str]; 4] = [
            &[],
            &["pods"],
            &["pods", "web-0", "web-1"],
            &["pods", "-A"],
        ];
        for args in cases {
            let req = GetRequest::new(args.iter().copied());
            assert_eq!(req.plan(), GetPlan::List, "{args:?}");
        }
    }

    #[test]
    fn wide_listing_is_still_parsed() {
        let req = with_output(&["pods"], "wide");
        assert_eq!(req.plan(), GetPlan::List);
        assert_eq!(
            req.forwarded_args(GetPlan::List),
            ["get", "pods", "--output=wide"]
        );
    }

    #[test]
    fn explicit_formats_pass_through() {
        assert_eq!(with_output(&["pods"], "json").plan(), GetPlan::Passthrough);
        assert_eq!(with_output(&["pod", "x"], "name").plan(), GetPlan::Passthrough);
    }

    #[test]
    fn inline_output_flags_are_absorbed() {
        for flag in ["-ojson", "-o=json", "--output=json"] {
            let req = GetRequest::new(["pods", flag]).absorb_inline_flags();
            assert_eq!(req.output.as_deref(), Some("json"), "{flag}");
            assert_eq!(req.args, ["pods"]);
            assert_eq!(req.plan(), GetPlan::Passthrough, "{flag}");
        }
    }

    #[test]
    fn dangling_output_flag_passes_through() {
        for flag in ["-o", "--output"] {
            let req = GetRequest::new(["pods", flag]).absorb_inline_flags();
            assert_eq!(req.args, ["pods", flag]);
            assert_eq!(req.plan(), GetPlan::Passthrough, "{flag}");
        }
    }

    #[test]
    fn namespace_after_resource_is_not_a_name() {
        let req = GetRequest::new(["pods", "-n", "kube-system"]).absorb_inline_flags();
        assert_eq!(req.namespace.as_deref(), Some("kube-system"));
        assert_eq!(req.args, ["pods"]);
        assert_eq!(req.plan(), GetPlan::List);

        let req = GetRequest::new(["pods", "--namespace=web"]).absorb_inline_flags();
        assert_eq!(req.namespace.as_deref(), Some("web"));
        assert_eq!(req.plan(), GetPlan::List);
    }

    #[test]
    fn context_after_resource_is_not_a_name() {
        let req = GetRequest::new(["pods", "--context", "prod"]).absorb_inline_flags();
        assert_eq!(req.context.as_deref(), Some("prod"));
        assert_eq!(req.args, ["pods"]);
        assert_eq!(req.plan(), GetPlan::List);
    }

    #[test]
    fn later_inline_flags_win() {
        let req = GetRequest {
            namespace: Some("first".to_string()),
            ..GetRequest::new(["pods", "-nsecond"])
        }
        .absorb_inline_flags();
        assert_eq!(req.namespace.as_deref(), Some("second"));
    }

    #[test]
    fn wide_after_resource_is_still_parsed() {
        let req = GetRequest::new(["pods", "-o", "wide"]).absorb_inline_flags();
        assert_eq!(req.plan(), GetPlan::List);
        assert_eq!(
            req.forwarded_args(GetPlan::List),
            ["get", "pods", "--output=wide"]
        );
    }

    #[test]
    fn arguments_after_double_dash_are_kept() {
        let req = GetRequest::new(["pods", "--", "-n", "x"]).absorb_inline_flags();
        assert_eq!(req.namespace, None);
        assert_eq!(req.args, ["pods", "--", "-n", "x"]);
    }

    #[test]
    fn selector_values_are_not_names() {
        let req = GetRequest::new(["pods", "-l", "app=web"]);
        assert_eq!(req.positional_count(), 1);
        assert_eq!(req.plan(), GetPlan::List);

        let req = GetRequest::new(["pods", "--sort-by", ".metadata.name", "web-0"]);
        assert_eq!(req.positional_count(), 2);
        assert_eq!(req.plan(), GetPlan::Single);
    }

    #[test]
    fn no_parse_passes_through() {
        let req = GetRequest {
            no_parse: true,
            ..GetRequest::new(["pods"])
        };
        assert_eq!(req.plan(), GetPlan::Passthrough);
        assert_eq!(req.forwarded_args(GetPlan::Passthrough), ["get", "pods"]);
    }

    #[test]
    fn watch_wins_over_everything() {
        let req = GetRequest {
            watch: true,
            no_parse: true,
            ..GetRequest::new(["pods"])
        };
        assert_eq!(req.plan(), GetPlan::Watch);
        assert_eq!(req.forwarded_args(GetPlan::Watch), ["get", "pods", "--watch"]);

        for flag in ["-w", "--watch", "--watch=true", "-w=true"] {
            let req = GetRequest::new(["pods", flag]).absorb_inline_flags();
            assert_eq!(req.plan(), GetPlan::Watch, "{flag}");
        }
        assert_eq!(GetRequest::new(["pods", "--watch-only"]).plan(), GetPlan::Watch);
    }

    #[test]
    fn watch_can_be_switched_off_inline() {
        let req = GetRequest {
            watch: true,
            ..GetRequest::new(["pods", "--watch=false"])
        }
        .absorb_inline_flags();
        assert!(!req.watch);
        assert_eq!(req.plan(), GetPlan::List);
    }
}
