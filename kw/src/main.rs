mod cli;
mod config;
mod render;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use log::{debug, info};

use kubewrap::{
    kubeconfig_paths, ClearOptions, Completions, GetOutcome, GetRequest, KubectlRunner, Kubectl,
    Session, Shell, KUBECONFIG_VAR,
};

use cli::{Cli, Command, Format, ShellKind};

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Either the session as a record or the shell statements that load it.
fn print_session(format: Format, session: &Session, export: Option<ShellKind>) -> Result<()> {
    let mut out = io::stdout().lock();
    match export {
        Some(shell) => {
            out.write_all(session.exports(Shell::from(shell)).as_bytes())?;
            Ok(())
        }
        None => render::session(&mut out, format, &session.snapshot()),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();
    debug!("kubectl={} format={:?}", cli.kubectl, cli.format);

    let kubectl = Kubectl::new(KubectlRunner::new(&cli.kubectl));
    let mut session = Session::from_env();
    debug!(
        "session: context={:?} namespace={:?}",
        session.context(),
        session.namespace()
    );

    let code = match cli.command {
        Command::Wrap(args) => kubectl.wrap(
            &session,
            args.target.context.as_deref(),
            args.target.namespace.as_deref(),
            args.args,
        )?,
        Command::Get(args) => {
            let request = GetRequest {
                context: args.target.context,
                namespace: args.target.namespace,
                output: args.output,
                watch: args.watch,
                no_parse: args.no_parse,
                args: args.args,
            }
            .absorb_inline_flags();
            match kubectl.get(&session, &request)? {
                GetOutcome::Streamed(code) => code,
                GetOutcome::Raw {
                    stdout,
                    stderr,
                    code,
                } => {
                    render::raw(&stdout, &stderr).context("Writing kubectl output")?;
                    code
                }
                GetOutcome::Table { table, stderr } => {
                    render::resource_table(&mut io::stdout().lock(), cli.format, &table)?;
                    io::stderr().write_all(stderr.as_bytes())?;
                    0
                }
            }
        }
        Command::Switch(args) => {
            kubectl.switch(&mut session, &args.context, args.namespace.as_deref());
            info!("switched to context {}", args.context);
            print_session(cli.format, &session, args.export)?;
            0
        }
        Command::Namespace(args) => {
            let namespace = kubectl.namespace(&mut session, &args.namespace);
            match args.export {
                Some(_) => print_session(cli.format, &session, args.export)?,
                None => {
                    let mut out = io::stdout().lock();
                    render::value(&mut out, cli.format, &namespace, &namespace)?
                }
            }
            0
        }
        Command::Clear(args) => {
            let options = ClearOptions {
                no_context: args.no_context,
                no_namespace: args.no_namespace,
                kubeconfig: args.kubeconfig,
            };
            kubectl.clear(&mut session, options);
            print_session(cli.format, &session, args.export)?;
            0
        }
        Command::KubeconfigInfo => {
            let info = kubectl.kubeconfig_info()?;
            render::kubeconfig_info(&mut io::stdout().lock(), cli.format, info.as_ref())?;
            0
        }
        Command::CompleteContexts(args) => {
            let search_path = std::env::var_os(KUBECONFIG_VAR);
            let paths = kubeconfig_paths(search_path.as_deref());
            debug!("completion sources: {paths:?}");
            let completions = Completions::for_contexts(
                &paths,
                args.query.as_deref(),
                args.algorithm.into(),
            );
            if cli.format == Format::Table && completions.candidates.is_empty() {
                return Ok(ExitCode::SUCCESS);
            }
            let plain = completions.candidates.join("\n");
            render::value(&mut io::stdout().lock(), cli.format, &completions, &plain)?;
            0
        }
    };

    Ok(exit_code(code))
}
