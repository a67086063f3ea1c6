// SPDX-License-Identifier: MIT

mod color;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use output::OutputFormat;
use qmon_core::{AgentId, HandlerKind, MonitorId, SystemClock};
use qmon_daemon::{ControlPlane, Supervisor, RUN_ENGINE_SUBCOMMAND};
use std::path::{Path, PathBuf};

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("qmon")
        .join("agents")
}

fn default_data_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("qmon")
}

fn default_engine_exe() -> PathBuf {
    std::env::current_exe().unwrap_or_else(|_| PathBuf::from("qmon"))
}

fn parse_monitor_id(s: &str) -> Result<MonitorId, std::convert::Infallible> {
    Ok(MonitorId::from_string(s))
}

fn parse_handler_kind(s: &str) -> Result<HandlerKind, String> {
    match s {
        "echo" => Ok(HandlerKind::Echo),
        other => other
            .strip_prefix("local:")
            .map(|model| HandlerKind::Local { model: model.to_string() })
            .or_else(|| {
                other.strip_prefix("remote:").and_then(|rest| {
                    let (sdk, model) = rest.split_once(':')?;
                    Some(HandlerKind::Remote { sdk: sdk.to_string(), model: model.to_string() })
                })
            })
            .ok_or_else(|| format!("unrecognized handler kind {other:?} (expected echo, local:<model>, or remote:<sdk>:<model>)")),
    }
}

#[derive(Parser)]
#[command(name = "qmon", version, about = "Agent-mention queue engine and supervisor.", styles = color::styles())]
struct Cli {
    /// Directory holding per-agent TOML configs.
    #[arg(long, global = true, default_value_os_t = default_config_dir())]
    config_dir: PathBuf,

    /// Directory holding per-agent WALs, the process table, and the kill switch.
    #[arg(long, global = true, default_value_os_t = default_data_dir())]
    data_dir: PathBuf,

    /// Output format for list/status.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the engine for one agent.
    Start {
        agent_id: String,
        #[arg(long, default_value = "echo", value_parser = parse_handler_kind)]
        handler: HandlerKind,
    },
    /// Stop a monitor gracefully (SIGTERM, then SIGKILL after a grace period).
    Stop {
        #[arg(value_parser = parse_monitor_id)]
        monitor_id: MonitorId,
    },
    /// Stop then start a monitor's agent again, reusing its last handler.
    Restart {
        #[arg(value_parser = parse_monitor_id)]
        monitor_id: MonitorId,
    },
    /// Immediately kill a monitor, no grace period.
    Kill {
        #[arg(value_parser = parse_monitor_id)]
        monitor_id: MonitorId,
    },
    /// Remove a stopped monitor's record.
    Delete {
        #[arg(value_parser = parse_monitor_id)]
        monitor_id: MonitorId,
    },
    /// List tracked monitors, merged with any live but untracked engine processes.
    List,
    /// Activate the fleet-wide kill switch and hard-kill every monitor.
    KillAll,
    /// Fleet summary: kill switch state and running/total monitor counts.
    Status,
    /// Operate on named deployment groups.
    Groups {
        #[command(subcommand)]
        command: GroupsCommand,
    },
    /// Hidden: run one agent's engine in the foreground. Spawned by `start`.
    /// Reuses the top-level `--config-dir`/`--data-dir` rather than
    /// redeclaring them, since they're already global args on [`Cli`].
    #[command(name = RUN_ENGINE_SUBCOMMAND, hide = true)]
    RunEngine {
        #[arg(long)]
        agent_id: String,
        #[arg(long, value_parser = parse_handler_kind_json)]
        handler_kind: HandlerKind,
    },
}

#[derive(Subcommand)]
enum GroupsCommand {
    /// Start every entry in a deployment group, in order.
    Start {
        /// Path to a JSON file describing the `DeploymentGroup`.
        group_file: PathBuf,
    },
}

fn parse_handler_kind_json(s: &str) -> Result<HandlerKind, String> {
    serde_json::from_str(s).map_err(|err| format!("invalid --handler-kind: {err}"))
}

fn open_supervisor(config_dir: &Path, data_dir: &Path) -> Result<Supervisor<SystemClock>, ExitError> {
    Supervisor::open(default_engine_exe(), config_dir.to_path_buf(), data_dir.to_path_buf(), SystemClock)
        .map_err(|err| ExitError::new(1, err.to_string()))
}

fn open_control_plane(config_dir: &Path, data_dir: &Path) -> Result<ControlPlane<SystemClock>, ExitError> {
    let supervisor = open_supervisor(config_dir, data_dir)?;
    Ok(ControlPlane::new(supervisor, config_dir.to_path_buf()))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    let Cli { config_dir, data_dir, format, command } = cli;

    match command {
        Command::Start { agent_id, handler } => {
            let agent_id = AgentId::parse(&agent_id).map_err(|err| ExitError::new(2, err.to_string()))?;
            let control_plane = open_control_plane(&config_dir, &data_dir)?;
            let monitor_id = control_plane
                .start(&agent_id, handler)
                .map_err(|err| ExitError::new(1, err.to_string()))?;
            println!("{}", color::literal(monitor_id.as_str()));
            Ok(())
        }
        Command::Stop { monitor_id } => open_control_plane(&config_dir, &data_dir)?
            .stop(monitor_id)
            .await
            .map_err(|err| ExitError::new(1, err.to_string())),
        Command::Restart { monitor_id } => {
            let new_id = open_control_plane(&config_dir, &data_dir)?
                .restart(monitor_id)
                .await
                .map_err(|err| ExitError::new(1, err.to_string()))?;
            println!("{}", color::literal(new_id.as_str()));
            Ok(())
        }
        Command::Kill { monitor_id } => open_control_plane(&config_dir, &data_dir)?
            .kill(monitor_id)
            .map_err(|err| ExitError::new(1, err.to_string())),
        Command::Delete { monitor_id } => open_control_plane(&config_dir, &data_dir)?
            .delete(monitor_id)
            .map_err(|err| ExitError::new(1, err.to_string())),
        Command::List => {
            let records = open_control_plane(&config_dir, &data_dir)?.list();
            output::print_monitors(&records, format).map_err(|err| ExitError::new(1, err.to_string()))
        }
        Command::KillAll => open_control_plane(&config_dir, &data_dir)?
            .kill_all()
            .map_err(|err| ExitError::new(1, err.to_string())),
        Command::Status => {
            let status = open_control_plane(&config_dir, &data_dir)?.status();
            output::print_status(&status, format).map_err(|err| ExitError::new(1, err.to_string()))
        }
        Command::Groups { command: GroupsCommand::Start { group_file } } => {
            let text = std::fs::read_to_string(&group_file).map_err(|err| ExitError::new(1, err.to_string()))?;
            let group = serde_json::from_str(&text).map_err(|err| ExitError::new(2, err.to_string()))?;
            let results = open_control_plane(&config_dir, &data_dir)?.start_group(&group).await;
            let mut failures = 0;
            for result in results {
                match result {
                    Ok(monitor_id) => println!("{}", color::literal(monitor_id.as_str())),
                    Err(err) => {
                        eprintln!("error: {err}");
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                return Err(ExitError::new(1, format!("{failures} entries failed to start")));
            }
            Ok(())
        }
        Command::RunEngine { agent_id, handler_kind } => {
            let agent_id = AgentId::parse(&agent_id).map_err(|err| ExitError::new(2, err.to_string()))?;
            qmon_daemon::run_engine::run(&agent_id, &config_dir, &data_dir, &handler_kind, shutdown_signal())
                .await
                .map_err(|err| ExitError::new(1, err.to_string()))
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {}", err.message);
        std::process::exit(err.code);
    }
}
