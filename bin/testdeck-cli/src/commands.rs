use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use testdeck_client::{
    AiReportRequest, ApiClient, ClientConfig, HealthPinger, HealthState, PollCallbacks,
    PollOutcome, ResultKind, RunTestsRequest, StatusPoller, TaskLaunch, TaskSnapshot,
    TaskStatus, TrendsRequest, check_health,
};
use testdeck_ui::utils::{format_date_time, format_duration};
use tracing::{info, warn};

use crate::cli::Command;

/// Run one subcommand. `Ok(false)` means it ran but did not succeed.
pub async fn dispatch(cmd: Command, client: ApiClient, cfg: &ClientConfig) -> anyhow::Result<bool> {
    let client = Arc::new(client);
    match cmd {
        Command::Health { watch: false } => {
            let state = check_health(&*client).await;
            println!("{}", health_label(state));
            Ok(state == HealthState::Healthy)
        }
        Command::Health { watch: true } => {
            let pinger = HealthPinger::spawn(Arc::clone(&client), cfg.health_interval, |state| {
                println!("{}", health_label(state));
            });
            shutdown_signal().await;
            pinger.shutdown().await;
            Ok(true)
        }
        Command::Watch { task_id } => follow(client, cfg, task_id).await,
        Command::Run {
            priority,
            category,
            product_id,
            no_wait,
        } => {
            let request = RunTestsRequest {
                priority,
                category,
                product_id,
            };
            let launch = client
                .run_tests(&request)
                .await
                .context("failed to start test run")?;
            launched(client, cfg, launch, no_wait, Some(ResultKind::Report)).await
        }
        Command::Discover { no_wait } => {
            let launch = client
                .discover_products()
                .await
                .context("failed to start product discovery")?;
            launched(client, cfg, launch, no_wait, None).await
        }
        Command::AiReport {
            provider,
            summary_only,
            no_wait,
        } => {
            let request = AiReportRequest {
                provider,
                summary_only,
            };
            let launch = client
                .generate_ai_report(&request)
                .await
                .context("failed to start AI report generation")?;
            launched(client, cfg, launch, no_wait, None).await
        }
        Command::Changes { no_wait } => {
            let launch = client
                .detect_changes()
                .await
                .context("failed to start change detection")?;
            launched(client, cfg, launch, no_wait, Some(ResultKind::Changes)).await
        }
        Command::Trends { days, no_wait } => {
            let launch = client
                .analyze_trends(&TrendsRequest { days })
                .await
                .context("failed to start trend analysis")?;
            launched(client, cfg, launch, no_wait, Some(ResultKind::Trends)).await
        }
        Command::Products => {
            let list = client.list_products().await.context("failed to list products")?;
            println!("{} products", list.total);
            print_json(&list.products)?;
            Ok(true)
        }
        Command::Reports => {
            let list = client.list_reports().await.context("failed to list reports")?;
            for report in &list.reports {
                println!(
                    "{}  {}  {}",
                    report.id,
                    format_date_time(Some(report.timestamp.as_str())),
                    serde_json::to_string(&report.summary)?
                );
            }
            println!("{} reports", list.total);
            Ok(true)
        }
        Command::Latest { kind } => {
            print_latest(&client, kind).await?;
            Ok(true)
        }
        Command::SuiteHealth => {
            let report = client
                .test_suite_health()
                .await
                .context("failed to fetch test suite health")?;
            print_json(&report)?;
            Ok(true)
        }
        Command::Dashboard => {
            let build = client
                .generate_dashboard()
                .await
                .context("failed to generate dashboard")?;
            println!("dashboard {} at {}", build.status, build.url);
            Ok(true)
        }
        Command::Config => {
            let config = client
                .system_config()
                .await
                .context("failed to fetch system configuration")?;
            print_json(&config)?;
            Ok(true)
        }
    }
}

/// Report a launched task and, unless `no_wait`, follow it. When it
/// completes and the job has a `latest` result, print that too.
async fn launched(
    client: Arc<ApiClient>,
    cfg: &ClientConfig,
    launch: TaskLaunch,
    no_wait: bool,
    result: Option<ResultKind>,
) -> anyhow::Result<bool> {
    println!("task {} {}", launch.task_id, launch.status);
    if no_wait {
        return Ok(true);
    }
    let completed = follow(Arc::clone(&client), cfg, launch.task_id).await?;
    if let (true, Some(kind)) = (completed, result) {
        print_latest(&client, kind).await?;
    }
    Ok(completed)
}

async fn print_latest(client: &ApiClient, kind: ResultKind) -> anyhow::Result<()> {
    let name: &'static str = kind.into();
    let body = client
        .latest(kind)
        .await
        .with_context(|| format!("failed to fetch latest {name} result"))?;
    print_json(&body)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Poll `task_id` to the end, printing every update. Ctrl+C cancels.
async fn follow(client: Arc<ApiClient>, cfg: &ClientConfig, task_id: String) -> anyhow::Result<bool> {
    let poller = StatusPoller::from_arc(client, cfg.poll_settings());
    let started = Instant::now();

    let handle = poller.poll(
        task_id.clone(),
        PollCallbacks::new().on_update(move |s: &TaskSnapshot| {
            let elapsed = format_duration(Some(started.elapsed().as_secs_f64()));
            println!("[{elapsed}] {}", s.status);
        }),
    );
    let token = handle.cancellation_token();
    let wait = handle.wait();
    tokio::pin!(wait);

    let outcome = tokio::select! {
        outcome = &mut wait => outcome,
        _ = shutdown_signal() => {
            token.cancel();
            wait.await
        }
    };

    match outcome {
        PollOutcome::Finished(snapshot) => Ok(report(&task_id, &snapshot, started)),
        PollOutcome::Cancelled => {
            warn!(task_id, "stopped following task");
            Ok(false)
        }
    }
}

fn report(task_id: &str, snapshot: &TaskSnapshot, started: Instant) -> bool {
    let elapsed = format_duration(Some(started.elapsed().as_secs_f64()));
    match &snapshot.error {
        Some(error) => println!("task {task_id} {} after {elapsed}: {error}", snapshot.status),
        None => println!("task {task_id} {} after {elapsed}", snapshot.status),
    }
    if let Some(result) = snapshot.result() {
        match serde_json::to_string_pretty(result) {
            Ok(body) => println!("{body}"),
            Err(e) => warn!(error = %e, "could not render task result"),
        }
    }
    snapshot.status == TaskStatus::Completed
}

fn health_label(state: HealthState) -> &'static str {
    match state {
        HealthState::Healthy => "系统正常",
        HealthState::Unhealthy => "系统异常",
        HealthState::Unreachable => "连接失败",
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("interrupt received");
}
