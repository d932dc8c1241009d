//! # whotofollow-app
//!
//! WhoToFollow 콘솔 바이너리 진입점.
//! 설정 로드, 어댑터 DI 와이어링, 표준 입력 명령 루프, 라이프사이클 관리.

mod command;
mod console_view;
mod lifecycle;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use whotofollow_core::config::AppConfig;
use whotofollow_core::config_manager::ConfigManager;
use whotofollow_core::error::CoreError;
use whotofollow_core::models::row::RowState;
use whotofollow_core::ports::row_view::RowView;
use whotofollow_network::avatar_client::HttpAvatarLoader;
use whotofollow_network::github_client::GithubUserClient;
use whotofollow_suggestion::engine::SuggestionEngine;

use crate::command::{Command, HELP};
use crate::console_view::{stdout_writer, ConsoleView, SharedWriter};
use crate::lifecycle::{wait_for_shutdown, LifecycleManager};

/// GitHub "팔로우 추천" 콘솔 클라이언트
#[derive(Parser, Debug)]
#[command(name = "whotofollow")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// GitHub API URL 지정 (기본: https://api.github.com)
    #[arg(long)]
    base_url: Option<String>,

    /// 추천 행 개수
    #[arg(long, short = 'r')]
    rows: Option<usize>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 아바타 다운로드 비활성화
    #[arg(long)]
    no_avatars: bool,
}

/// 설정 파일 로드. 실패하면 기본값으로 계속한다.
fn load_config(path: Option<PathBuf>) -> AppConfig {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    match manager {
        Ok(manager) => {
            info!("설정 로드: {}", manager.config_path().display());
            manager.get()
        }
        Err(e) => {
            warn!("설정 로드 실패, 기본값 사용: {e}");
            AppConfig::default_config()
        }
    }
}

/// CLI 인자와 환경 변수로 설정 오버라이드 (파일에는 저장하지 않음)
fn apply_overrides(config: &mut AppConfig, args: &Args, env_token: Option<String>) {
    if let Some(ref base_url) = args.base_url {
        config.github.base_url = base_url.clone();
    }
    if let Some(rows) = args.rows {
        config.suggestion.row_count = rows;
    }
    if args.no_avatars {
        config.avatar.enabled = false;
    }
    if config.github.token.is_none() {
        config.github.token = env_token.filter(|t| !t.trim().is_empty());
    }
}

/// 어댑터 생성 + 엔진 시작
fn build_engine(config: &AppConfig, out: SharedWriter) -> Result<SuggestionEngine, CoreError> {
    let timeout = config.request_timeout();
    let user_source = Arc::new(GithubUserClient::new(&config.github, timeout)?);

    let mut builder = SuggestionEngine::builder(&config.suggestion, user_source)
        .views(move |_| -> Box<dyn RowView> { Box::new(ConsoleView::new(out.clone())) });
    if config.avatar.enabled {
        let loader = HttpAvatarLoader::new(&config.github, timeout, config.avatar.size_px)?;
        builder = builder.avatar_loader(Arc::new(loader));
    }
    builder.start()
}

/// `s` 명령 출력
fn render_status(engine: &SuggestionEngine) -> String {
    let batch = engine.latest_batch();
    let mut lines = vec![
        format!("조회 상태: {:?}", engine.fetch_status()),
        format!(
            "최신 배치: version={}, since={}, users={}",
            batch.version,
            batch.cursor.map_or_else(|| "-".to_string(), |c| c.to_string()),
            batch.users.len()
        ),
    ];
    for row in engine.row_ids() {
        let state = match engine.row_state(row) {
            Ok(RowState::Showing(user)) => format!("{} (#{})", user.name, user.id),
            Ok(RowState::Empty) => "(비어 있음)".to_string(),
            Err(e) => e.to_string(),
        };
        lines.push(format!("  [{}] {state}", row.index() + 1));
    }
    lines.join("\n")
}

fn execute(engine: &SuggestionEngine, command: Command) -> Result<(), CoreError> {
    match command {
        Command::Refresh => engine.refresh(),
        Command::Dismiss(row) => engine.dismiss(row),
        Command::Status => {
            println!("{}", render_status(engine));
            Ok(())
        }
        Command::Help => {
            println!("{HELP}");
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}

/// 표준 입력 명령 루프 (q, EOF, 종료 신호 중 먼저 오는 것까지)
async fn run_console(engine: &SuggestionEngine, lifecycle: &LifecycleManager) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shutdown_rx = lifecycle.subscribe();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = wait_for_shutdown(&mut shutdown_rx) => break,
        };
        let Some(line) = line else {
            info!("입력 종료");
            break;
        };

        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = execute(engine, command) {
                    eprintln!("⚠️  {e}");
                }
            }
            Err(e) => eprintln!("⚠️  {e}"),
        }
    }

    lifecycle.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "whotofollow={lvl},whotofollow_app={lvl},whotofollow_core={lvl},whotofollow_network={lvl},whotofollow_suggestion={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("WhoToFollow 시작");

    let mut config = load_config(args.config.clone());
    apply_overrides(&mut config, &args, std::env::var("GITHUB_TOKEN").ok());
    config.validate()?;
    info!(
        "GitHub: {}, rows={}, avatars={}, token={}",
        config.github.base_url,
        config.suggestion.row_count,
        config.avatar.enabled,
        config.github.token.is_some()
    );

    let engine = build_engine(&config, stdout_writer())?;
    let lifecycle = Arc::new(LifecycleManager::new());
    {
        let lifecycle = lifecycle.clone();
        tokio::spawn(async move {
            lifecycle.wait_for_signal().await;
        });
    }

    println!("{HELP}");
    run_console(&engine, &lifecycle).await?;

    engine.shutdown();
    info!("WhoToFollow 종료");
    Ok(())
}
