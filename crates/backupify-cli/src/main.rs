// backupify CLI
// author: kodeholic
//
// Usage: backupify-sftp [CONFIG]   (기본값: ./config.json)
//
// 종료 코드
//   0 : 전송 루프 완료 (개별 파일 실패 포함)
//   1 : 설정 / 연결 / 목록 조회 / 로컬 디렉토리 생성 실패
//   2 : 잘못된 인자

use std::env;
use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod handler;

use commands::Command;

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG=debug backupify-sftp config.json  (상태 전이, 파일별 크기 포함)
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let config_path = match Command::parse(&args[..]) {
        Command::Run { config_path } => config_path,
        Command::Help => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("backupify-sftp {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Command::Invalid(msg) => {
            eprintln!("{}", msg);
            print_usage();
            return ExitCode::from(2);
        }
    };

    match handler::run(&config_path).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!("backupify-sftp - download every file of a remote SFTP directory");
    println!();
    println!("Usage: backupify-sftp [CONFIG]");
    println!();
    println!("CONFIG defaults to ./config.json:");
    println!("  {{");
    println!("    \"sftp_host\": \"backup.example.com:22\",");
    println!("    \"sftp_user\": \"backup\",");
    println!("    \"sftp_password\": \"...\",");
    println!("    \"sftp_directory\": \"/backups\",");
    println!("    \"local_directory\": \"./out\",");
    println!("    \"verify_host_identity\": false");
    println!("  }}");
}
