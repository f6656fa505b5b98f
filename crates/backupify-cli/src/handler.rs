// backupify CLI Handler
// author: kodeholic
//
// core 호출 순서: 설정 로드 → 연결 → 목록/다운로드 → 연결 종료
// 연결 이후에는 mirror 결과와 무관하게 항상 close

use backupify_core::backup::Backup;
use backupify_core::error::Result;
use backupify_core::state::{RunObserver, RunState};
use backupify_core::sync::SyncReport;

struct CliObserver;

impl RunObserver for CliObserver {
    fn on_state_changed(&self, _prev: &RunState, next: &RunState) {
        tracing::debug!("[state] → {:?}", next);
    }
}

pub async fn run(config_path: &str) -> Result<SyncReport> {
    let mut backup = Backup::new(Box::new(CliObserver));

    let config = backup.load_config(config_path)?;
    let mut sftp = backup.connect(&config).await?;

    let result = backup.mirror(&mut sftp, &config).await;

    if let Err(e) = sftp.close().await {
        tracing::warn!("Failed to close SFTP session: {}", e);
    }

    result
}
