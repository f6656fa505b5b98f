// backupify Run Driver
// author: kodeholic
//
// RunState 전이를 담당하는 한 번의 실행 단위
//
//   load_config() : Init       → Configured
//   connect()     : Configured → Connected
//   mirror()      : Connected  → Listed → LocalDirReady → Transferring → Done
//
// Transferring 전까지의 실패는 Aborted 로 전이 후 에러 반환
// 연결 종료(close)는 호출한 쪽 책임

use std::future::Future;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session;
use crate::sftp::{RemoteFs, SftpClient};
use crate::state::{RunObserver, RunState};
use crate::sync::{self, SyncReport};

pub struct Backup {
    state: RunState,
    observer: Box<dyn RunObserver>,
}

impl Backup {
    pub fn new(observer: Box<dyn RunObserver>) -> Self {
        Self { state: RunState::Init, observer }
    }

    pub fn state(&self) -> &RunState { &self.state }

    fn transition(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(&next) {
            return Err(Error::InvalidTransition { from: self.state.clone(), to: next });
        }
        let prev = std::mem::replace(&mut self.state, next);
        self.observer.on_state_changed(&prev, &self.state);
        Ok(())
    }

    /// 현재 상태에서 Aborted 로 전이하고 에러를 그대로 돌려줌
    fn abort(&mut self, err: Error) -> Error {
        let current = self.state.clone();
        let next = RunState::Aborted { state: Box::new(current), message: err.to_string() };
        if self.state.can_transition_to(&next) {
            let prev = std::mem::replace(&mut self.state, next);
            self.observer.on_state_changed(&prev, &self.state);
        }
        err
    }

    pub fn load_config(&mut self, path: impl AsRef<Path>) -> Result<Config> {
        match Config::load(path) {
            Ok(config) => {
                self.transition(RunState::Configured)?;
                Ok(config)
            }
            Err(e) => Err(self.abort(e)),
        }
    }

    /// SSH + SFTP 연결
    pub async fn connect(&mut self, config: &Config) -> Result<SftpClient> {
        self.connect_with(session::connect(config)).await
    }

    /// 임의의 연결 future 로 Connected 전이 (테스트에서 RemoteFs 교체용)
    pub async fn connect_with<R, F>(&mut self, connecting: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        if self.state != RunState::Configured {
            return Err(Error::InvalidTransition { from: self.state.clone(), to: RunState::Connected });
        }
        match connecting.await {
            Ok(remote) => {
                self.transition(RunState::Connected)?;
                Ok(remote)
            }
            Err(e) => Err(self.abort(e)),
        }
    }

    /// 리모트 디렉토리 목록 조회 → 로컬 디렉토리 준비 → 파일별 다운로드
    ///
    /// 개별 파일 실패는 SyncReport 에만 반영되고 항상 Done 까지 진행
    pub async fn mirror<R: RemoteFs>(&mut self, remote: &mut R, config: &Config) -> Result<SyncReport> {
        let entries = match remote.read_dir(&config.remote_directory).await {
            Ok(entries) => entries,
            Err(e) => return Err(self.abort(e)),
        };
        self.transition(RunState::Listed)?;
        tracing::debug!("[backup] {} entries in {}", entries.len(), config.remote_directory);

        if let Err(e) = sync::ensure_local_dir(&config.local_directory).await {
            return Err(self.abort(e));
        }
        self.transition(RunState::LocalDirReady)?;

        self.transition(RunState::Transferring)?;
        let report = sync::transfer_entries(
            remote,
            &entries,
            &config.remote_directory,
            &config.local_directory,
        ).await;
        self.transition(RunState::Done)?;

        tracing::info!("Download completed");
        tracing::info!(
            "{} downloaded, {} failed, {} directories skipped ({} bytes)",
            report.downloaded, report.failed, report.skipped_dirs, report.bytes,
        );
        Ok(report)
    }
}
