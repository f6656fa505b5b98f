// backupify SFTP (russh-sftp 기반)
// author: kodeholic
//
// RemoteEntry : 리모트 디렉토리 엔트리 (이름 + 디렉토리 여부)
// RemoteFs    : 목록 조회 / 파일 열기 추상화 (sync 루프는 이 trait만 사용)
// SftpClient  : russh-sftp 세션 위의 RemoteFs 구현 + 연결 종료

use async_trait::async_trait;
use russh::client::Handle;
use russh_sftp::client::SftpSession;
use tokio::io::AsyncRead;

use crate::error::{ConnectStage, Error, Result, TransferStage};
use crate::session::ClientHandler;

const S_IFMT: u32  = 0o170000;
const S_IFDIR: u32 = 0o040000;

/// 리모트 디렉토리 엔트리
///
/// 서버가 돌려준 순서 그대로 사용 (정렬하지 않음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

#[cfg(test)]
impl RemoteEntry {
    pub(crate) fn file(name: &str, size: u64) -> Self {
        Self { name: name.to_string(), is_dir: false, size }
    }

    pub(crate) fn dir(name: &str) -> Self {
        Self { name: name.to_string(), is_dir: true, size: 0 }
    }
}

/// 리모트 파일시스템
///
/// SftpClient가 실제 구현, 테스트에서는 메모리 기반 구현으로 교체
#[async_trait]
pub trait RemoteFs: Send {
    type File: AsyncRead + Unpin + Send;

    /// 디렉토리 목록 (".", ".." 제외). 실패 시 Error::List
    async fn read_dir(&mut self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// 읽기 전용으로 열기. 실패 시 Error::Transfer(Open)
    async fn open(&mut self, path: &str) -> Result<Self::File>;
}

// ── SftpClient ────────────────────────────────────────────────────────────────

pub struct SftpClient {
    sftp: SftpSession,
    ssh: Handle<ClientHandler>,
}

impl SftpClient {
    pub(crate) fn new(sftp: SftpSession, ssh: Handle<ClientHandler>) -> Self {
        Self { sftp, ssh }
    }

    /// SFTP 세션 + SSH 연결 종료
    ///
    /// 성공/실패와 무관하게 실행 마지막에 한 번 호출
    pub async fn close(self) -> Result<()> {
        drop(self.sftp);
        self.ssh
            .disconnect(russh::Disconnect::ByApplication, "", "English")
            .await
            .map_err(|e| Error::connection(ConnectStage::Transport, e))?;
        tracing::debug!("[sftp] session closed");
        Ok(())
    }
}

#[async_trait]
impl RemoteFs for SftpClient {
    type File = russh_sftp::client::fs::File;

    async fn read_dir(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        let dir = self.sftp.read_dir(path)
            .await
            .map_err(|e| Error::List { path: path.to_string(), cause: e.into() })?;

        let entries = dir.into_iter()
            .filter(|e| e.file_name() != "." && e.file_name() != "..")
            .map(|e| {
                let attrs = e.metadata();
                let is_dir = attrs.permissions
                    .map(|p| p & S_IFMT == S_IFDIR)
                    .unwrap_or(false);
                RemoteEntry {
                    name: e.file_name().to_string(),
                    is_dir,
                    size: attrs.size.unwrap_or(0),
                }
            })
            .collect();

        Ok(entries)
    }

    async fn open(&mut self, path: &str) -> Result<Self::File> {
        self.sftp.open(path)
            .await
            .map_err(|e| Error::transfer(TransferStage::Open, path, e))
    }
}
