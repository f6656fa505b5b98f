// backupify Transfer Loop
// author: kodeholic
//
// 1. 로컬 디렉토리 생성 (없으면 중간 경로까지) → 실패 시 실행 중단
// 2. 디렉토리가 아닌 엔트리마다 리모트 → 로컬 복사
//    - 리모트 열기 → 로컬 생성 → 64KB 청크 복사
//    - 파일 하나 실패: warn 로그 후 다음 파일 계속
//    - 같은 이름 로컬 파일은 항상 덮어씀

use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{Error, Result, TransferStage};
use crate::sftp::{RemoteEntry, RemoteFs};
use crate::utils::{fmt_size, join_remote, local_target};

const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// 한 번의 전송 루프 결과 (로그 출력용, 저장하지 않음)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub attempted: usize,     // 전송 시도한 파일 수
    pub downloaded: usize,    // 성공
    pub failed: usize,        // 실패 (로그만 남김)
    pub skipped_dirs: usize,  // 건너뛴 디렉토리
    pub bytes: u64,           // 성공한 파일들의 총 바이트
}

/// 로컬 디렉토리 생성 (중간 경로 포함, unix 에서는 0o777 & ~umask)
///
/// 빈 경로는 실패 (작업 디렉토리에 쓰지 않도록)
pub async fn ensure_local_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(Error::LocalDir {
            path: dir.to_path_buf(),
            cause: std::io::Error::new(std::io::ErrorKind::NotFound, "local_directory is empty"),
        });
    }

    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o777);

    builder.create(dir)
        .await
        .map_err(|cause| Error::LocalDir { path: dir.to_path_buf(), cause })
}

/// 로컬 디렉토리가 이미 있다는 전제로 전송 루프 실행
///
/// 파일 단위 실패는 SyncReport.failed 로만 집계
pub async fn transfer_entries<R: RemoteFs>(
    remote: &mut R,
    entries: &[RemoteEntry],
    remote_dir: &str,
    local_dir: &Path,
) -> SyncReport {
    let mut report = SyncReport::default();

    for entry in entries {
        if entry.is_dir {
            tracing::debug!("[sync] skip directory {}", entry.name);
            report.skipped_dirs += 1;
            continue;
        }

        let remote_path = join_remote(remote_dir, &entry.name);
        let local_path  = local_dir.join(&entry.name);
        report.attempted += 1;

        tracing::info!("Downloading {} -> {}", remote_path, local_path.display());

        match download(remote, &remote_path, local_dir, &entry.name).await {
            Ok(n) => {
                tracing::debug!("[sync] {} done ({})", remote_path, fmt_size(n));
                report.downloaded += 1;
                report.bytes += n;
            }
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", remote_path, e);
                report.failed += 1;
            }
        }
    }

    report
}

/// 파일 하나 다운로드. 두 핸들 모두 이 함수를 벗어나면 닫힘
///
/// 리모트 열기에 실패하면 로컬 파일은 만들지 않음
/// 복사 도중 실패하면 쓰다 만 로컬 파일을 지움
pub async fn download<R: RemoteFs>(
    remote: &mut R,
    remote_path: &str,
    local_dir: &Path,
    name: &str,
) -> Result<u64> {
    let mut remote_file = remote.open(remote_path).await?;

    let local_path = local_target(local_dir, name).ok_or_else(|| {
        Error::transfer(TransferStage::Create, remote_path, format!("unsafe file name '{}'", name))
    })?;

    let mut local_file = tokio::fs::File::create(&local_path)
        .await
        .map_err(|e| Error::transfer(TransferStage::Create, remote_path, e))?;

    match copy_stream(&mut remote_file, &mut local_file).await {
        Ok(n) => Ok(n),
        Err(e) => {
            drop(local_file);
            discard_partial(&local_path).await;
            Err(Error::transfer(TransferStage::Copy, remote_path, e))
        }
    }
}

async fn copy_stream<S, D>(src: &mut S, dst: &mut D) -> std::io::Result<u64>
where
    S: tokio::io::AsyncRead + Unpin,
    D: tokio::io::AsyncWrite + Unpin,
{
    let mut buf         = vec![0u8; CHUNK_SIZE];
    let mut transferred = 0u64;

    loop {
        let n = src.read(&mut buf).await?;
        if n == 0 { break; }

        dst.write_all(&buf[..n]).await?;
        transferred += n as u64;
    }

    dst.flush().await?;
    Ok(transferred)
}

async fn discard_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!("[sync] could not remove partial file {}: {}", path.display(), e);
    }
}
