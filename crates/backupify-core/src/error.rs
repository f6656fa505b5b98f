// backupify Error Types
// author: kodeholic
//
// thiserror를 사용하지 않고 직접 구현
// Display: 에러 메시지 포맷팅
// source(): 원인 에러 보존 (russh / russh-sftp / serde_json / io)
//
// Transfer 만 non-fatal (파일 단위로 로그 후 계속), 나머지는 실행 중단

use std::fmt;
use std::path::PathBuf;

use crate::state::RunState;

/// 원인 에러 (라이브러리마다 타입이 달라 박싱)
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 연결 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStage {
    Transport,  // TCP + SSH 핸드셰이크 + 비밀번호 인증
    Session,    // 채널 오픈 + sftp subsystem
}

/// 파일 단위 전송 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    Open,    // 리모트 파일 열기
    Create,  // 로컬 파일 생성
    Copy,    // 스트리밍 복사
}

#[derive(Debug)]
pub enum Error {
    InvalidTransition {
        from: RunState,
        to: RunState,
    },
    Config {
        path: PathBuf,
        cause: Cause,
    },
    Connection {
        stage: ConnectStage,
        cause: Cause,
    },
    List {
        path: String,
        cause: Cause,
    },
    LocalDir {
        path: PathBuf,
        cause: std::io::Error,
    },
    Transfer {
        stage: TransferStage,
        path: String,
        cause: Cause,
    },
}

impl Error {
    pub fn connection(stage: ConnectStage, cause: impl Into<Cause>) -> Self {
        Error::Connection { stage, cause: cause.into() }
    }

    pub fn transfer(stage: TransferStage, path: &str, cause: impl Into<Cause>) -> Self {
        Error::Transfer { stage, path: path.to_string(), cause: cause.into() }
    }

    /// 실행 전체를 중단해야 하는 에러인지
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Transfer { .. })
    }
}

impl fmt::Display for ConnectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectStage::Transport => write!(f, "failed to connect to SFTP server"),
            ConnectStage::Session   => write!(f, "failed to create SFTP client"),
        }
    }
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStage::Open   => write!(f, "failed to open remote file"),
            TransferStage::Create => write!(f, "failed to create local file"),
            TransferStage::Copy   => write!(f, "failed to download file"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTransition { from, to } => write!(f, "Invalid state transition: {:?} → {:?}", from, to),
            Error::Config { path, cause }         => write!(f, "Failed config loading {}: {}", path.display(), cause),
            Error::Connection { stage, cause }    => write!(f, "{}: {}", stage, cause),
            Error::List { path, cause }           => write!(f, "Read directory {} failed: {}", path, cause),
            Error::LocalDir { path, cause }       => write!(f, "Failed to create local directory {}: {}", path.display(), cause),
            Error::Transfer { stage, cause, .. }  => write!(f, "{}: {}", stage, cause),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidTransition { .. } => None,
            Error::LocalDir { cause, .. }  => Some(cause),
            Error::Config { cause, .. }
            | Error::Connection { cause, .. }
            | Error::List { cause, .. }
            | Error::Transfer { cause, .. } => Some(cause.as_ref() as &(dyn std::error::Error + 'static)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn only_transfer_errors_are_recoverable() {
        let transfer = Error::transfer(TransferStage::Open, "/backups/a.txt", "permission denied");
        assert!(!transfer.is_fatal());

        let conn = Error::connection(ConnectStage::Transport, "connection refused");
        assert!(conn.is_fatal());

        let list = Error::List { path: "/nope".to_string(), cause: "no such file".into() };
        assert!(list.is_fatal());
    }

    #[test]
    fn display_wraps_cause() {
        let e = Error::connection(ConnectStage::Session, "subsystem request failed");
        assert_eq!(e.to_string(), "failed to create SFTP client: subsystem request failed");
        assert_eq!(e.source().map(|s| s.to_string()).as_deref(), Some("subsystem request failed"));

        let e = Error::transfer(TransferStage::Copy, "/r/x", "broken pipe");
        assert_eq!(e.to_string(), "failed to download file: broken pipe");
    }
}
