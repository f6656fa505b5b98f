// backupify Config
// author: kodeholic
//
// config.json → Config (serde_json)
// 필드가 빠져 있으면 빈 문자열 / false 로 채움 (검증 없음)
// 잘못된 값은 이후 단계(연결, 목록 조회)에서 각자 에러로 드러남

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Cause, Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "sftp_host")]
    pub server_address: String,  // "host:port"
    #[serde(rename = "sftp_user")]
    pub username: String,
    #[serde(rename = "sftp_password")]
    pub password: String,
    #[serde(rename = "sftp_directory")]
    pub remote_directory: String,
    pub local_directory: PathBuf,
    /// false 면 호스트키를 검증하지 않음 (기존 동작 유지)
    /// true 면 ~/.ssh/known_hosts 에 등록된 키만 허용
    pub verify_host_identity: bool,
}

impl Config {
    /// JSON 파일에서 로드. 파일 핸들은 함수 종료 시 닫힘
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |cause: Cause| Error::Config {
            path: path.to_path_buf(),
            cause,
        };

        let file = File::open(path).map_err(|e| config_err(e.into()))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| config_err(e.into()))?;

        tracing::debug!("[config] loaded {} (host={})", path.display(), config.server_address);
        Ok(config)
    }

    /// "host:port" → (host, port). 포트가 없거나 숫자가 아니면 22
    ///
    /// "[::1]:2222" 처럼 대괄호로 감싼 IPv6 주소도 처리
    pub fn endpoint(&self) -> (String, u16) {
        let addr = self.server_address.trim();

        if let Some(rest) = addr.strip_prefix('[') {
            if let Some((host, tail)) = rest.split_once(']') {
                let port = tail.strip_prefix(':')
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SSH_PORT);
                return (host.to_string(), port);
            }
        }

        match addr.rsplit_once(':') {
            // 콜론이 여러 개면 포트 없는 IPv6 주소로 간주
            Some((host, port)) if !host.contains(':') => {
                (host.to_string(), port.parse().unwrap_or(DEFAULT_SSH_PORT))
            }
            _ => (addr.to_string(), DEFAULT_SSH_PORT),
        }
    }
}

// 비밀번호가 로그에 찍히지 않도록 Debug 직접 구현
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_address", &self.server_address)
            .field("username", &self.username)
            .field("password", &"***")
            .field("remote_directory", &self.remote_directory)
            .field("local_directory", &self.local_directory)
            .field("verify_host_identity", &self.verify_host_identity)
            .finish()
    }
}
