// backupify Session (russh 기반)
// author: kodeholic
//
// russh로 SSH 연결/비밀번호 인증을 처리하고
// russh-sftp로 SFTP 세션을 수립합니다.
//
// 두 단계 모두 한 번만 시도 (재시도, 타임아웃 없음)
//   Transport : TCP + 핸드셰이크 + 인증
//   Session   : 채널 오픈 + "sftp" subsystem + SftpSession

use std::sync::Arc;

use russh::client;
use russh_sftp::client::SftpSession as RusshSftpSession;

use crate::config::Config;
use crate::error::{ConnectStage, Error, Result};
use crate::sftp::SftpClient;

// russh 클라이언트 핸들러 (서버 이벤트 처리)
pub struct ClientHandler {
    host: String,
    port: u16,
    verify_host_identity: bool,
}

#[async_trait::async_trait]
impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        if !self.verify_host_identity {
            // 기존 동작 유지: 어떤 호스트키든 허용
            tracing::warn!("[session] host key of {} is NOT verified (verify_host_identity=false)", self.host);
            return Ok(true);
        }

        let known = russh::keys::check_known_hosts(&self.host, self.port, server_public_key)?;
        if !known {
            tracing::error!("[session] host key of {}:{} not found in known_hosts", self.host, self.port);
        }
        Ok(known)
    }
}

pub async fn connect(config: &Config) -> Result<SftpClient> {
    let (host, port) = config.endpoint();

    // ---- TCP 연결 + 인증 ----
    let russh_config = Arc::new(client::Config::default());
    let handler = ClientHandler {
        host: host.clone(),
        port,
        verify_host_identity: config.verify_host_identity,
    };

    tracing::info!("[session] connecting to {}:{} as {}", host, port, config.username);

    let mut ssh = client::connect(russh_config, (host.as_str(), port), handler)
        .await
        .map_err(|e| Error::connection(ConnectStage::Transport, e))?;

    let authed = ssh.authenticate_password(&config.username, &config.password)
        .await
        .map_err(|e| Error::connection(ConnectStage::Transport, e))?;

    if !authed {
        return Err(Error::connection(
            ConnectStage::Transport,
            format!("password authentication rejected for user '{}'", config.username),
        ));
    }

    // ---- 채널 + SFTP ----
    let channel = ssh.channel_open_session()
        .await
        .map_err(|e| Error::connection(ConnectStage::Session, e))?;

    channel.request_subsystem(true, "sftp")
        .await
        .map_err(|e| Error::connection(ConnectStage::Session, e))?;

    let sftp = RusshSftpSession::new(channel.into_stream())
        .await
        .map_err(|e| Error::connection(ConnectStage::Session, e))?;

    tracing::info!("[session] SFTP ready");
    Ok(SftpClient::new(sftp, ssh))
}
