// backupify Utils
// author: kodeholic
//
// 공통 유틸 함수 모음
// - fmt_size     : 바이트 → 사람이 읽기 좋은 단위 (1.2MB 등)
// - join_remote  : 리모트 디렉토리 + 파일명 → 리모트 경로 ('/' 고정)
// - local_target : 로컬 디렉토리 + 파일명 → 로컬 경로 (디렉토리 탈출 차단)

use std::path::{Path, PathBuf};

/// 바이트 → 사람이 읽기 좋은 단위 문자열
pub fn fmt_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB      { format!("{:.1}GB", bytes as f64 / GB as f64) }
    else if bytes >= MB { format!("{:.1}MB", bytes as f64 / MB as f64) }
    else if bytes >= KB { format!("{:.1}KB", bytes as f64 / KB as f64) }
    else                { format!("{}B",     bytes) }
}

/// 리모트 디렉토리 + 파일명 → 리모트 경로
///
/// SFTP 경로는 OS와 무관하게 항상 '/' 구분자
/// - ""        + "a.txt" → "a.txt"
/// - "/"       + "a.txt" → "/a.txt"
/// - "/backups/" + "a.txt" → "/backups/a.txt"
pub fn join_remote(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// 로컬 디렉토리 + 파일명 → 로컬 경로
///
/// 파일명에 구분자나 ".." 가 있으면 None (local_dir 밖에 쓰지 않도록)
/// '\' 는 Windows 에서만 구분자, unix 에서는 일반 문자
pub fn local_target(dir: &Path, name: &str) -> Option<PathBuf> {
    let mut unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/');
    if cfg!(windows) {
        unsafe_name |= name.contains('\\');
    }
    if unsafe_name {
        return None;
    }
    Some(dir.join(name))
}
