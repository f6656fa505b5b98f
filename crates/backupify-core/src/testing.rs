// 테스트용 메모리 기반 RemoteFs
//
// - 엔트리는 추가한 순서 그대로 read_dir 에 나옴
// - deny_open   : 열기 실패 (권한 없음)
// - break_after : n 바이트 읽은 뒤 스트림 에러
//
// LogCapture: 현재 스레드의 tracing 출력을 버퍼에 모아 줄 단위로 검사

use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{ready, Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{Error, Result, TransferStage};
use crate::sftp::{RemoteEntry, RemoteFs};
use crate::utils::join_remote;

#[derive(Debug)]
pub(crate) struct MemoryRemote {
    root: String,
    entries: Vec<RemoteEntry>,
    files: HashMap<String, Vec<u8>>,
    denied: HashSet<String>,
    broken: HashMap<String, usize>,
    opened: Vec<String>,
}

impl MemoryRemote {
    pub(crate) fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            entries: Vec::new(),
            files: HashMap::new(),
            denied: HashSet::new(),
            broken: HashMap::new(),
            opened: Vec::new(),
        }
    }

    pub(crate) fn with_file(mut self, name: &str, contents: &[u8]) -> Self {
        self.entries.push(RemoteEntry::file(name, contents.len() as u64));
        self.files.insert(join_remote(&self.root, name), contents.to_vec());
        self
    }

    pub(crate) fn with_dir(mut self, name: &str) -> Self {
        self.entries.push(RemoteEntry::dir(name));
        self
    }

    pub(crate) fn deny_open(mut self, name: &str) -> Self {
        self.denied.insert(join_remote(&self.root, name));
        self
    }

    pub(crate) fn break_after(mut self, name: &str, bytes: usize) -> Self {
        self.broken.insert(join_remote(&self.root, name), bytes);
        self
    }

    /// open() 이 호출된 경로 (성공/실패 모두)
    pub(crate) fn opened(&self) -> Vec<String> {
        self.opened.clone()
    }
}

#[async_trait]
impl RemoteFs for MemoryRemote {
    type File = MemoryFile;

    async fn read_dir(&mut self, path: &str) -> Result<Vec<RemoteEntry>> {
        if path.trim_end_matches('/') != self.root.trim_end_matches('/') {
            return Err(Error::List { path: path.to_string(), cause: "no such file".into() });
        }
        Ok(self.entries.clone())
    }

    async fn open(&mut self, path: &str) -> Result<MemoryFile> {
        self.opened.push(path.to_string());

        if self.denied.contains(path) {
            return Err(Error::transfer(TransferStage::Open, path, "permission denied"));
        }
        let data = self.files.get(path)
            .cloned()
            .ok_or_else(|| Error::transfer(TransferStage::Open, path, "no such file"))?;

        Ok(match self.broken.get(path) {
            Some(&limit) => MemoryFile {
                data: Cursor::new(data[..limit.min(data.len())].to_vec()),
                fail_at_end: true,
            },
            None => MemoryFile { data: Cursor::new(data), fail_at_end: false },
        })
    }
}

pub(crate) struct MemoryFile {
    data: Cursor<Vec<u8>>,
    fail_at_end: bool,
}

impl AsyncRead for MemoryFile {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        ready!(Pin::new(&mut this.data).poll_read(cx, buf))?;

        if this.fail_at_end && buf.filled().len() == before && buf.remaining() > 0 {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "channel closed")));
        }
        Poll::Ready(Ok(()))
    }
}

// ── LogCapture ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// guard 가 살아 있는 동안 현재 스레드의 INFO 이상 이벤트를 수집
    ///
    /// #[tokio::test] 는 current_thread 런타임이라 await 사이에도 같은 스레드
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// needle 을 포함한 줄 수
    pub(crate) fn count(&self, needle: &str) -> usize {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
