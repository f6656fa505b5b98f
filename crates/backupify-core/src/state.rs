// backupify Run State Machine + Observer
// author: kodeholic
//
// 한 번의 실행(run) 라이프사이클을 상태 머신으로 관리
// can_transition_to()로 허용된 전이만 가능하게 강제
//
// 상태 흐름:
//   Init → Configured → Connected → Listed
//     → LocalDirReady → Transferring → Done
//
//   Init ~ Listed 에서만 → Aborted 전이 가능
//   Transferring 은 개별 파일 실패와 무관하게 항상 Done 으로 끝남

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Init,
    Configured,
    Connected,
    Listed,
    LocalDirReady,
    Transferring,
    Done,
    Aborted {
        state: Box<RunState>,  // 중단 시점의 상태
        message: String,
    },
}

impl RunState {
    /// 허용된 다음 상태인지 검증
    pub fn can_transition_to(&self, next: &RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Init, Configured)
            | (Configured, Connected)
            | (Connected, Listed)
            | (Listed, LocalDirReady)
            | (LocalDirReady, Transferring)
            | (Transferring, Done)
            | (Init | Configured | Connected | Listed, Aborted { .. })
        )
    }
}

/// 상태 변경 알림 trait
///
/// CLI: tracing::debug!로 상태 출력
/// 테스트: 전이 순서 기록
pub trait RunObserver: Send + Sync {
    fn on_state_changed(&self, prev: &RunState, next: &RunState);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aborted(from: RunState) -> RunState {
        RunState::Aborted { state: Box::new(from), message: "boom".to_string() }
    }

    #[test]
    fn happy_path_is_linear() {
        use RunState::*;
        let path = [Init, Configured, Connected, Listed, LocalDirReady, Transferring, Done];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(&pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
        assert!(!Init.can_transition_to(&Connected));
        assert!(!Done.can_transition_to(&Init));
    }

    #[test]
    fn abort_only_before_transfer() {
        use RunState::*;
        for s in [Init, Configured, Connected, Listed] {
            assert!(s.can_transition_to(&aborted(s.clone())));
        }
        for s in [LocalDirReady, Transferring, Done] {
            assert!(!s.can_transition_to(&aborted(s.clone())));
        }
    }
}
