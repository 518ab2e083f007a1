use std::collections::HashSet;

use super::NotificationKind;
use crate::task::TaskKey;

/// Per-session record of which notifications already went out.
///
/// Lives for one schedule-load session. The owner must [`clear`](Self::clear)
/// it whenever the displayed date or schedule identity changes.
#[derive(Debug, Clone, Default)]
pub struct NotificationMemo {
    start_warned: HashSet<TaskKey>,
    end_notified: HashSet<TaskKey>,
}

impl NotificationMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: NotificationKind, key: &TaskKey) -> bool {
        self.set(kind).contains(key)
    }

    /// Record `key`; returns `false` if it was already recorded.
    pub fn insert(&mut self, kind: NotificationKind, key: TaskKey) -> bool {
        match kind {
            NotificationKind::StartWarning => self.start_warned.insert(key),
            NotificationKind::EndReached => self.end_notified.insert(key),
        }
    }

    pub fn clear(&mut self) {
        self.start_warned.clear();
        self.end_notified.clear();
    }

    pub fn len(&self) -> usize {
        self.start_warned.len() + self.end_notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set(&self, kind: NotificationKind) -> &HashSet<TaskKey> {
        match kind {
            NotificationKind::StartWarning => &self.start_warned,
            NotificationKind::EndReached => &self.end_notified,
        }
    }
}
