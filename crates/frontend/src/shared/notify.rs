//! Всплывающие уведомления (toast)

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Куда контроллеры отправляют сообщения для пользователя
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }

    fn info(&self, message: &str) {
        self.notify(NotificationKind::Info, message);
    }
}

/// Notifier backed by a signal the page renders as a toast stack
#[derive(Clone, Copy)]
pub struct SignalNotifier {
    pub items: RwSignal<Vec<Notification>>,
}

impl SignalNotifier {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
        }
    }

    pub fn dismiss(&self, index: usize) {
        self.items.update(|items| {
            if index < items.len() {
                items.remove(index);
            }
        });
    }
}

impl Default for SignalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for SignalNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Error => log::error!("{}", message),
            _ => log::info!("{}", message),
        }
        self.items.update(|items| {
            items.push(Notification {
                kind,
                message: message.to_string(),
            })
        });
    }
}
