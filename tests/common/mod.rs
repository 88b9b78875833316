#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use notification_client::{DisplaySink, NavigationSink, Toast};

pub struct RecordingDisplay {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingDisplay {
            toasts: Mutex::new(Vec::new()),
        })
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }
}

impl DisplaySink for RecordingDisplay {
    fn show(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

pub struct RecordingNavigation {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigation {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingNavigation {
            paths: Mutex::new(Vec::new()),
        })
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl NavigationSink for RecordingNavigation {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

pub fn notification_json(id: &str, kind: &str, is_read: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "notification_type": kind,
        "title": format!("{} title", id),
        "body": format!("{} body", id),
        "related_id": serde_json::Value::Null,
        "is_read": is_read,
        "created_at": "2025-06-01T12:00:00Z"
    })
}
