use std::time::Duration;

/// Visual style of a toast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastStyle {
    #[default]
    Default,
    Success,
    Error,
}

/// A display event handed to the UI layer
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub style: ToastStyle,
    pub auto_dismiss: Duration,
}

impl Toast {
    /// Toast for an incoming notification: default style, 5 s auto-dismiss.
    pub fn notification(title: impl Into<String>, body: impl Into<String>) -> Self {
        Toast {
            title: title.into(),
            body: body.into(),
            style: ToastStyle::Default,
            auto_dismiss: Duration::from_secs(5),
        }
    }
}

/// Fire-and-forget toast display, injected at session construction
pub trait DisplaySink: Send + Sync {
    fn show(&self, toast: Toast);
}

/// Moves the user to a different view, injected at session construction
pub trait NavigationSink: Send + Sync {
    fn navigate(&self, path: &str);
}
