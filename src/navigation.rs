use crate::models::{Notification, NotificationKind};

/// Target view for a clicked notification
///
/// Purely a function of the notification kind and its related id; kinds
/// that need a related id fall back to the notification feed when the
/// server did not attach one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    MessageThread { conversation_id: String },
    SessionDetail { session_id: String },
    Payments,
    NotificationFeed,
}

impl NavigationTarget {
    pub fn for_notification(notification: &Notification) -> Self {
        match (notification.kind, notification.related_id.clone()) {
            (NotificationKind::NewMessage, Some(conversation_id)) => {
                NavigationTarget::MessageThread { conversation_id }
            }
            (NotificationKind::SessionRequest, Some(session_id))
            | (NotificationKind::SessionAccept, Some(session_id)) => {
                NavigationTarget::SessionDetail { session_id }
            }
            (NotificationKind::PaymentSuccess, _) | (NotificationKind::PaymentReceived, _) => {
                NavigationTarget::Payments
            }
            _ => NavigationTarget::NotificationFeed,
        }
    }

    pub fn path(&self) -> String {
        match self {
            NavigationTarget::MessageThread { conversation_id } => {
                format!("/messages/{}", conversation_id)
            }
            NavigationTarget::SessionDetail { session_id } => format!("/sessions/{}", session_id),
            NavigationTarget::Payments => "/payments".to_string(),
            NavigationTarget::NotificationFeed => "/notifications".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notification(kind: NotificationKind, related_id: Option<&str>) -> Notification {
        Notification {
            id: "n1".to_string(),
            kind,
            title: "title".to_string(),
            body: "body".to_string(),
            related_id: related_id.map(str::to_string),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_message_routes_to_its_conversation() {
        let target =
            NavigationTarget::for_notification(&notification(NotificationKind::NewMessage, Some("c1")));
        assert_eq!(
            target,
            NavigationTarget::MessageThread {
                conversation_id: "c1".to_string()
            }
        );
        assert_eq!(target.path(), "/messages/c1");
    }

    #[test]
    fn session_kinds_route_to_session_detail() {
        for kind in [NotificationKind::SessionRequest, NotificationKind::SessionAccept] {
            let target = NavigationTarget::for_notification(&notification(kind, Some("s9")));
            assert_eq!(target.path(), "/sessions/s9");
        }
    }

    #[test]
    fn payment_kinds_route_to_payments_regardless_of_related_id() {
        for related in [None, Some("pay-1")] {
            let target = NavigationTarget::for_notification(&notification(
                NotificationKind::PaymentSuccess,
                related,
            ));
            assert_eq!(target, NavigationTarget::Payments);
            assert_eq!(target.path(), "/payments");
        }
        let target =
            NavigationTarget::for_notification(&notification(NotificationKind::PaymentReceived, None));
        assert_eq!(target.path(), "/payments");
    }

    #[test]
    fn missing_related_id_falls_back_to_the_feed() {
        for kind in [NotificationKind::NewMessage, NotificationKind::SessionRequest] {
            let target = NavigationTarget::for_notification(&notification(kind, None));
            assert_eq!(target, NavigationTarget::NotificationFeed);
        }
        let target = NavigationTarget::for_notification(&notification(NotificationKind::Other, Some("x")));
        assert_eq!(target.path(), "/notifications");
    }
}
