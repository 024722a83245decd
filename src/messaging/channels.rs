// Communication channels lock-free
// The editing thread produces notifications, the UI context drains them

use crate::messaging::notification::Notification;
use ringbuf::{
    HeapRb,
    traits::{Consumer, Producer, Split},
};
use std::sync::{Arc, Mutex};

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

/// Producer half shared between the session and the history listener
pub type NotificationSender = Arc<Mutex<NotificationProducer>>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity.max(1));
    rb.split()
}

/// Push a notification without blocking on a full buffer
///
/// Returns false if the notification was dropped.
pub fn send_notification(sender: &NotificationSender, notification: Notification) -> bool {
    match sender.lock() {
        Ok(mut producer) => {
            if producer.try_push(notification).is_ok() {
                true
            } else {
                log::warn!("Notification buffer full, dropping {:?}", notification.kind);
                false
            }
        }
        Err(_) => {
            log::warn!("Notification sender poisoned, dropping {:?}", notification.kind);
            false
        }
    }
}

/// Pop every pending notification, oldest first
pub fn drain_notifications(consumer: &mut NotificationConsumer) -> Vec<Notification> {
    let mut drained = Vec::new();
    while let Some(notification) = consumer.try_pop() {
        drained.push(notification);
    }
    drained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::notification::NotificationKind;

    #[test]
    fn test_send_and_drain() {
        let (tx, mut rx) = create_notification_channel(4);
        let sender: NotificationSender = Arc::new(Mutex::new(tx));

        assert!(send_notification(&sender, Notification::data_changed(true)));
        assert!(send_notification(&sender, Notification::data_changed(false)));

        let drained = drain_notifications(&mut rx);
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, NotificationKind::DataChanged { reload: true });
        assert!(drain_notifications(&mut rx).is_empty());
    }

    #[test]
    fn test_full_buffer_drops() {
        let (tx, mut rx) = create_notification_channel(1);
        let sender: NotificationSender = Arc::new(Mutex::new(tx));

        assert!(send_notification(&sender, Notification::data_changed(true)));
        assert!(!send_notification(&sender, Notification::data_changed(false)));
        assert_eq!(drain_notifications(&mut rx).len(), 1);
    }
}
