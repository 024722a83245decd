pub mod channels;
pub mod notification;

pub use channels::{
    NotificationConsumer, NotificationProducer, NotificationSender, create_notification_channel,
    drain_notifications, send_notification,
};
pub use notification::{Notification, NotificationKind};
