// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use tracing::info;
use tracker::{NotificationSink, RuleNotification};

/// Logs rule notifications instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationSink;

impl NotificationSink for LoggingNotificationSink {
    fn send(&self, notification: RuleNotification) {
        match notification.scheduled_at {
            Some(scheduled_at) => info!(
                template = %notification.template,
                tracker_type = %notification.tracker_type,
                uid = %notification.uid,
                scheduled_at = %scheduled_at,
                "Notification scheduled"
            ),
            None => info!(
                template = %notification.template,
                tracker_type = %notification.tracker_type,
                uid = %notification.uid,
                sent_at = %OffsetDateTime::now_utc(),
                "Notification sent"
            ),
        }
    }
}
