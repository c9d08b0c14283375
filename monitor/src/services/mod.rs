pub mod alert_policy;
pub mod dispatcher;
pub mod notifier;

pub use alert_policy::{AlertDecision, AlertPolicy, AlertState, DecisionKind};
pub use dispatcher::Dispatcher;
pub use notifier::{build_notifier, AlertNotification, Notifier, TelegramNotifier, WebhookNotifier};
