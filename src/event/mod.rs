mod bus;
mod events;

pub use bus::{CallbackRegistry, SubscriptionId};
pub use events::{LifecycleEvent, ToolEvent};
