//! Application services for task lifecycle orchestration.

mod lifecycle;
mod request;
mod service_spec;
mod view;

pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
pub use request::{ChangeStateRequest, CreateTaskRequest, RequestValidationError};
pub use service_spec::validate_service_spec;
pub use view::{CurrentStateView, HttpServiceView, ServiceView, TransitionView};
