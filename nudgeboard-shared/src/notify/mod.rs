/// Notification fan-out and the deadline sweep
///
/// # Modules
///
/// - [`fanout`]: writes one notification per recipient for a task event
/// - [`deadline`]: periodic scan emitting deadline reminders
///
/// Fan-out is best-effort and runs after the triggering task mutation has
/// committed. A failed insert is logged and counted but never aborts the
/// remaining recipients or fails the request.

pub mod deadline;
pub mod fanout;
