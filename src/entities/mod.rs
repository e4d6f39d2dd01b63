//! Core data structures for the assistant engine.

mod action;
mod household;
mod nudge;
mod subtask;
mod task;
mod template;
mod user;

pub use action::{ActionStatus, ActionType, TaskAction};
pub use household::HouseholdMember;
pub use nudge::{Nudge, NudgeType};
pub use subtask::Subtask;
pub use task::{Priority, Task, TaskDomain, TaskStatus};
pub use template::{default_household_templates, RecurringTemplate, TemplateAction};
pub use user::UserProfile;
