pub mod feedback_repository;
pub mod habit_repository;
pub mod plan_repository;
pub mod settings_repository;
pub mod slot_repository;
pub mod task_repository;

pub use feedback_repository::FeedbackRepository;
pub use habit_repository::HabitRepository;
pub use plan_repository::PlanRepository;
pub use settings_repository::SettingsRepository;
pub use slot_repository::SlotRepository;
pub use task_repository::TaskRepository;
