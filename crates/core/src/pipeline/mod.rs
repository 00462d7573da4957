pub mod capture_orchestrator;
pub mod overlay;
