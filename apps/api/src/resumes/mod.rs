// Résumé CRUD shell plus single-shot render and export for a stored record.

pub mod handlers;
pub mod validation;
