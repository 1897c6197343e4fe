// Domain layer: core models, ports (interfaces) and the pure toponym logic.
// Concrete PDF, language, model and hub integrations live under adapters.

pub mod catalog;
pub mod model;
pub mod ports;

pub mod services;
