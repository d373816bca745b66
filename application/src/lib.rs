pub mod assistant_service;
pub mod citations;
