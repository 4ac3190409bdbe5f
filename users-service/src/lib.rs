// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup wiring
// - infrastructure: Postgres repositories and the outbox event publisher
// - presentation: HTTP handlers, extractors and the response envelope
// - application: ports, use cases and security services
// - domain: users, roles and outbox events

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
