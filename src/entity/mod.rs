pub mod actors;
pub mod audit_logs;
pub mod genres;
pub mod performances;
pub mod play_actors;
pub mod play_genres;
pub mod plays;
pub mod reservations;
pub mod theatre_halls;
pub mod tickets;
pub mod users;

pub use actors::Entity as Actors;
pub use audit_logs::Entity as AuditLogs;
pub use genres::Entity as Genres;
pub use performances::Entity as Performances;
pub use play_actors::Entity as PlayActors;
pub use play_genres::Entity as PlayGenres;
pub use plays::Entity as Plays;
pub use reservations::Entity as Reservations;
pub use theatre_halls::Entity as TheatreHalls;
pub use tickets::Entity as Tickets;
pub use users::Entity as Users;
