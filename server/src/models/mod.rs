pub mod event;
pub mod form;
pub mod registration;
pub mod user;

pub use event::{
    Event, EventDetails, EventFormat, EventType, Location, Online, Organizer, Ticket, TicketType,
    Venue,
};
pub use form::EventForm;
pub use registration::{NewRegistration, RegisterRequest, Registration};
pub use user::{LoginRequest, NewUser, SignupRequest, User};
