//! Domain models for the Shopkeep API.
//!
//! These types represent validated domain objects separate from database
//! row types. They are what handlers serialize into JSON responses.

pub mod cart;
pub mod item;
pub mod order;
pub mod session;
pub mod user;

pub use cart::Cart;
pub use item::{Item, NewItem};
pub use order::{NewOrder, UserOrder};
pub use session::{CurrentUser, session_keys};
pub use user::User;
