//! Business logic services for the Shopkeep API.
//!
//! # Services
//!
//! - `auth` - User registration and password login
//! - `cart` - Adding and removing cart items
//! - `orders` - Submitting carts as orders and reading order history
//!
//! Services borrow repositories from [`Repositories`](crate::db::Repositories)
//! and are created per request.

pub mod auth;
pub mod cart;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService, MAX_QUANTITY};
pub use orders::{OrderError, OrderService};
