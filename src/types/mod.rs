//! Identifier types shared across the bot.

pub mod ids;

pub use ids::{CardId, ColumnId, DeliveryId, RepoId};
