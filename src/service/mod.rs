pub mod access;
pub mod moderation;
pub mod payment_provider;
