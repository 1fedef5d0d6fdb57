pub mod bookingdb;
pub mod db;
pub mod investmentdb;
pub mod propertydb;
pub mod userdb;
